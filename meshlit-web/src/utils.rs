use wasm_bindgen::JsValue;

use meshlit_core::Error;

pub(crate) fn error(message: &str) -> JsValue {
    JsValue::from_str(message)
}

/// Surface a viewer error at the wasm boundary
pub(crate) fn to_js(err: Error) -> JsValue {
    log::error!("{}", err);
    error(&err.to_string())
}

/// Best-effort text of a thrown JS value
pub(crate) fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
