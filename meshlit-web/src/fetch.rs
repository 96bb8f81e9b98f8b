use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use meshlit_core::{Error, Result};

use crate::utils::describe;

/// Download the mesh file as text
pub(crate) async fn fetch_text(url: &str) -> Result<String> {
    let fail = |reason: String| Error::Fetch {
        url: url.to_string(),
        reason,
    };

    let window = web_sys::window().ok_or_else(|| fail("missing window".into()))?;
    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| fail(describe(&e)))?;
    let response: Response = response
        .dyn_into()
        .map_err(|_| fail("fetch did not return a Response".into()))?;

    if !response.ok() {
        return Err(fail(format!(
            "HTTP {} {}",
            response.status(),
            response.status_text()
        )));
    }

    let text = response.text().map_err(|e| fail(describe(&e)))?;
    let text = JsFuture::from(text).await.map_err(|e| fail(describe(&e)))?;
    text.as_string()
        .ok_or_else(|| fail("response body is not text".into()))
}
