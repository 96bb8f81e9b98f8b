use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlInputElement};

use meshlit_core::input::{AXIS_MIDPOINT, LIGHT_INPUT_IDS, LIGHT_MIDPOINT, ROTATE_INPUT_IDS};
use meshlit_core::InputSnapshot;

/// The six range inputs controlling light and rotation, resolved once
pub(crate) struct SliderInputs {
    light: [Option<HtmlInputElement>; 3],
    rotate: [Option<HtmlInputElement>; 3],
}

impl SliderInputs {
    pub(crate) fn from_document(document: &Document) -> Self {
        let find = |id: &str| {
            let element = document
                .get_element_by_id(id)
                .and_then(|element| element.dyn_into::<HtmlInputElement>().ok());
            if element.is_none() {
                log::warn!("input #{} not found, holding it at its midpoint", id);
            }
            element
        };
        Self {
            light: LIGHT_INPUT_IDS.map(find),
            rotate: ROTATE_INPUT_IDS.map(find),
        }
    }

    /// Current slider values; missing or non-numeric inputs read as their midpoint
    pub(crate) fn snapshot(&self) -> InputSnapshot {
        let read = |input: &Option<HtmlInputElement>, midpoint: f32| {
            input
                .as_ref()
                .and_then(|input| input.value().trim().parse::<f32>().ok())
                .filter(|value| value.is_finite())
                .unwrap_or(midpoint)
        };
        InputSnapshot {
            light: [
                read(&self.light[0], LIGHT_MIDPOINT),
                read(&self.light[1], LIGHT_MIDPOINT),
                read(&self.light[2], LIGHT_MIDPOINT),
            ],
            rotate: [
                read(&self.rotate[0], AXIS_MIDPOINT),
                read(&self.rotate[1], AXIS_MIDPOINT),
                read(&self.rotate[2], AXIS_MIDPOINT),
            ],
        }
    }
}
