use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::utils::error;
use crate::MeshViewer;

type FrameCallback = Closure<dyn FnMut(f64)>;

/// Drive `viewer` from `requestAnimationFrame` until the page goes away.
///
/// The callback re-requests itself after each frame, so a frame never starts
/// before the previous one has returned.
pub(crate) fn start(mut viewer: MeshViewer) -> Result<(), JsValue> {
    let callback: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));
    let next = callback.clone();

    *callback.borrow_mut() = Some(Closure::new(move |now: f64| {
        viewer.advance(now);
        if let Some(frame) = next.borrow().as_ref() {
            if let Err(err) = request_frame(frame) {
                log::error!("failed to schedule the next frame: {:?}", err);
            }
        }
    }));

    let first = callback.borrow();
    let frame = first
        .as_ref()
        .ok_or_else(|| error("frame callback missing"))?;
    request_frame(frame)?;
    Ok(())
}

fn request_frame(callback: &FrameCallback) -> Result<i32, JsValue> {
    web_sys::window()
        .ok_or_else(|| error("missing window"))?
        .request_animation_frame(callback.as_ref().unchecked_ref())
}
