/// meshlit web - WebGL2 front end of the lit mesh viewer
///
/// Fetches mesh text, builds a [`RenderLoop`] over a WebGL2 canvas and drives
/// it from `requestAnimationFrame`, reading the slider inputs every frame.
use log::LevelFilter;
use wasm_bindgen::prelude::*;

use meshlit_core::{parse_obj, InputSnapshot, RenderLoop, SceneConfig};

mod animation;
mod context;
mod fetch;
mod input;
mod logger;
pub mod shader;
mod utils;

pub use context::WebGlContext;

use input::SliderInputs;
use utils::{error, to_js};

/// Canvas the viewer draws into unless told otherwise
pub const DEFAULT_CANVAS_ID: &str = "rendering-surface";

#[wasm_bindgen]
pub struct MeshViewer {
    render_loop: RenderLoop<WebGlContext>,
    sliders: SliderInputs,
}

#[wasm_bindgen]
impl MeshViewer {
    /// Build a viewer for already downloaded mesh text
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, mesh_text: &str) -> Result<MeshViewer, JsValue> {
        let window = web_sys::window().ok_or_else(|| error("missing window"))?;
        let document = window.document().ok_or_else(|| error("missing document"))?;

        let mesh = parse_obj(mesh_text).map_err(|e| to_js(e.into()))?;
        let sources = shader::sources_from_document(&document);
        let context = WebGlContext::new(canvas_id).map_err(to_js)?;
        let render_loop =
            RenderLoop::new(context, &mesh, &sources, SceneConfig::default()).map_err(to_js)?;

        Ok(MeshViewer {
            render_loop,
            sliders: SliderInputs::from_document(&document),
        })
    }

    /// Draw one frame at `now` (ms) with the current slider values.
    /// Returns the number of vertices drawn.
    pub fn advance(&mut self, now: f64) -> u32 {
        let inputs = self.sliders.snapshot();
        self.render_loop.advance(now, &inputs).vertices_drawn as u32
    }

    /// Draw one frame with explicit control values instead of the page sliders
    #[allow(clippy::too_many_arguments)]
    pub fn advance_with(
        &mut self,
        now: f64,
        light_x: f32,
        light_y: f32,
        light_z: f32,
        rotate_x: f32,
        rotate_y: f32,
        rotate_z: f32,
    ) -> u32 {
        let inputs = InputSnapshot::new(
            [light_x, light_y, light_z],
            [rotate_x, rotate_y, rotate_z],
        );
        self.render_loop.advance(now, &inputs).vertices_drawn as u32
    }

    pub fn vertex_count(&self) -> u32 {
        self.render_loop.vertex_count() as u32
    }
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    logger::init(LevelFilter::Info);
    Ok(())
}

/// Fetch `mesh_url` and build a viewer on `canvas_id` without starting it
#[wasm_bindgen]
pub async fn load_viewer(canvas_id: String, mesh_url: String) -> Result<MeshViewer, JsValue> {
    let text = fetch::fetch_text(&mesh_url).await.map_err(to_js)?;
    MeshViewer::new(&canvas_id, &text)
}

/// Fetch the mesh, build the viewer and animate it until the page is torn down.
///
/// A failed download is reported with an alert and nothing is drawn.
#[wasm_bindgen]
pub async fn run(canvas_id: Option<String>, mesh_url: String) -> Result<(), JsValue> {
    let canvas_id = canvas_id.unwrap_or_else(|| DEFAULT_CANVAS_ID.to_string());

    let text = match fetch::fetch_text(&mesh_url).await {
        Ok(text) => text,
        Err(err) => {
            if let Some(window) = web_sys::window() {
                let _ = window.alert_with_message(&format!("Failed to retrieve [{}]", mesh_url));
            }
            return Err(to_js(err));
        }
    };

    let viewer = MeshViewer::new(&canvas_id, &text)?;
    log::info!("viewer ready with {} vertices", viewer.vertex_count());
    animation::start(viewer)
}
