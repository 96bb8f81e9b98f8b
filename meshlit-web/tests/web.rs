//! Browser tests, run with `wasm-pack test --headless --firefox meshlit-web`
#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

use meshlit_web::MeshViewer;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn malformed_mesh_is_rejected_before_drawing() {
    let err = MeshViewer::new("rendering-surface", "v 0 0 0\nf 1/1/1 1/1/1 1/1/1\n")
        .err()
        .and_then(|e| e.as_string())
        .unwrap();
    assert!(err.contains("normal index 1 is out of range"), "{}", err);
}

#[wasm_bindgen_test]
fn missing_canvas_is_reported() {
    let err = MeshViewer::new("no-such-canvas", "v 0 0 0\nvn 0 0 1\nf 1/1/1 1/1/1 1/1/1\n")
        .err()
        .and_then(|e| e.as_string())
        .unwrap();
    assert!(err.contains("canvas not found"), "{}", err);
}
