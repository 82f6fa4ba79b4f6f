#![cfg(target_arch = "wasm32")]
use js_sys::{Function, JSON};
use morphfield_wasm::{abi_version, MorphField};
use serde_json::json;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn small_config() -> JsValue {
    let text = json!({
        "particle_count": 500,
        "text": { "canvas_width": 64, "canvas_height": 32, "keep_probability": 1.0 },
        "transition": { "to_text_seconds": 0.2, "to_sphere_seconds": 0.2 }
    })
    .to_string();
    JSON::parse(&text).unwrap()
}

fn noop_upload() -> JsValue {
    Function::new_with_args("positions, colors", "").into()
}

/// Four fully lit rows of single-channel coverage.
fn striped_raster() -> JsValue {
    Function::new_with_args(
        "text, px, w, h",
        "const a = new Uint8Array(w * h); for (let i = 0; i < w * 4; i++) { a[i] = 255; } return a;",
    )
    .into()
}

#[wasm_bindgen_test]
fn abi_is_1() {
    assert_eq!(abi_version(), 1);
}

#[wasm_bindgen_test]
fn missing_callbacks_are_rejected() {
    assert!(MorphField::new(small_config(), JsValue::UNDEFINED, striped_raster(), Some(1.0)).is_err());
    assert!(MorphField::new(small_config(), noop_upload(), JsValue::NULL, Some(1.0)).is_err());
}

#[wasm_bindgen_test]
fn submit_and_settle() {
    let mut field =
        MorphField::new(small_config(), noop_upload(), striped_raster(), Some(7.0)).unwrap();
    assert_eq!(field.state(), "at_sphere");
    assert_eq!(field.particle_count(), 500);
    assert_eq!(field.positions().length(), 1500);

    let k = field.submit_text("HI").unwrap();
    assert_eq!(k, 256);
    assert_eq!(field.state(), "morphing_to_text");
    for _ in 0..30 {
        field.update(1.0 / 60.0).unwrap();
    }
    assert_eq!(field.state(), "at_text");
}

#[wasm_bindgen_test]
fn rgba_image_data_is_accepted() {
    let raster: JsValue = Function::new_with_args(
        "text, px, w, h",
        "const d = new Uint8ClampedArray(w * h * 4); for (let i = 0; i < w * 4; i++) { d[i] = 255; } return { data: d };",
    )
    .into();
    let mut field = MorphField::new(small_config(), noop_upload(), raster, Some(3.0)).unwrap();
    // one fully opaque white row of 64 pixels
    assert_eq!(field.submit_text("A").unwrap(), 64);
}
