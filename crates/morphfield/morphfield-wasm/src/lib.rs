use js_sys::{Array, Float32Array, Function, Reflect, Uint8Array};
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use morphfield_core::{
    pixel_count, MorphConfig, MorphEngine, MorphError, PixelBuffer, Point, RenderAdapter, Rgb,
    TextRasterAdapter,
};

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn as_function(v: JsValue) -> Option<Function> {
    if jsvalue_is_undefined_or_null(&v) {
        return None;
    }
    v.dyn_into::<Function>().ok()
}

/// Calls `upload(positions: Float32Array, colors: Float32Array)` once per frame.
/// Both arrays are flat xyz / rgb triples.
struct JsRenderer {
    f: Function,
}

impl RenderAdapter for JsRenderer {
    fn upload_frame(&mut self, positions: &[Point], colors: &[Rgb]) {
        let p = Float32Array::from(positions.as_flattened());
        let c = Float32Array::from(colors.as_flattened());
        if let Err(e) = self.f.call2(&JsValue::UNDEFINED, &p, &c) {
            log::warn!("upload callback threw: {e:?}");
        }
    }
}

/// Calls `rasterize(text, fontSizePx, width, height)`. The callback may return
/// an `ImageData`, its RGBA `data` array, or one byte of coverage per pixel.
struct JsRasterizer {
    f: Function,
}

impl TextRasterAdapter for JsRasterizer {
    fn rasterize(
        &self,
        text: &str,
        font_size_px: u32,
        canvas_width: u32,
        canvas_height: u32,
    ) -> Result<PixelBuffer, MorphError> {
        let args = Array::of4(
            &JsValue::from_str(text),
            &JsValue::from(font_size_px),
            &JsValue::from(canvas_width),
            &JsValue::from(canvas_height),
        );
        let mut out = self
            .f
            .apply(&JsValue::UNDEFINED, &args)
            .map_err(|e| MorphError::Raster(format!("rasterize callback threw: {e:?}")))?;
        if jsvalue_is_undefined_or_null(&out) {
            return Err(MorphError::Raster(
                "rasterize callback returned null/undefined".into(),
            ));
        }
        // ImageData -> its pixel array
        let data_key = JsValue::from_str("data");
        if out.is_object() && Reflect::has(&out, &data_key).unwrap_or(false) {
            out = Reflect::get(&out, &data_key)
                .map_err(|e| MorphError::Raster(format!("read ImageData.data: {e:?}")))?;
        }
        let bytes = Uint8Array::new(&out).to_vec();
        let pixels = pixel_count(canvas_width, canvas_height)?;
        if bytes.len() == pixels * 4 {
            PixelBuffer::from_rgba8(canvas_width, canvas_height, &bytes)
        } else {
            PixelBuffer::from_luma8(canvas_width, canvas_height, &bytes)
        }
    }
}

#[wasm_bindgen]
pub struct MorphField {
    core: MorphEngine<JsRenderer, JsRasterizer>,
}

#[wasm_bindgen]
impl MorphField {
    /// Create the field. `config` is a (partial) MorphConfig object or
    /// undefined/null for defaults; `upload` and `rasterize` are required
    /// callbacks. Pass `seed` for reproducible runs.
    /// Example:
    ///   new MorphField({ particle_count: 8000 }, upload, rasterize)
    #[wasm_bindgen(constructor)]
    pub fn new(
        config: JsValue,
        upload: JsValue,
        rasterize: JsValue,
        seed: Option<f64>,
    ) -> Result<MorphField, JsError> {
        console_error_panic_hook::set_once();

        let cfg: MorphConfig = if jsvalue_is_undefined_or_null(&config) {
            MorphConfig::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        let seed = seed.unwrap_or_else(|| js_sys::Math::random() * u32::MAX as f64) as u64;

        let mut builder = MorphEngine::builder(cfg).seed(seed);
        if let Some(f) = as_function(upload) {
            builder = builder.renderer(JsRenderer { f });
        }
        if let Some(f) = as_function(rasterize) {
            builder = builder.rasterizer(JsRasterizer { f });
        }
        let core = builder
            .build()
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(MorphField { core })
    }

    /// Morph toward `text`. Returns the number of text points; the remaining
    /// particles are scattered as filler.
    #[wasm_bindgen(js_name = submit_text)]
    pub fn submit_text(&mut self, text: &str) -> Result<u32, JsError> {
        let k = self
            .core
            .submit_text(text)
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(k as u32)
    }

    #[wasm_bindgen(js_name = return_to_sphere)]
    pub fn return_to_sphere(&mut self) {
        self.core.return_to_sphere();
    }

    /// Advance by dt (seconds), upload the frame, and return this frame's events.
    #[wasm_bindgen]
    pub fn update(&mut self, dt: f32) -> Result<JsValue, JsError> {
        let events = self.core.update(dt);
        swb::to_value(events).map_err(|e| JsError::new(&format!("events error: {e}")))
    }

    /// One of "at_sphere", "morphing_to_text", "at_text", "morphing_to_sphere".
    #[wasm_bindgen]
    pub fn state(&self) -> String {
        self.core.state().as_str().to_string()
    }

    #[wasm_bindgen(js_name = particle_count)]
    pub fn particle_count(&self) -> u32 {
        self.core.particle_count() as u32
    }

    /// Copy of the position buffer as flat xyz triples.
    #[wasm_bindgen]
    pub fn positions(&self) -> Float32Array {
        Float32Array::from(self.core.positions().as_flattened())
    }

    /// Copy of the color buffer as flat rgb triples.
    #[wasm_bindgen]
    pub fn colors(&self) -> Float32Array {
        Float32Array::from(self.core.colors().as_flattened())
    }

    /// Effective config as JSON text.
    #[wasm_bindgen(js_name = config_json)]
    pub fn config_json(&self) -> Result<String, JsError> {
        serde_json::to_string(self.core.config())
            .map_err(|e| JsError::new(&format!("config serialize error: {e}")))
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
