//! WebAssembly bindings for honeycomb

use wasm_bindgen::prelude::*;

use crate::render::{self, ExportFormat, RenderOptions};
use crate::tiling::{Tiler, TilingResult};
use crate::SamplingMask;

#[wasm_bindgen]
pub struct WasmHoneycomb {
    hex_size: f64,
    stroke: bool,
    hexagon_mask: bool,
    scale: u32,
}

#[wasm_bindgen]
impl WasmHoneycomb {
    /// Create a converter for hexagons of circumradius `hex_size` pixels
    #[wasm_bindgen(constructor)]
    pub fn new(hex_size: f64) -> Result<WasmHoneycomb, JsValue> {
        Tiler::new(hex_size).map_err(to_js)?;
        Ok(WasmHoneycomb { hex_size, stroke: true, hexagon_mask: false, scale: 2 })
    }

    #[wasm_bindgen]
    pub fn set_hex_size(&mut self, hex_size: f64) -> Result<(), JsValue> {
        Tiler::new(hex_size).map_err(to_js)?;
        self.hex_size = hex_size;
        Ok(())
    }

    #[wasm_bindgen]
    pub fn set_stroke(&mut self, enabled: bool) {
        self.stroke = enabled;
    }

    #[wasm_bindgen]
    pub fn set_hexagon_mask(&mut self, enabled: bool) {
        self.hexagon_mask = enabled;
    }

    #[wasm_bindgen]
    pub fn set_scale(&mut self, scale: u32) {
        self.scale = scale;
    }

    /// Tile raw RGBA pixels (e.g. canvas `ImageData.data`).
    /// Returns `{ svg, hexagons, width, height }`; `svg` is null when no
    /// hexagon has a visible color.
    #[wasm_bindgen]
    pub fn process_image(
        &self,
        image_data: &[u8],
        width: u32,
        height: u32,
    ) -> Result<js_sys::Object, JsValue> {
        let result = self.tile(image_data, width, height)?;
        let summary = result.summary();

        let svg = if result.is_empty() {
            JsValue::NULL
        } else {
            render::to_svg_string(&result, self.stroke).map_err(to_js)?.into()
        };

        web_sys::console::log_1(&format!("honeycomb: {} hexagons", summary.hexagons).into());

        let object = js_sys::Object::new();
        js_sys::Reflect::set(&object, &"svg".into(), &svg)?;
        js_sys::Reflect::set(&object, &"hexagons".into(), &(summary.hexagons as u32).into())?;
        js_sys::Reflect::set(&object, &"width".into(), &summary.output_width.into())?;
        js_sys::Reflect::set(&object, &"height".into(), &summary.output_height.into())?;
        Ok(object)
    }

    /// Encoded PNG of the mosaic, transparent between hexagons
    #[wasm_bindgen]
    pub fn export_png(
        &self,
        image_data: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, JsValue> {
        self.export(image_data, width, height, ExportFormat::Png)
    }

    /// Encoded JPEG of the mosaic on a white background
    #[wasm_bindgen]
    pub fn export_jpeg(
        &self,
        image_data: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, JsValue> {
        self.export(image_data, width, height, ExportFormat::Jpeg)
    }

    fn export(
        &self,
        image_data: &[u8],
        width: u32,
        height: u32,
        format: ExportFormat,
    ) -> Result<Vec<u8>, JsValue> {
        let result = self.tile(image_data, width, height)?;
        let options = RenderOptions { stroke: self.stroke, scale: self.scale, background: None };
        render::export(&result, format, &options).map_err(to_js)
    }

    fn tile(&self, image_data: &[u8], width: u32, height: u32) -> Result<TilingResult, JsValue> {
        let buffer = image::RgbaImage::from_raw(width, height, image_data.to_vec())
            .ok_or_else(|| JsValue::from_str("Invalid image dimensions"))?;
        let mask = if self.hexagon_mask { SamplingMask::Hexagon } else { SamplingMask::Square };
        let tiler = Tiler::new(self.hex_size).map_err(to_js)?.with_mask(mask);
        Ok(tiler.tile(&buffer))
    }
}

fn to_js(err: crate::HoneycombError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
