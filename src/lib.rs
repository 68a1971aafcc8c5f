//! Image to honeycomb mosaic converter.

pub mod config;
pub mod geometry;
pub mod grid;
pub mod render;
pub mod sample;
pub mod source;
pub mod tiling;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use config::HoneycombConfig;
pub use geometry::HexGeometry;
pub use render::{ExportFormat, RenderOptions};
pub use sample::{PixelBuffer, Rgb, SamplingMask};
pub use tiling::{tile, Frame, HexCell, Summary, Tiler, TilingResult};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HoneycombError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid hex size {0}: must be finite and positive")]
    InvalidHexSize(f64),
    #[error("Invalid raster scale {0}: must be at least 1")]
    InvalidScale(u32),
    #[error("Nothing to export: no hexagon has a visible color")]
    EmptyTiling,
}

pub type Result<T> = std::result::Result<T, HoneycombError>;

/// Main converter: prepares a decoded image, tiles it and exports the mosaic.
pub struct Honeycomb {
    tiler: Tiler,
    max_width: u32,
    max_height: u32,
    render: RenderOptions,
}

impl Honeycomb {
    pub fn new(hex_size: f64) -> Result<Self> {
        Self::from_config(&HoneycombConfig { hex_size, ..Default::default() })
    }

    pub fn from_config(config: &HoneycombConfig) -> Result<Self> {
        let tiler = Tiler::new(config.hex_size)?
            .with_mask(config.mask)
            .with_parallel(config.parallel);
        if config.raster_scale == 0 {
            return Err(HoneycombError::InvalidScale(config.raster_scale));
        }
        Ok(Self {
            tiler,
            max_width: config.max_width,
            max_height: config.max_height,
            render: RenderOptions {
                stroke: config.stroke,
                scale: config.raster_scale,
                background: None,
            },
        })
    }

    pub fn with_mask(mut self, mask: SamplingMask) -> Self {
        self.tiler = self.tiler.with_mask(mask);
        self
    }

    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.tiler = self.tiler.with_parallel(enabled);
        self
    }

    pub fn with_stroke(mut self, enabled: bool) -> Self {
        self.render.stroke = enabled;
        self
    }

    pub fn with_max_size(mut self, width: u32, height: u32) -> Self {
        self.max_width = width;
        self.max_height = height;
        self
    }

    pub fn render_options(&self) -> &RenderOptions {
        &self.render
    }

    /// Tile an already prepared buffer.
    pub fn tile(&self, buffer: &PixelBuffer) -> TilingResult {
        self.tiler.tile(buffer)
    }

    /// Downsize `image` to the configured bounds, then tile it.
    pub fn convert(&self, image: &image::DynamicImage) -> TilingResult {
        let buffer = source::prepare(image, self.max_width, self.max_height);
        self.tile(&buffer)
    }

    pub fn export(&self, result: &TilingResult, format: ExportFormat) -> Result<Vec<u8>> {
        render::export(result, format, &self.render)
    }
}
