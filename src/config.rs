//! Converter settings, loadable from a JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sample::SamplingMask;
use crate::source::{MAX_HEIGHT, MAX_WIDTH};
use crate::Result;

pub const DEFAULT_HEX_SIZE: f64 = 12.0;
pub const DEFAULT_RASTER_SCALE: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HoneycombConfig {
    /// Circumradius of each hexagon, in source pixels.
    pub hex_size: f64,
    /// Draw cell outlines.
    pub stroke: bool,
    pub mask: SamplingMask,
    /// Sources larger than this are downsized before tiling.
    pub max_width: u32,
    pub max_height: u32,
    /// Pixels per frame unit for PNG/JPEG export.
    pub raster_scale: u32,
    pub parallel: bool,
}

impl Default for HoneycombConfig {
    fn default() -> Self {
        Self {
            hex_size: DEFAULT_HEX_SIZE,
            stroke: true,
            mask: SamplingMask::Square,
            max_width: MAX_WIDTH,
            max_height: MAX_HEIGHT,
            raster_scale: DEFAULT_RASTER_SCALE,
            parallel: false,
        }
    }
}

impl HoneycombConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }
}
