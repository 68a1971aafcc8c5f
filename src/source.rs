//! Source preparation - decodes and downsizes images into pixel buffers.

use std::path::Path;

use image::imageops::FilterType;
use image::DynamicImage;

use crate::render::ExportFormat;
use crate::sample::PixelBuffer;
use crate::Result;

pub const MAX_WIDTH: u32 = 800;
pub const MAX_HEIGHT: u32 = 600;
pub const DEFAULT_BASE_NAME: &str = "honeycomb-pixelart";

/// Largest size within `max_w` × `max_h` with the same aspect ratio.
/// Width is fitted first, then height; both are truncated and kept ≥ 1.
pub fn fit_within(width: u32, height: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    let (mut w, mut h) = (width as f64, height as f64);
    if w > max_w as f64 {
        h *= max_w as f64 / w;
        w = max_w as f64;
    }
    if h > max_h as f64 {
        w *= max_h as f64 / h;
        h = max_h as f64;
    }
    ((w.floor() as u32).max(1), (h.floor() as u32).max(1))
}

/// RGBA buffer of `image`, shrunk to fit when it exceeds the bounds.
pub fn prepare(image: &DynamicImage, max_w: u32, max_h: u32) -> PixelBuffer {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return image.to_rgba8();
    }
    let (w, h) = fit_within(width, height, max_w, max_h);
    if (w, h) == (width, height) {
        return image.to_rgba8();
    }
    log::info!("resizing source {}x{} -> {}x{}", width, height, w, h);
    image.resize_exact(w, h, FilterType::Triangle).to_rgba8()
}

pub fn load(path: impl AsRef<Path>, max_w: u32, max_h: u32) -> Result<PixelBuffer> {
    let image = image::open(path)?;
    Ok(prepare(&image, max_w, max_h))
}

/// File stem used to name exports.
pub fn base_name(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_BASE_NAME)
        .to_string()
}

/// Download name for an export of `base` in `format`.
pub fn output_file_name(base: &str, format: ExportFormat) -> String {
    match format {
        ExportFormat::Svg | ExportFormat::Json => {
            format!("{base}-honeycomb.{}", format.extension())
        }
        ExportFormat::Png | ExportFormat::Jpeg => {
            format!("{base}_honeycomb.{}", format.extension())
        }
    }
}
