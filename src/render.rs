//! Rendering a tiling to SVG markup or to a raster image, and encoding the
//! result for export.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use svg::node::element::Polygon;
use svg::Document;

use crate::geometry::{hexagon_points, HexGeometry};
use crate::sample::Rgb;
use crate::tiling::{Frame, TilingResult};
use crate::{HoneycombError, Result};

const STROKE_COLOR: &str = "rgba(0,0,0,0.15)";
const STROKE_OPACITY: f64 = 0.15;
const STROKE_WIDTH: f64 = 0.5;
const JPEG_QUALITY: u8 = 95;
const JPEG_BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
/// Largest raster canvas, in pixels (1 GiB of RGBA).
const MAX_RASTER_PIXELS: u64 = 1 << 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Svg,
    Png,
    Jpeg,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Json => "json",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Svg => "image/svg+xml",
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Json => "application/json",
        }
    }
}

/// Drawing options shared by the SVG and raster paths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Outline every hexagon with a faint dark stroke.
    pub stroke: bool,
    /// Integer upscaling factor for raster output.
    pub scale: u32,
    /// Opaque fill behind the hexagons. `None` keeps the gaps transparent.
    pub background: Option<Rgba<u8>>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { stroke: true, scale: 2, background: None }
    }
}

fn frame_of(result: &TilingResult) -> Result<Frame> {
    result.frame().ok_or(HoneycombError::EmptyTiling)
}

/// SVG document with one polygon per cell, in generation order.
pub fn to_svg(result: &TilingResult, stroke: bool) -> Result<Document> {
    let frame = frame_of(result)?;
    let size = result.hex_size();

    let mut document = Document::new()
        .set("width", frame.width)
        .set("height", frame.height)
        .set("viewBox", (0, 0, frame.width, frame.height));

    for cell in result.cells() {
        let points = hexagon_points(cell.x, cell.y, size)
            .iter()
            .map(|(x, y)| format!("{x},{y}"))
            .collect::<Vec<_>>()
            .join(" ");
        document = document.add(
            Polygon::new()
                .set("points", points)
                .set("fill", cell.color.to_string())
                .set("stroke", if stroke { STROKE_COLOR } else { "none" })
                .set("stroke-width", STROKE_WIDTH),
        );
    }

    Ok(document)
}

pub fn to_svg_string(result: &TilingResult, stroke: bool) -> Result<String> {
    Ok(to_svg(result, stroke)?.to_string())
}

/// Rasterize the mosaic at `options.scale` pixels per frame unit.
///
/// A pixel belongs to a hexagon when its center lies inside it. With
/// strokes enabled, pixels closer than half the stroke width to an edge are
/// darkened the way the SVG outline would darken them.
pub fn rasterize(result: &TilingResult, options: &RenderOptions) -> Result<RgbaImage> {
    let frame = frame_of(result)?;
    let (out_w, out_h) = raster_size(&frame, options.scale)?;
    let geometry = HexGeometry::new(result.hex_size())?;
    let size = geometry.size();
    let scale = options.scale as f64;

    let mut image = match options.background {
        Some(bg) => RgbaImage::from_pixel(out_w, out_h, bg),
        None => RgbaImage::new(out_w, out_h),
    };

    for cell in result.cells() {
        let fill = opaque(cell.color);
        let edge = opaque(darken(cell.color));

        let x0 = ((cell.x - size) * scale).floor().max(0.0) as u32;
        let y0 = ((cell.y - size) * scale).floor().max(0.0) as u32;
        let x1 = (((cell.x + size) * scale).ceil() as u32).min(out_w);
        let y1 = (((cell.y + size) * scale).ceil() as u32).min(out_h);

        for py in y0..y1 {
            let dy = (py as f64 + 0.5) / scale - cell.y;
            for px in x0..x1 {
                let dx = (px as f64 + 0.5) / scale - cell.x;
                let distance = geometry.edge_distance(dx, dy);
                if distance < 0.0 {
                    continue;
                }
                let on_edge = options.stroke && distance < STROKE_WIDTH / 2.0;
                image.put_pixel(px, py, if on_edge { edge } else { fill });
            }
        }
    }

    Ok(image)
}

/// Canvas size for `frame` upscaled by `scale`, rejecting zero scales and
/// canvases too large to allocate.
fn raster_size(frame: &Frame, scale: u32) -> Result<(u32, u32)> {
    let width = frame.width.checked_mul(scale);
    let height = frame.height.checked_mul(scale);
    match (width, height) {
        (Some(w), Some(h)) if scale > 0 && w as u64 * h as u64 <= MAX_RASTER_PIXELS => Ok((w, h)),
        _ => Err(HoneycombError::InvalidScale(scale)),
    }
}

/// Encode the mosaic in `format`. JPEG always gets an opaque white
/// background; PNG keeps whatever `options.background` says.
pub fn export(
    result: &TilingResult,
    format: ExportFormat,
    options: &RenderOptions,
) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Svg => Ok(to_svg_string(result, options.stroke)?.into_bytes()),
        ExportFormat::Json => {
            frame_of(result)?;
            Ok(serde_json::to_vec_pretty(result)?)
        }
        ExportFormat::Png => {
            let image = rasterize(result, options)?;
            let mut bytes = Vec::new();
            DynamicImage::ImageRgba8(image).write_with_encoder(PngEncoder::new(&mut bytes))?;
            Ok(bytes)
        }
        ExportFormat::Jpeg => {
            let options = RenderOptions { background: Some(JPEG_BACKGROUND), ..*options };
            let image = DynamicImage::ImageRgba8(rasterize(result, &options)?).to_rgb8();
            let mut bytes = Vec::new();
            DynamicImage::ImageRgb8(image)
                .write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY))?;
            Ok(bytes)
        }
    }
}

fn opaque(color: Rgb) -> Rgba<u8> {
    Rgba([color.r, color.g, color.b, 255])
}

fn darken(color: Rgb) -> Rgb {
    let mix = |c: u8| (c as f64 * (1.0 - STROKE_OPACITY)).round() as u8;
    Rgb::new(mix(color.r), mix(color.g), mix(color.b))
}
