//! Tiling pipeline: grid candidates -> sampled colors -> framed output cells.

use serde::Serialize;

use crate::geometry::HexGeometry;
use crate::grid::{Candidate, GridGenerator};
use crate::sample::{ColorSampler, PixelBuffer, Rgb, SamplingMask};
use crate::Result;

/// A kept hexagon. After tiling, (x, y) is in output-frame coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HexCell {
    pub col: i32,
    pub row: i32,
    pub x: f64,
    pub y: f64,
    pub color: Rgb,
}

/// Output canvas size and the translation applied to image-space centers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub offset_x: f64,
    pub offset_y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TilingResult {
    hex_size: f64,
    source_width: u32,
    source_height: u32,
    cells: Vec<HexCell>,
    frame: Option<Frame>,
}

/// Counts shown alongside a rendered mosaic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub hexagons: usize,
    pub hex_size: f64,
    pub source_width: u32,
    pub source_height: u32,
    pub output_width: u32,
    pub output_height: u32,
}

impl TilingResult {
    /// Kept cells in row-major generation order.
    pub fn cells(&self) -> &[HexCell] {
        &self.cells
    }

    /// `None` when no cell was kept: there is nothing to draw.
    pub fn frame(&self) -> Option<Frame> {
        self.frame
    }

    pub fn hex_size(&self) -> f64 {
        self.hex_size
    }

    pub fn source_dimensions(&self) -> (u32, u32) {
        (self.source_width, self.source_height)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn summary(&self) -> Summary {
        let (output_width, output_height) = self.frame.map_or((0, 0), |f| (f.width, f.height));
        Summary {
            hexagons: self.cells.len(),
            hex_size: self.hex_size,
            source_width: self.source_width,
            source_height: self.source_height,
            output_width,
            output_height,
        }
    }
}

/// Runs the tiling pipeline for one hex size.
#[derive(Debug, Clone, Copy)]
pub struct Tiler {
    geometry: HexGeometry,
    mask: SamplingMask,
    parallel: bool,
}

impl Tiler {
    pub fn new(hex_size: f64) -> Result<Self> {
        Ok(Self {
            geometry: HexGeometry::new(hex_size)?,
            mask: SamplingMask::Square,
            parallel: false,
        })
    }

    pub fn with_mask(mut self, mask: SamplingMask) -> Self {
        self.mask = mask;
        self
    }

    /// Sample cells on the rayon pool. Output order is unchanged.
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    pub fn tile(&self, buffer: &PixelBuffer) -> TilingResult {
        let (width, height) = buffer.dimensions();
        let candidates = GridGenerator::new(self.geometry, width, height).candidates();
        let sampler = ColorSampler::new(buffer, self.geometry, self.mask);

        let mut cells = self.sample_all(&sampler, &candidates);
        log::debug!("kept {} of {} candidates", cells.len(), candidates.len());

        let frame = frame_for(&cells, self.geometry.size());
        if let Some(frame) = frame {
            for cell in &mut cells {
                cell.x += frame.offset_x;
                cell.y += frame.offset_y;
            }
        }

        TilingResult {
            hex_size: self.geometry.size(),
            source_width: width,
            source_height: height,
            cells,
            frame,
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn sample_all(&self, sampler: &ColorSampler<'_>, candidates: &[Candidate]) -> Vec<HexCell> {
        if self.parallel {
            use rayon::prelude::*;
            // Indexed collect keeps generation order.
            return candidates.par_iter().filter_map(|c| sample_cell(sampler, c)).collect();
        }
        candidates.iter().filter_map(|c| sample_cell(sampler, c)).collect()
    }

    #[cfg(target_arch = "wasm32")]
    fn sample_all(&self, sampler: &ColorSampler<'_>, candidates: &[Candidate]) -> Vec<HexCell> {
        candidates.iter().filter_map(|c| sample_cell(sampler, c)).collect()
    }
}

/// Tile `buffer` with hexagons of circumradius `hex_size` using the default
/// square sampling mask.
pub fn tile(buffer: &PixelBuffer, hex_size: f64) -> Result<TilingResult> {
    Ok(Tiler::new(hex_size)?.tile(buffer))
}

fn sample_cell(sampler: &ColorSampler<'_>, candidate: &Candidate) -> Option<HexCell> {
    let color = sampler.sample(candidate.x, candidate.y)?;
    Some(HexCell {
        col: candidate.col,
        row: candidate.row,
        x: candidate.x,
        y: candidate.y,
        color,
    })
}

/// Tight frame around the cells' circumscribing boxes with a margin of one
/// hex size on every side.
fn frame_for(cells: &[HexCell], size: f64) -> Option<Frame> {
    if cells.is_empty() {
        return None;
    }

    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for cell in cells {
        min_x = min_x.min(cell.x - size);
        min_y = min_y.min(cell.y - size);
        max_x = max_x.max(cell.x + size);
        max_y = max_y.max(cell.y + size);
    }

    Some(Frame {
        width: (max_x - min_x + 2.0 * size).ceil() as u32,
        height: (max_y - min_y + 2.0 * size).ceil() as u32,
        offset_x: -min_x + size,
        offset_y: -min_y + size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use image::{Rgba, RgbaImage};

    fn cell(x: f64, y: f64) -> HexCell {
        HexCell { col: 0, row: 0, x, y, color: Rgb::new(0, 0, 0) }
    }

    #[test]
    fn no_cells_no_frame() {
        assert_eq!(frame_for(&[], 4.0), None);
    }

    #[test]
    fn frame_adds_one_size_margin() {
        let frame = frame_for(&[cell(2.0, 3.0), cell(10.5, -1.0)], 2.0).unwrap();
        // x: [0, 12.5] + 4 -> 16.5, y: [-3, 5] + 4 -> 12
        assert_eq!(frame.width, 17);
        assert_eq!(frame.height, 12);
        assert_relative_eq!(frame.offset_x, 2.0);
        assert_relative_eq!(frame.offset_y, 5.0);
    }

    #[test]
    fn cells_are_translated_into_the_frame() {
        let buffer = RgbaImage::from_pixel(30, 20, Rgba([1, 2, 3, 255]));
        let result = tile(&buffer, 5.0).unwrap();
        let frame = result.frame().unwrap();
        let min_x = result.cells().iter().map(|c| c.x).fold(f64::INFINITY, f64::min);
        let min_y = result.cells().iter().map(|c| c.y).fold(f64::INFINITY, f64::min);
        assert_relative_eq!(min_x, 10.0, epsilon = 1e-9);
        assert_relative_eq!(min_y, 10.0, epsilon = 1e-9);
        for c in result.cells() {
            assert!(c.x + 10.0 <= frame.width as f64 + 1e-9);
            assert!(c.y + 10.0 <= frame.height as f64 + 1e-9);
        }
    }

    #[test]
    fn summary_of_empty_result() {
        let buffer = RgbaImage::new(3, 3);
        let summary = tile(&buffer, 2.0).unwrap().summary();
        assert_eq!(summary.hexagons, 0);
        assert_eq!((summary.output_width, summary.output_height), (0, 0));
        assert_eq!((summary.source_width, summary.source_height), (3, 3));
    }

    #[test]
    fn invalid_hex_size_is_rejected() {
        let buffer = RgbaImage::new(3, 3);
        assert!(tile(&buffer, 0.0).is_err());
        assert!(tile(&buffer, -1.0).is_err());
    }

    #[test]
    fn parallel_matches_sequential() {
        let buffer = RgbaImage::from_fn(64, 48, |x, y| {
            Rgba([(x * 4) as u8, (y * 5) as u8, 7, ((x + y) % 3 * 120) as u8])
        });
        let tiler = Tiler::new(4.0).unwrap();
        assert_eq!(tiler.tile(&buffer), tiler.with_parallel(true).tile(&buffer));
    }
}
