//! Grid generation - enumerates hexagon centers covering the image rectangle.

use crate::geometry::HexGeometry;

/// Extra cells enumerated beyond each side of the image.
pub const PADDING: i32 = 3;

/// A hexagon position before color sampling decides whether it is kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub col: i32,
    pub row: i32,
    pub x: f64,
    pub y: f64,
}

pub struct GridGenerator {
    geometry: HexGeometry,
    width: u32,
    height: u32,
}

impl GridGenerator {
    pub fn new(geometry: HexGeometry, width: u32, height: u32) -> Self {
        Self { geometry, width, height }
    }

    /// Unpadded (cols, rows) needed to span the image.
    pub fn dimensions(&self) -> (i32, i32) {
        let cols = (self.width as f64 / self.geometry.horiz_dist()).ceil() as i32;
        let rows = (self.height as f64 / self.geometry.vert_dist()).ceil() as i32;
        (cols, rows)
    }

    /// Candidates in row-major order. Empty when either image side is zero.
    pub fn candidates(&self) -> Vec<Candidate> {
        if self.width == 0 || self.height == 0 {
            return Vec::new();
        }

        let (cols, rows) = self.dimensions();
        let mut candidates = Vec::new();
        for row in -PADDING..rows + 2 * PADDING {
            for col in -PADDING..cols + 2 * PADDING {
                let (x, y) = self.geometry.center(col, row);
                if self.overlaps(x, y) {
                    candidates.push(Candidate { col, row, x, y });
                }
            }
        }

        log::debug!(
            "grid {}x{} (hex size {}): {} candidates",
            cols,
            rows,
            self.geometry.size(),
            candidates.len()
        );
        candidates
    }

    // Center within one hex size of the rectangle; a cheap stand-in for
    // exact hexagon/rectangle intersection.
    fn overlaps(&self, x: f64, y: f64) -> bool {
        let size = self.geometry.size();
        x >= -size
            && x < self.width as f64 + size
            && y >= -size
            && y < self.height as f64 + size
    }
}
