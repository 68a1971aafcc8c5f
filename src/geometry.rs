//! Hexagon geometry for the offset-row honeycomb layout.
//!
//! Cells are vertex-up: the six corners sit at 60°·i − 30°, so every row
//! interlocks with the rows above and below when odd rows are shifted by
//! half a hexagon width.

use crate::{HoneycombError, Result};

pub const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Fraction of the hex size used as the half-width of the square sampling window.
const SAMPLE_RADIUS_FACTOR: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexGeometry {
    size: f64,
}

impl HexGeometry {
    /// `size` is the circumradius (center to vertex) of every cell.
    pub fn new(size: f64) -> Result<Self> {
        if !size.is_finite() || size <= 0.0 {
            return Err(HoneycombError::InvalidHexSize(size));
        }
        Ok(Self { size })
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn width(&self) -> f64 {
        SQRT_3 * self.size
    }

    pub fn height(&self) -> f64 {
        2.0 * self.size
    }

    /// Distance between the centers of vertically adjacent rows.
    pub fn vert_dist(&self) -> f64 {
        0.75 * self.height()
    }

    /// Distance between the centers of neighbors in the same row.
    pub fn horiz_dist(&self) -> f64 {
        self.width()
    }

    /// Center-to-edge distance.
    pub fn apothem(&self) -> f64 {
        self.width() / 2.0
    }

    /// Image-space center of the cell at (col, row).
    pub fn center(&self, col: i32, row: i32) -> (f64, f64) {
        let offset = if row % 2 != 0 { self.width() / 2.0 } else { 0.0 };
        let x = col as f64 * self.horiz_dist() + offset + self.size;
        let y = row as f64 * self.vert_dist() + self.size;
        (x, y)
    }

    /// Half-width of the square neighborhood averaged by the color sampler.
    pub fn sample_radius(&self) -> i64 {
        (self.size * SAMPLE_RADIUS_FACTOR).floor() as i64
    }

    pub fn vertices(&self, x: f64, y: f64) -> [(f64, f64); 6] {
        hexagon_points(x, y, self.size)
    }

    /// Signed distance from an offset (relative to the center) to the
    /// nearest edge: positive inside, zero on the boundary, negative outside.
    pub fn edge_distance(&self, dx: f64, dy: f64) -> f64 {
        let along_x = dx.abs();
        let rising = (0.5 * dx + 0.5 * SQRT_3 * dy).abs();
        let falling = (0.5 * dx - 0.5 * SQRT_3 * dy).abs();
        self.apothem() - along_x.max(rising).max(falling)
    }

    pub fn contains(&self, dx: f64, dy: f64) -> bool {
        // Tolerance keeps exact vertices inside despite rounding in the normals.
        self.edge_distance(dx, dy) >= -1e-9
    }
}

/// Corners of a vertex-up hexagon centered at (x, y) with circumradius `size`.
pub fn hexagon_points(x: f64, y: f64, size: f64) -> [(f64, f64); 6] {
    let mut points = [(0.0, 0.0); 6];
    for (i, point) in points.iter_mut().enumerate() {
        let angle = (60.0 * i as f64 - 30.0).to_radians();
        *point = (x + size * angle.cos(), y + size * angle.sin());
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rejects_non_positive_sizes() {
        assert!(HexGeometry::new(0.0).is_err());
        assert!(HexGeometry::new(-3.0).is_err());
        assert!(HexGeometry::new(f64::NAN).is_err());
        assert!(HexGeometry::new(f64::INFINITY).is_err());
    }

    #[test]
    fn pitches_follow_hex_size() {
        let geom = HexGeometry::new(10.0).unwrap();
        assert_relative_eq!(geom.horiz_dist(), 17.320508075688775, epsilon = 1e-12);
        assert_relative_eq!(geom.vert_dist(), 15.0);
        assert_relative_eq!(geom.height(), 20.0);
    }

    #[test]
    fn odd_rows_shift_by_half_width() {
        let geom = HexGeometry::new(4.0).unwrap();
        let (x0, y0) = geom.center(0, 0);
        let (x1, y1) = geom.center(0, 1);
        let (xm, _) = geom.center(0, -1);
        assert_relative_eq!(x0, 4.0);
        assert_relative_eq!(y0, 4.0);
        assert_relative_eq!(x1 - x0, geom.width() / 2.0);
        assert_relative_eq!(xm - x0, geom.width() / 2.0);
        assert_relative_eq!(y1 - y0, 6.0);
    }

    #[test]
    fn sample_radius_floors() {
        assert_eq!(HexGeometry::new(12.0).unwrap().sample_radius(), 8);
        assert_eq!(HexGeometry::new(1.0).unwrap().sample_radius(), 0);
        assert_eq!(HexGeometry::new(2.0).unwrap().sample_radius(), 1);
    }

    #[test]
    fn vertices_lie_on_the_boundary() {
        let geom = HexGeometry::new(5.0).unwrap();
        for (x, y) in geom.vertices(0.0, 0.0) {
            assert_relative_eq!((x * x + y * y).sqrt(), 5.0, epsilon = 1e-9);
            assert_relative_eq!(geom.edge_distance(x, y), 0.0, epsilon = 1e-9);
            assert!(geom.contains(x, y));
        }
        // Top and bottom corners are vertical.
        let points = hexagon_points(0.0, 0.0, 5.0);
        assert_relative_eq!(points[2].0, 0.0, epsilon = 1e-9);
        assert_relative_eq!(points[2].1, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn containment() {
        let geom = HexGeometry::new(10.0).unwrap();
        assert!(geom.contains(0.0, 0.0));
        assert!(geom.contains(8.6, 0.0));
        assert!(!geom.contains(8.7, 0.0));
        assert!(geom.contains(0.0, 9.9));
        assert!(!geom.contains(0.0, 10.1));
        assert!(!geom.contains(8.0, 8.0));
    }
}
