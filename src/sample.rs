//! Color sampling - averages the visible source pixels under a cell.

use std::fmt;
use std::ops::RangeInclusive;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::geometry::HexGeometry;

/// Decoded RGBA source pixels. The tiler only reads it.
pub type PixelBuffer = RgbaImage;

/// Opaque output color of a kept cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Which source pixels around a cell center contribute to its color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplingMask {
    /// Square window of half-width `floor(0.7 * size)`. Cheap, and close
    /// enough to the hexagon footprint for mosaics.
    #[default]
    Square,
    /// Every pixel whose offset falls inside the cell's hexagon.
    Hexagon,
}

pub struct ColorSampler<'a> {
    buffer: &'a PixelBuffer,
    geometry: HexGeometry,
    mask: SamplingMask,
}

impl<'a> ColorSampler<'a> {
    pub fn new(buffer: &'a PixelBuffer, geometry: HexGeometry, mask: SamplingMask) -> Self {
        Self { buffer, geometry, mask }
    }

    /// Color for a cell centered at (x, y) in image space. The center is
    /// clamped into the image first, so cells hanging off an edge sample the
    /// nearest border region. `None` means the cell should be dropped.
    pub fn sample(&self, x: f64, y: f64) -> Option<Rgb> {
        let (width, height) = self.buffer.dimensions();
        if width == 0 || height == 0 {
            return None;
        }
        let cx = x.clamp(0.0, (width - 1) as f64);
        let cy = y.clamp(0.0, (height - 1) as f64);

        match self.mask {
            SamplingMask::Square => {
                average_color(self.buffer, cx, cy, self.geometry.sample_radius())
            }
            SamplingMask::Hexagon => {
                let radius = self.geometry.size().ceil() as i64;
                average_where(self.buffer, cx, cy, radius, |dx, dy| {
                    self.geometry.contains(dx as f64, dy as f64)
                })
            }
        }
    }
}

/// Mean color of the non-transparent pixels in the square window of
/// half-width `radius` around (cx, cy).
pub fn average_color(buffer: &PixelBuffer, cx: f64, cy: f64, radius: i64) -> Option<Rgb> {
    average_where(buffer, cx, cy, radius, |_, _| true)
}

fn average_where(
    buffer: &PixelBuffer,
    cx: f64,
    cy: f64,
    radius: i64,
    keep: impl Fn(i64, i64) -> bool,
) -> Option<Rgb> {
    let (width, height) = (buffer.width() as f64, buffer.height() as f64);
    let (mut total_r, mut total_g, mut total_b) = (0u64, 0u64, 0u64);
    let mut count = 0u64;

    for dy in window(cy, height, radius) {
        let sy = cy + dy as f64;
        if sy < 0.0 || sy >= height {
            continue;
        }
        for dx in window(cx, width, radius) {
            let sx = cx + dx as f64;
            if sx < 0.0 || sx >= width || !keep(dx, dy) {
                continue;
            }
            let [r, g, b, a] = buffer.get_pixel(sx.floor() as u32, sy.floor() as u32).0;
            // Fully transparent pixels are holes, not black.
            if a == 0 {
                continue;
            }
            total_r += r as u64;
            total_g += g as u64;
            total_b += b as u64;
            count += 1;
        }
    }

    if count == 0 {
        return None;
    }
    Some(Rgb::new(
        channel_mean(total_r, count),
        channel_mean(total_g, count),
        channel_mean(total_b, count),
    ))
}

/// Offsets in `-radius..=radius` that keep `center + offset` inside `[0, extent)`.
fn window(center: f64, extent: f64, radius: i64) -> RangeInclusive<i64> {
    let lo = (-center).ceil() as i64;
    let hi = (extent - center).ceil() as i64 - 1;
    lo.max(-radius)..=hi.min(radius)
}

fn channel_mean(total: u64, count: u64) -> u8 {
    (total as f64 / count as f64).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(width: u32, height: u32, pixel: [u8; 4]) -> PixelBuffer {
        RgbaImage::from_pixel(width, height, Rgba(pixel))
    }

    #[test]
    fn displays_as_css() {
        assert_eq!(Rgb::new(255, 8, 0).to_string(), "rgb(255, 8, 0)");
    }

    #[test]
    fn solid_color_averages_to_itself() {
        let buffer = solid(10, 10, [12, 200, 77, 255]);
        assert_eq!(average_color(&buffer, 5.0, 5.0, 3), Some(Rgb::new(12, 200, 77)));
    }

    #[test]
    fn transparent_pixels_are_ignored() {
        let mut buffer = solid(3, 3, [0, 0, 0, 0]);
        buffer.put_pixel(0, 0, Rgba([100, 100, 100, 255]));
        buffer.put_pixel(2, 2, Rgba([200, 50, 0, 1]));
        assert_eq!(average_color(&buffer, 1.0, 1.0, 1), Some(Rgb::new(150, 75, 50)));
    }

    #[test]
    fn fully_transparent_window_yields_none() {
        let buffer = solid(4, 4, [255, 255, 255, 0]);
        assert_eq!(average_color(&buffer, 2.0, 2.0, 2), None);
    }

    #[test]
    fn mean_rounds_half_up() {
        let mut buffer = solid(2, 1, [0, 0, 0, 255]);
        buffer.put_pixel(1, 0, Rgba([1, 3, 254, 255]));
        // (0 + 1) / 2 = 0.5, (0 + 3) / 2 = 1.5, 254 / 2 = 127
        assert_eq!(average_color(&buffer, 0.0, 0.0, 1), Some(Rgb::new(1, 2, 127)));
    }

    #[test]
    fn window_is_cut_at_the_border() {
        let mut buffer = solid(5, 5, [0, 0, 0, 255]);
        buffer.put_pixel(0, 0, Rgba([90, 90, 90, 255]));
        // Only (0,0), (1,0), (0,1), (1,1) are inside.
        assert_eq!(average_color(&buffer, 0.0, 0.0, 1), Some(Rgb::new(23, 23, 23)));
    }

    #[test]
    fn window_stays_inside_the_image() {
        assert_eq!(window(3.5, 8.0, 2), -2..=2);
        assert_eq!(window(3.5, 8.0, 10), -3..=4);
        assert_eq!(window(3.0, 8.0, 10), -3..=4);
        assert_eq!(window(0.0, 1.0, i64::MAX), 0..=0);
    }

    #[test]
    fn huge_radius_reads_only_the_image() {
        let mut buffer = solid(5, 5, [10, 10, 10, 255]);
        buffer.put_pixel(4, 4, Rgba([60, 60, 60, 255]));
        // Would take forever if the full window were walked.
        assert_eq!(average_color(&buffer, 2.0, 2.0, i64::MAX), Some(Rgb::new(12, 12, 12)));
        let bounded = average_color(&buffer, 2.0, 2.0, 4);
        assert_eq!(average_color(&buffer, 2.0, 2.0, i64::MAX), bounded);
    }

    #[test]
    fn sampler_clamps_centers() {
        let buffer = solid(4, 4, [9, 9, 9, 255]);
        let geometry = HexGeometry::new(2.0).unwrap();
        let sampler = ColorSampler::new(&buffer, geometry, SamplingMask::Square);
        assert_eq!(sampler.sample(-7.5, 100.0), Some(Rgb::new(9, 9, 9)));
    }

    #[test]
    fn empty_buffer_yields_none() {
        let buffer = RgbaImage::new(0, 0);
        let geometry = HexGeometry::new(2.0).unwrap();
        let sampler = ColorSampler::new(&buffer, geometry, SamplingMask::Square);
        assert_eq!(sampler.sample(0.0, 0.0), None);
    }

    #[test]
    fn hexagon_mask_skips_corners() {
        // Opaque only in the far corners of the window: the square mask sees
        // them, the hexagon mask does not.
        let mut buffer = solid(21, 21, [0, 0, 0, 0]);
        for (x, y) in [(0, 0), (20, 0), (0, 20), (20, 20)] {
            buffer.put_pixel(x, y, Rgba([255, 0, 0, 255]));
        }
        let geometry = HexGeometry::new(10.0).unwrap();
        let hexagon = ColorSampler::new(&buffer, geometry, SamplingMask::Hexagon);
        assert_eq!(hexagon.sample(10.0, 10.0), None);
        assert_eq!(average_color(&buffer, 10.0, 10.0, 10), Some(Rgb::new(255, 0, 0)));
    }

    #[test]
    fn mask_parses_from_lowercase() {
        let mask: SamplingMask = serde_json::from_str("\"hexagon\"").unwrap();
        assert_eq!(mask, SamplingMask::Hexagon);
    }
}
