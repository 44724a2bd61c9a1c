//! Pixel-level primitives: signed distances, coverage tests and blending.
//!
//! Every pixel is sampled once at its centre, so output depends only on the
//! layer list.

use image::{Rgba, RgbaImage};

use crate::canvas::Colour;

/// Pixel rectangle clipped to an image, `max_*` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl Bounds {
    /// Pixels touching `[left, right) x [top, bottom)`, or `None` when the
    /// box misses the image entirely.
    pub fn clipped(left: f32, top: f32, right: f32, bottom: f32, image: &RgbaImage) -> Option<Self> {
        let clamp = |v: f32, max: u32| v.clamp(0.0, max as f32) as u32;

        let bounds = Self {
            min_x: clamp(left.floor(), image.width()),
            min_y: clamp(top.floor(), image.height()),
            max_x: clamp(right.ceil(), image.width()),
            max_y: clamp(bottom.ceil(), image.height()),
        };
        (bounds.min_x < bounds.max_x && bounds.min_y < bounds.max_y).then_some(bounds)
    }

    /// Row-major pixel coordinates.
    pub fn pixels(self) -> impl Iterator<Item = (u32, u32)> {
        (self.min_y..self.max_y).flat_map(move |y| (self.min_x..self.max_x).map(move |x| (x, y)))
    }
}

/// Centre of pixel `(x, y)`.
pub fn centre(x: u32, y: u32) -> (f32, f32) {
    (x as f32 + 0.5, y as f32 + 0.5)
}

/// Signed distance from a circle's edge; negative inside.
pub fn circle(px: f32, py: f32, cx: f32, cy: f32, radius: f32) -> f32 {
    (px - cx).hypot(py - cy) - radius
}

/// Signed distance from a rounded rectangle's edge; negative inside.
///
/// The corner radius is clamped to half the shorter side.
pub fn rounded_rect(px: f32, py: f32, left: f32, top: f32, width: f32, height: f32, radius: f32) -> f32 {
    let half_w = width / 2.0;
    let half_h = height / 2.0;
    let r = radius.clamp(0.0, half_w.min(half_h));

    let qx = (px - (left + half_w)).abs() - (half_w - r);
    let qy = (py - (top + half_h)).abs() - (half_h - r);

    let outside = qx.max(0.0).hypot(qy.max(0.0));
    let inside = qx.max(qy).min(0.0);
    outside + inside - r
}

/// Angle of a vector in degrees, clockwise from +x on a y-down grid, in `[0, 360)`.
pub fn angle_of(dx: f32, dy: f32) -> f32 {
    dy.atan2(dx).to_degrees().rem_euclid(360.0)
}

/// Whether `angle` lies on the clockwise sweep from `start` to `end`.
pub fn in_sweep(angle: f32, start: f32, end: f32) -> bool {
    if (end - start).abs() >= 360.0 {
        return true;
    }
    let sweep = (end - start).rem_euclid(360.0);
    (angle - start).rem_euclid(360.0) <= sweep
}

/// Composite `colour` over `pixel` (source-over, straight alpha).
pub fn blend(pixel: &mut Rgba<u8>, colour: Colour, coverage: f32) {
    let sa = f32::from(colour.a) / 255.0 * coverage.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }

    let [dr, dg, db, da] = pixel.0;
    let da = f32::from(da) / 255.0;
    let out_a = sa + da * (1.0 - sa);

    let mix = |s: u8, d: u8| {
        let v = (f32::from(s) * sa + f32::from(d) * da * (1.0 - sa)) / out_a;
        v.round().clamp(0.0, 255.0) as u8
    };

    pixel.0 = [
        mix(colour.r, dr),
        mix(colour.g, dg),
        mix(colour.b, db),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ];
}

/// Blend `colour` into every pixel in `bounds` whose centre distance passes `covers`.
///
/// `distance` returns `None` for pixels masked out entirely.
pub fn paint(
    image: &mut RgbaImage,
    bounds: Bounds,
    colour: Colour,
    distance: impl Fn(f32, f32) -> Option<f32>,
    covers: impl Fn(f32) -> bool,
) {
    if colour.is_transparent() {
        return;
    }
    for (x, y) in bounds.pixels() {
        let (px, py) = centre(x, y);
        if distance(px, py).is_some_and(&covers) {
            blend(image.get_pixel_mut(x, y), colour, 1.0);
        }
    }
}

/// Fill test, or a band of width `stroke` centred on the edge when unfilled.
pub fn body(filled: bool, stroke: f32) -> impl Fn(f32) -> bool {
    move |d| {
        if filled {
            d <= 0.0
        } else {
            d.abs() <= stroke / 2.0
        }
    }
}
