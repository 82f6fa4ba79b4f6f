//! Per-point color rules.
//!
//! Sphere points get a depth gradient (z mapped into a cool hue band); text
//! points get a warm, lightly varied hue; filler points get one dim slate.
//! Everything here is a pure function of its inputs.

use crate::point_set::{Point, Rgb};

/// Color for particles that are not part of the current shape.
pub const FILLER_COLOR: Rgb = [0.10, 0.11, 0.16];

/// Hue band (in turns) for the sphere depth gradient, back to front.
const SPHERE_HUE_BACK: f32 = 0.62;
const SPHERE_HUE_FRONT: f32 = 0.84;

/// Warm band for text; index-derived variation stays within +/- this width.
const TEXT_HUE_CENTER: f32 = 0.09;
const TEXT_HUE_SPREAD: f32 = 0.035;

/// Depth gradient for a sphere point. `radius` normalizes z into [-1, 1];
/// points off the nominal surface are clamped into the band.
pub fn color_for_sphere_point(point: Point, radius: f32) -> Rgb {
    let depth = if radius > 0.0 {
        (point[2] / radius).clamp(-1.0, 1.0)
    } else {
        0.0
    };
    let t = (depth + 1.0) * 0.5;
    let hue = SPHERE_HUE_BACK + (SPHERE_HUE_FRONT - SPHERE_HUE_BACK) * t;
    hsl_to_rgb(hue, 0.75, 0.45 + 0.2 * t)
}

/// Warm hue for a text point, varied deterministically by index and by the
/// point's height so neighbouring glyph pixels shimmer slightly.
pub fn color_for_text_point(point: Point, index: usize) -> Rgb {
    let jitter = unit_hash(index as u32) * 2.0 - 1.0;
    let lift = (point[1] * 0.01).clamp(-0.05, 0.05);
    let hue = TEXT_HUE_CENTER + TEXT_HUE_SPREAD * jitter;
    hsl_to_rgb(hue, 0.95, 0.62 + lift)
}

/// HSL (all components in 0..1, hue in turns) to linear RGB.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Rgb {
    let h = fract01(h);
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);
    if s == 0.0 {
        return [l, l, l];
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    [
        hue_to_channel(p, q, h + 1.0 / 3.0),
        hue_to_channel(p, q, h),
        hue_to_channel(p, q, h - 1.0 / 3.0),
    ]
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = fract01(t);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn fract01(x: f32) -> f32 {
    let f = x - x.floor();
    if f < 0.0 {
        f + 1.0
    } else {
        f
    }
}

/// Integer hash mapped to [0, 1).
fn unit_hash(mut x: u32) -> f32 {
    x ^= x >> 16;
    x = x.wrapping_mul(0x7feb_352d);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846c_a68b);
    x ^= x >> 16;
    (x >> 8) as f32 / (1u32 << 24) as f32
}
