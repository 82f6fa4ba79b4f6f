//! Easing curves for morph transitions.
//!
//! A transition evaluates its curve once per frame to get a single eased
//! progress scalar, then blends whole buffers with it (see
//! [`functions::lerp_buffer`]).

pub mod functions;

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use functions::bezier_ease_t;

#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    #[default]
    EaseInOutCubic,
    EaseOutExpo,
    EaseInOutSine,
    /// CSS-style timing curve with control points (x1, y1, x2, y2).
    CubicBezier([f32; 4]),
    /// Host-provided curve; not serializable.
    #[serde(skip)]
    Custom(fn(f32) -> f32),
}

/// `Custom` curves are opaque and never compare equal, not even to themselves.
impl PartialEq for Easing {
    fn eq(&self, other: &Self) -> bool {
        use Easing::*;
        match (self, other) {
            (CubicBezier(a), CubicBezier(b)) => a == b,
            (Custom(_), _) | (_, Custom(_)) => false,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl Easing {
    /// Map linear progress to eased progress. Input is clamped to [0, 1].
    pub fn apply(self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Easing::Linear => t,
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseOutExpo => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2f32.powf(-10.0 * t)
                }
            }
            Easing::EaseInOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Easing::CubicBezier([x1, y1, x2, y2]) => bezier_ease_t(t, x1, y1, x2, y2),
            Easing::Custom(f) => f(t),
        }
    }
}
