//! Placement of filler particles: indices past the end of the current
//! target point set.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::MorphError;
use crate::point_set::Point;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillerStrategy {
    /// Uniform-random inside a ball of `radius` centered at the origin.
    Scatter { radius: f32 },
    /// Filler particles stay where they are when the transition starts.
    KeepCurrent,
    /// Every filler particle collapses onto one point.
    Park { position: Point },
}

impl Default for FillerStrategy {
    fn default() -> Self {
        FillerStrategy::Scatter { radius: 18.0 }
    }
}

impl FillerStrategy {
    pub fn validate(&self) -> Result<(), MorphError> {
        match *self {
            FillerStrategy::Scatter { radius } if !radius.is_finite() || radius < 0.0 => Err(
                MorphError::InvalidConfiguration(format!("filler radius must be >= 0, got {radius}")),
            ),
            FillerStrategy::Park { position } if position.iter().any(|c| !c.is_finite()) => Err(
                MorphError::InvalidConfiguration("filler park position must be finite".into()),
            ),
            _ => Ok(()),
        }
    }

    /// Fill `out` (the filler slice of the target buffer). `current` is the
    /// matching slice of the live position buffer.
    pub fn fill<R: Rng + ?Sized>(&self, out: &mut [Point], current: &[Point], rng: &mut R) {
        match *self {
            FillerStrategy::Scatter { radius } => {
                for p in out.iter_mut() {
                    *p = random_in_ball(radius, rng);
                }
            }
            FillerStrategy::KeepCurrent => out.copy_from_slice(current),
            FillerStrategy::Park { position } => out.fill(position),
        }
    }
}

/// Uniform sample inside a ball: uniform direction, cube-root radius.
pub fn random_in_ball<R: Rng + ?Sized>(radius: f32, rng: &mut R) -> Point {
    let z: f32 = rng.gen_range(-1.0..=1.0);
    let phi: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
    let u: f32 = rng.gen();
    let r = radius * u.cbrt();
    let ring = (1.0 - z * z).max(0.0).sqrt();
    [r * ring * phi.cos(), r * ring * phi.sin(), r * z]
}
