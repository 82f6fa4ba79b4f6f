//! Configuration for the morph engine.
//!
//! Every section is `#[serde(default)]`, so hosts may pass a partial JSON
//! object and get defaults for the rest.

use serde::{Deserialize, Serialize};

use crate::error::MorphError;
use crate::filler::FillerStrategy;
use crate::interp::Easing;
use crate::raster::pixel_count;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorphConfig {
    /// Fixed particle count N; buffers never change length after creation.
    pub particle_count: usize,
    pub sphere: SphereConfig,
    pub text: TextSamplingConfig,
    pub transition: TransitionConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereConfig {
    pub radius: f32,
    /// Maximum per-axis offset applied to each sphere point.
    pub jitter: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSamplingConfig {
    pub font_size_px: u32,
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Minimum brightness (0..1) for a pixel to become a candidate.
    pub brightness_threshold: f32,
    /// Probability of keeping each candidate; 1.0 keeps all of them.
    pub keep_probability: f32,
    /// World units per raster pixel.
    pub world_scale: f32,
    /// Scan stride in pixels along both axes.
    pub sample_step: u32,
    /// Submitted text is cut to this many characters.
    pub max_chars: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    /// Seconds for sphere -> text. Non-positive snaps in one frame.
    pub to_text_seconds: f32,
    /// Seconds for text -> sphere. Non-positive snaps in one frame.
    pub to_sphere_seconds: f32,
    pub easing: Easing,
    /// Idle time at the text shape before returning to the sphere.
    pub text_hold_seconds: f32,
    pub auto_return: bool,
    pub filler: FillerStrategy,
}

impl Default for MorphConfig {
    fn default() -> Self {
        Self {
            particle_count: 12_000,
            sphere: SphereConfig::default(),
            text: TextSamplingConfig::default(),
            transition: TransitionConfig::default(),
        }
    }
}

impl Default for SphereConfig {
    fn default() -> Self {
        Self {
            radius: 10.0,
            jitter: 0.05,
        }
    }
}

impl Default for TextSamplingConfig {
    fn default() -> Self {
        Self {
            font_size_px: 48,
            canvas_width: 1024,
            canvas_height: 256,
            brightness_threshold: 0.5,
            keep_probability: 0.3,
            world_scale: 0.06,
            sample_step: 1,
            max_chars: 20,
        }
    }
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            to_text_seconds: 1.5,
            to_sphere_seconds: 1.5,
            easing: Easing::default(),
            text_hold_seconds: 4.0,
            auto_return: true,
            filler: FillerStrategy::default(),
        }
    }
}

fn invalid(msg: impl Into<String>) -> MorphError {
    MorphError::InvalidConfiguration(msg.into())
}

fn unit_range(name: &str, v: f32) -> Result<(), MorphError> {
    if !(0.0..=1.0).contains(&v) {
        return Err(invalid(format!("{name} must be within [0, 1], got {v}")));
    }
    Ok(())
}

impl MorphConfig {
    /// Parse a (possibly partial) JSON config and validate it.
    pub fn from_json_str(s: &str) -> Result<Self, MorphError> {
        let cfg: MorphConfig =
            serde_json::from_str(s).map_err(|e| MorphError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject settings that cannot produce a field. Durations are not
    /// checked: a non-positive duration is a snap, not an error.
    pub fn validate(&self) -> Result<(), MorphError> {
        if self.particle_count == 0 {
            return Err(invalid("particle_count must be at least 1"));
        }
        let s = &self.sphere;
        if !s.radius.is_finite() || s.radius <= 0.0 {
            return Err(invalid(format!("sphere.radius must be > 0, got {}", s.radius)));
        }
        if !s.jitter.is_finite() || s.jitter < 0.0 {
            return Err(invalid(format!("sphere.jitter must be >= 0, got {}", s.jitter)));
        }
        let t = &self.text;
        unit_range("text.brightness_threshold", t.brightness_threshold)?;
        unit_range("text.keep_probability", t.keep_probability)?;
        if t.canvas_width == 0 || t.canvas_height == 0 {
            return Err(invalid("text canvas must be non-empty"));
        }
        pixel_count(t.canvas_width, t.canvas_height)?;
        if t.sample_step == 0 {
            return Err(invalid("text.sample_step must be at least 1"));
        }
        if !t.world_scale.is_finite() || t.world_scale <= 0.0 {
            return Err(invalid(format!(
                "text.world_scale must be > 0, got {}",
                t.world_scale
            )));
        }
        self.transition.filler.validate()?;
        Ok(())
    }
}
