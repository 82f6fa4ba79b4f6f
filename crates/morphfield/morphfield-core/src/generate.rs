//! Point-set generators: Fibonacci sphere and sampled text glyphs.

use log::debug;
use rand::Rng;

use crate::color::{color_for_sphere_point, color_for_text_point};
use crate::config::TextSamplingConfig;
use crate::error::MorphError;
use crate::point_set::{Point, PointSet, PointSetKind};
use crate::raster::{pixel_count, TextRasterAdapter};

/// pi * (3 - sqrt(5))
const GOLDEN_ANGLE: f32 = 2.399_963_1;

/// Distribute `n` points over a sphere of `radius` with golden-angle
/// stepping, then offset each point by up to `jitter` per axis.
///
/// With `jitter == 0` the RNG is never touched and the output is fully
/// deterministic. Colors follow the depth gradient.
pub fn generate_sphere<R: Rng + ?Sized>(n: usize, radius: f32, jitter: f32, rng: &mut R) -> PointSet {
    let mut positions = Vec::with_capacity(n);
    let mut colors = Vec::with_capacity(n);
    let jitter = if jitter.is_finite() { jitter.abs() } else { 0.0 };
    let inv_n = 1.0 / n.max(1) as f32;
    for i in 0..n {
        let y = 1.0 - 2.0 * (i as f32 + 0.5) * inv_n;
        let ring = (1.0 - y * y).max(0.0).sqrt();
        let theta = GOLDEN_ANGLE * i as f32;
        let mut p: Point = [
            theta.cos() * ring * radius,
            y * radius,
            theta.sin() * ring * radius,
        ];
        if jitter > 0.0 {
            for c in p.iter_mut() {
                *c += rng.gen_range(-jitter..=jitter);
            }
        }
        colors.push(color_for_sphere_point(p, radius));
        positions.push(p);
    }
    PointSet::new(PointSetKind::Sphere, positions, colors)
}

/// Parameters for one text sampling pass.
#[derive(Clone, Debug, PartialEq)]
pub struct TextSampling {
    pub max_points: usize,
    pub font_size_px: u32,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub brightness_threshold: f32,
    pub keep_probability: f32,
    pub world_scale: f32,
    pub sample_step: u32,
}

impl TextSampling {
    pub fn from_config(cfg: &TextSamplingConfig, max_points: usize) -> Self {
        Self {
            max_points,
            font_size_px: cfg.font_size_px,
            canvas_width: cfg.canvas_width,
            canvas_height: cfg.canvas_height,
            brightness_threshold: cfg.brightness_threshold,
            keep_probability: cfg.keep_probability,
            world_scale: cfg.world_scale,
            sample_step: cfg.sample_step,
        }
    }
}

/// Rasterize `text` and turn bright pixels into world-space points on z = 0.
///
/// Pixels with brightness >= threshold are candidates; each candidate is
/// kept with `keep_probability` using the caller's RNG (no draws happen at
/// probability 1.0 or 0.0). Scanning is row-major and stops at
/// `max_points`, so truncation keeps the first points in scan order.
/// Blank text returns an empty set without calling the rasterizer.
pub fn generate_text_points<T, R>(
    raster: &T,
    text: &str,
    params: &TextSampling,
    rng: &mut R,
) -> Result<PointSet, MorphError>
where
    T: TextRasterAdapter + ?Sized,
    R: Rng + ?Sized,
{
    if text.trim().is_empty() || params.max_points == 0 {
        return Ok(PointSet::empty(PointSetKind::Text));
    }

    let buf = raster.rasterize(
        text,
        params.font_size_px,
        params.canvas_width,
        params.canvas_height,
    )?;
    let expected = pixel_count(buf.width, buf.height)?;
    if buf.data.len() != expected {
        return Err(MorphError::RasterSize {
            expected,
            actual: buf.data.len(),
        });
    }

    let step = params.sample_step.max(1) as usize;
    let half_w = buf.width as f32 * 0.5;
    let half_h = buf.height as f32 * 0.5;
    let keep = params.keep_probability;

    let mut positions = Vec::new();
    let mut colors = Vec::new();
    let mut candidates = 0usize;
    'scan: for y in (0..buf.height).step_by(step) {
        for x in (0..buf.width).step_by(step) {
            if buf.get(x, y) < params.brightness_threshold {
                continue;
            }
            candidates += 1;
            let kept = if keep >= 1.0 {
                true
            } else if keep <= 0.0 {
                false
            } else {
                rng.gen::<f32>() < keep
            };
            if !kept {
                continue;
            }
            let p: Point = [
                (x as f32 + 0.5 - half_w) * params.world_scale,
                (half_h - (y as f32 + 0.5)) * params.world_scale,
                0.0,
            ];
            colors.push(color_for_text_point(p, positions.len()));
            positions.push(p);
            if positions.len() >= params.max_points {
                break 'scan;
            }
        }
    }

    debug!(
        "sampled {:?}: {} candidates, {} kept (cap {})",
        text,
        candidates,
        positions.len(),
        params.max_points
    );
    Ok(PointSet::new(PointSetKind::Text, positions, colors))
}
