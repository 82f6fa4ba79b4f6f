//! MorphEngine: wires the generators, the scheduler and the host adapters
//! into the submit-text / hold / return-to-sphere flow.
//!
//! Methods:
//! - builder, submit_text, return_to_sphere, update (tick -> hold timer -> upload)

use log::{debug, info, warn};
use rand::{rngs::StdRng, SeedableRng};

use crate::config::MorphConfig;
use crate::error::MorphError;
use crate::generate::{generate_sphere, generate_text_points, TextSampling};
use crate::outputs::MorphEvent;
use crate::point_set::{Point, PointSet, Rgb};
use crate::raster::TextRasterAdapter;
use crate::render::RenderAdapter;
use crate::scheduler::{MorphScheduler, MorphState};

/// Seed used when the host does not supply one.
pub const DEFAULT_SEED: u64 = 0x5EED_F1E1D;

/// Builder collecting the host collaborators. Both adapters are required.
pub struct MorphEngineBuilder<R, T> {
    cfg: MorphConfig,
    renderer: Option<R>,
    rasterizer: Option<T>,
    seed: u64,
}

impl<R: RenderAdapter, T: TextRasterAdapter> MorphEngineBuilder<R, T> {
    pub fn renderer(mut self, renderer: R) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn rasterizer(mut self, rasterizer: T) -> Self {
        self.rasterizer = Some(rasterizer);
        self
    }

    /// Seed for sphere jitter, text thinning and filler scatter.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self) -> Result<MorphEngine<R, T>, MorphError> {
        let renderer = self
            .renderer
            .ok_or(MorphError::MissingCollaborator("render adapter"))?;
        let rasterizer = self
            .rasterizer
            .ok_or(MorphError::MissingCollaborator("text raster adapter"))?;
        self.cfg.validate()?;

        let mut rng = StdRng::seed_from_u64(self.seed);
        let sphere = sphere_for(&self.cfg, &mut rng);
        let scheduler = MorphScheduler::new(&sphere)?;
        info!(
            "morph engine ready: {} particles, sphere radius {}",
            self.cfg.particle_count, self.cfg.sphere.radius
        );
        Ok(MorphEngine {
            cfg: self.cfg,
            scheduler,
            renderer,
            rasterizer,
            rng,
            hold_elapsed: 0.0,
            hold_armed: false,
            pending: Vec::new(),
            outputs: Vec::new(),
        })
    }
}

fn sphere_for(cfg: &MorphConfig, rng: &mut StdRng) -> PointSet {
    generate_sphere(
        cfg.particle_count,
        cfg.sphere.radius,
        cfg.sphere.jitter,
        rng,
    )
}

/// Controller owning one scheduler and its host adapters.
pub struct MorphEngine<R, T> {
    cfg: MorphConfig,
    scheduler: MorphScheduler,
    renderer: R,
    rasterizer: T,
    rng: StdRng,
    /// Time spent settled at the text shape.
    hold_elapsed: f32,
    /// Set once an `update` has observed the text shape; cleared by every
    /// new target.
    hold_armed: bool,
    /// Events raised between frames (submissions).
    pending: Vec<MorphEvent>,
    /// Events returned by the last `update`.
    outputs: Vec<MorphEvent>,
}

impl<R: RenderAdapter, T: TextRasterAdapter> MorphEngine<R, T> {
    pub fn builder(cfg: MorphConfig) -> MorphEngineBuilder<R, T> {
        MorphEngineBuilder {
            cfg,
            renderer: None,
            rasterizer: None,
            seed: DEFAULT_SEED,
        }
    }

    /// Sample `text` and start morphing toward it. Latest submission wins:
    /// an in-flight transition is re-targeted from where it is.
    ///
    /// Returns the number of text points k; the other N - k particles become
    /// filler. Blank text gives k == 0. On rasterizer failure the running
    /// animation is left as it was.
    pub fn submit_text(&mut self, text: &str) -> Result<usize, MorphError> {
        let max_chars = self.cfg.text.max_chars;
        let text: String = if text.chars().count() > max_chars {
            warn!("text longer than {max_chars} characters; truncating");
            text.chars().take(max_chars).collect()
        } else {
            text.to_string()
        };

        let params = TextSampling::from_config(&self.cfg.text, self.cfg.particle_count);
        let set = generate_text_points(&self.rasterizer, &text, &params, &mut self.rng)
            .map_err(|e| {
                warn!("text sampling failed for {text:?}: {e}");
                e
            })?;
        let k = set.len();

        self.scheduler.set_target(
            &set,
            self.cfg.transition.filler,
            self.cfg.transition.to_text_seconds,
            self.cfg.transition.easing,
            &mut self.rng,
        );
        self.hold_elapsed = 0.0;
        self.hold_armed = false;
        self.pending.push(MorphEvent::TextSampled {
            text,
            points: k,
            filler: self.scheduler.len() - k,
        });
        Ok(k)
    }

    /// Regenerate the sphere and start morphing back to it.
    pub fn return_to_sphere(&mut self) {
        let sphere = sphere_for(&self.cfg, &mut self.rng);
        self.scheduler.set_target(
            &sphere,
            self.cfg.transition.filler,
            self.cfg.transition.to_sphere_seconds,
            self.cfg.transition.easing,
            &mut self.rng,
        );
        self.hold_elapsed = 0.0;
        self.hold_armed = false;
    }

    /// Advance one frame: tick the scheduler, run the text hold timer, then
    /// upload the buffers to the renderer. Returns the events raised since
    /// the previous frame, in the order they happened.
    pub fn update(&mut self, dt: f32) -> &[MorphEvent] {
        self.outputs.clear();
        self.outputs.append(&mut self.pending);

        self.scheduler.tick(dt);
        self.outputs.extend(self.scheduler.drain_events());

        if self.scheduler.state() == MorphState::AtText {
            // hold time accrues from the frame after arrival
            if self.hold_armed && dt.is_finite() && dt > 0.0 {
                self.hold_elapsed += dt;
            }
            self.hold_armed = true;
            if self.cfg.transition.auto_return
                && self.hold_elapsed >= self.cfg.transition.text_hold_seconds
            {
                debug!("text hold elapsed after {:.2}s", self.hold_elapsed);
                self.outputs.push(MorphEvent::ReturnScheduled);
                self.return_to_sphere();
                self.outputs.extend(self.scheduler.drain_events());
            }
        }

        self.renderer
            .upload_frame(self.scheduler.positions(), self.scheduler.colors());
        &self.outputs
    }

    #[inline]
    pub fn state(&self) -> MorphState {
        self.scheduler.state()
    }

    #[inline]
    pub fn positions(&self) -> &[Point] {
        self.scheduler.positions()
    }

    #[inline]
    pub fn colors(&self) -> &[Rgb] {
        self.scheduler.colors()
    }

    #[inline]
    pub fn particle_count(&self) -> usize {
        self.scheduler.len()
    }

    #[inline]
    pub fn config(&self) -> &MorphConfig {
        &self.cfg
    }

    #[inline]
    pub fn scheduler(&self) -> &MorphScheduler {
        &self.scheduler
    }

    #[inline]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[inline]
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}
