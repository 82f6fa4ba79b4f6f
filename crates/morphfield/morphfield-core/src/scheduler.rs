//! MorphScheduler: owns the position/color buffers and the morph state, and
//! moves the buffers toward a target point set over a bounded duration.
//!
//! Each transition stores a start snapshot and a target snapshot of the
//! whole field. A frame evaluates the easing curve once and blends both
//! buffers with that single progress value.

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::color::FILLER_COLOR;
use crate::error::MorphError;
use crate::filler::FillerStrategy;
use crate::interp::functions::lerp_buffer;
use crate::interp::Easing;
use crate::outputs::MorphEvent;
use crate::point_set::{Point, PointSet, PointSetKind, Rgb};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MorphState {
    AtSphere,
    MorphingToText,
    AtText,
    MorphingToSphere,
}

impl MorphState {
    #[inline]
    pub fn is_morphing(self) -> bool {
        matches!(self, MorphState::MorphingToText | MorphState::MorphingToSphere)
    }

    fn heading_to(kind: PointSetKind) -> Self {
        match kind {
            PointSetKind::Text => MorphState::MorphingToText,
            PointSetKind::Sphere => MorphState::MorphingToSphere,
        }
    }

    fn arrived_at(kind: PointSetKind) -> Self {
        match kind {
            PointSetKind::Text => MorphState::AtText,
            PointSetKind::Sphere => MorphState::AtSphere,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MorphState::AtSphere => "at_sphere",
            MorphState::MorphingToText => "morphing_to_text",
            MorphState::AtText => "at_text",
            MorphState::MorphingToSphere => "morphing_to_sphere",
        }
    }
}

/// Timing of the in-flight transition.
#[derive(Copy, Clone, Debug)]
struct Transition {
    kind: PointSetKind,
    elapsed: f32,
    duration: f32,
    easing: Easing,
}

impl Transition {
    #[inline]
    fn progress(&self) -> f32 {
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }
}

#[derive(Debug)]
pub struct MorphScheduler {
    positions: Vec<Point>,
    colors: Vec<Rgb>,
    start_positions: Vec<Point>,
    start_colors: Vec<Rgb>,
    target_positions: Vec<Point>,
    target_colors: Vec<Rgb>,
    /// Points of the current target that came from the point set; the rest are filler.
    shape_len: usize,
    transition: Option<Transition>,
    state: MorphState,
    events: Vec<MorphEvent>,
}

impl MorphScheduler {
    /// Create a scheduler resting on `initial`. N is fixed to `initial.len()`
    /// for the lifetime of the scheduler.
    pub fn new(initial: &PointSet) -> Result<Self, MorphError> {
        let n = initial.len();
        if n == 0 {
            return Err(MorphError::InvalidConfiguration(
                "initial point set must contain at least one point".into(),
            ));
        }
        let positions = initial.positions().to_vec();
        let colors = initial.colors().to_vec();
        Ok(Self {
            start_positions: positions.clone(),
            start_colors: colors.clone(),
            target_positions: positions.clone(),
            target_colors: colors.clone(),
            positions,
            colors,
            shape_len: n,
            transition: None,
            state: MorphState::arrived_at(initial.kind),
            events: Vec::new(),
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn state(&self) -> MorphState {
        self.state
    }

    #[inline]
    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    #[inline]
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Number of leading indices that map to the current target shape.
    #[inline]
    pub fn shape_len(&self) -> usize {
        self.shape_len
    }

    #[inline]
    pub fn target_positions(&self) -> &[Point] {
        &self.target_positions
    }

    /// Linear (un-eased) progress of the in-flight transition; 1.0 when settled.
    pub fn progress(&self) -> f32 {
        self.transition.map_or(1.0, |t| t.progress())
    }

    /// True once the current transition has run its full duration.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.transition.is_none()
    }

    /// Drain events produced since the last call.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, MorphEvent> {
        self.events.drain(..)
    }

    /// Begin a timed transition toward `set`.
    ///
    /// The first `min(|set|, N)` indices target the set; the remainder are
    /// placed by `filler`. A call during an in-flight transition restarts from
    /// the current interpolated buffers, so there is no jump. A duration that
    /// is not strictly positive (or not finite) snaps immediately.
    pub fn set_target<R: Rng + ?Sized>(
        &mut self,
        set: &PointSet,
        filler: FillerStrategy,
        duration: f32,
        easing: Easing,
        rng: &mut R,
    ) {
        let n = self.len();
        let k = set.len().min(n);
        if set.len() > n {
            log::warn!(
                "target point set has {} points, field holds {}; extra points dropped",
                set.len(),
                n
            );
        }

        if let Some(prev) = self.transition.take() {
            self.events.push(MorphEvent::Retargeted {
                state: self.state,
                progress: prev.progress(),
            });
        }

        self.start_positions.copy_from_slice(&self.positions);
        self.start_colors.copy_from_slice(&self.colors);

        self.target_positions[..k].copy_from_slice(&set.positions()[..k]);
        self.target_colors[..k].copy_from_slice(&set.colors()[..k]);
        filler.fill(
            &mut self.target_positions[k..],
            &self.positions[k..],
            rng,
        );
        self.target_colors[k..].fill(FILLER_COLOR);
        self.shape_len = k;

        let from = self.state;
        self.state = MorphState::heading_to(set.kind);
        let duration = if duration.is_finite() && duration > 0.0 {
            duration
        } else {
            0.0
        };
        self.events.push(MorphEvent::TransitionStarted {
            from,
            to: self.state,
            duration,
        });
        debug!(
            "transition {:?} -> {:?}: {} shape points, {} filler, {:.3}s",
            from,
            self.state,
            k,
            n - k,
            duration
        );

        if duration == 0.0 {
            self.settle(set.kind);
        } else {
            self.transition = Some(Transition {
                kind: set.kind,
                elapsed: 0.0,
                duration,
                easing,
            });
        }
    }

    /// Advance the in-flight transition by `dt` seconds. Returns true when
    /// the buffers changed. A settled scheduler is left untouched.
    pub fn tick(&mut self, dt: f32) -> bool {
        let Some(mut tr) = self.transition else {
            return false;
        };
        if dt.is_finite() && dt > 0.0 {
            tr.elapsed += dt;
        }
        if tr.elapsed >= tr.duration {
            self.settle(tr.kind);
            return true;
        }
        self.transition = Some(tr);

        let eased = tr.easing.apply(tr.progress());
        lerp_buffer(
            &mut self.positions,
            &self.start_positions,
            &self.target_positions,
            eased,
        );
        lerp_buffer(
            &mut self.colors,
            &self.start_colors,
            &self.target_colors,
            eased,
        );
        true
    }

    fn settle(&mut self, kind: PointSetKind) {
        self.positions.copy_from_slice(&self.target_positions);
        self.colors.copy_from_slice(&self.target_colors);
        self.transition = None;
        self.state = MorphState::arrived_at(kind);
        self.events.push(MorphEvent::Settled { state: self.state });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn line(kind: PointSetKind, n: usize, x: f32) -> PointSet {
        let positions = (0..n).map(|i| [x, i as f32, 0.0]).collect();
        PointSet::new(kind, positions, vec![[1.0, 0.5, 0.0]])
    }

    #[test]
    fn empty_initial_set_is_rejected() {
        assert!(MorphScheduler::new(&PointSet::empty(PointSetKind::Sphere)).is_err());
    }

    #[test]
    fn starts_settled_at_initial_shape() {
        let s = MorphScheduler::new(&line(PointSetKind::Sphere, 4, 0.0)).unwrap();
        assert_eq!(s.state(), MorphState::AtSphere);
        assert!(s.is_settled());
        assert_eq!(s.len(), 4);
        assert_eq!(s.progress(), 1.0);
    }

    #[test]
    fn state_machine_round_trip() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut s = MorphScheduler::new(&line(PointSetKind::Sphere, 4, 0.0)).unwrap();
        s.set_target(
            &line(PointSetKind::Text, 2, 5.0),
            FillerStrategy::KeepCurrent,
            1.0,
            Easing::Linear,
            &mut rng,
        );
        assert_eq!(s.state(), MorphState::MorphingToText);
        s.tick(0.5);
        assert_eq!(s.state(), MorphState::MorphingToText);
        s.tick(0.5);
        assert_eq!(s.state(), MorphState::AtText);

        s.set_target(
            &line(PointSetKind::Sphere, 4, 0.0),
            FillerStrategy::KeepCurrent,
            1.0,
            Easing::Linear,
            &mut rng,
        );
        assert_eq!(s.state(), MorphState::MorphingToSphere);
        s.tick(2.0);
        assert_eq!(s.state(), MorphState::AtSphere);
        let events: Vec<_> = s.drain_events().collect();
        assert_eq!(
            events.last(),
            Some(&MorphEvent::Settled {
                state: MorphState::AtSphere
            })
        );
    }

    #[test]
    fn linear_midpoint_and_filler_color() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut s = MorphScheduler::new(&line(PointSetKind::Sphere, 3, 0.0)).unwrap();
        s.set_target(
            &line(PointSetKind::Text, 1, 10.0),
            FillerStrategy::KeepCurrent,
            2.0,
            Easing::Linear,
            &mut rng,
        );
        s.tick(1.0);
        assert_eq!(s.positions()[0], [5.0, 0.0, 0.0]);
        // filler keeps its place but fades toward the filler color
        assert_eq!(s.positions()[1], [0.0, 1.0, 0.0]);
        s.tick(1.0);
        assert_eq!(s.colors()[2], FILLER_COLOR);
        assert_eq!(s.shape_len(), 1);
    }

    #[test]
    fn oversized_target_is_truncated() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut s = MorphScheduler::new(&line(PointSetKind::Sphere, 2, 0.0)).unwrap();
        s.set_target(
            &line(PointSetKind::Text, 5, 1.0),
            FillerStrategy::KeepCurrent,
            0.0,
            Easing::Linear,
            &mut rng,
        );
        assert_eq!(s.len(), 2);
        assert_eq!(s.positions(), &[[1.0, 0.0, 0.0], [1.0, 1.0, 0.0]]);
    }

    #[test]
    fn negative_dt_does_not_rewind() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut s = MorphScheduler::new(&line(PointSetKind::Sphere, 1, 0.0)).unwrap();
        s.set_target(
            &line(PointSetKind::Text, 1, 4.0),
            FillerStrategy::KeepCurrent,
            1.0,
            Easing::Linear,
            &mut rng,
        );
        s.tick(0.25);
        s.tick(-5.0);
        s.tick(f32::NAN);
        assert_eq!(s.positions()[0], [1.0, 0.0, 0.0]);
        assert!((s.progress() - 0.25).abs() < 1e-6);
    }
}
