//! Events emitted while driving the field.
//!
//! Outputs carry only discrete signals; buffer contents go to the
//! `RenderAdapter` each frame instead.

use serde::{Deserialize, Serialize};

use crate::scheduler::MorphState;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum MorphEvent {
    TransitionStarted {
        from: MorphState,
        to: MorphState,
        duration: f32,
    },
    /// An in-flight transition was superseded; `progress` is how far it got.
    Retargeted {
        state: MorphState,
        progress: f32,
    },
    Settled {
        state: MorphState,
    },
    TextSampled {
        text: String,
        points: usize,
        filler: usize,
    },
    /// The text hold elapsed and the field is heading back to the sphere.
    ReturnScheduled,
}
