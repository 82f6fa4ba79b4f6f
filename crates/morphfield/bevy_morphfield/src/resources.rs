use bevy::prelude::*;
use morphfield_core::{MorphEngine, MorphEvent, Point, RenderAdapter, Rgb};

/// The engine, rendering into a [`StagingRenderer`].
#[derive(Resource)]
pub struct MorphFieldEngine<T>(pub MorphEngine<StagingRenderer, T>);

/// Handle to the point-list mesh mirroring the particle buffers.
#[derive(Resource, Clone, Debug)]
pub struct ParticleMesh(pub Handle<Mesh>);

/// Input: morph toward this text. Several in one frame collapse to the last.
#[derive(Event, Clone, Debug)]
pub struct SubmitMorphText(pub String);

/// Output: engine events re-published to the app.
#[derive(Event, Clone, Debug)]
pub struct MorphFieldEvent(pub MorphEvent);

/// Render adapter that copies each frame into vertex-ready vectors; a later
/// system moves them into the mesh (keeps ordering explicit: Tick -> Apply).
#[derive(Default, Debug)]
pub struct StagingRenderer {
    pub positions: Vec<Point>,
    pub colors: Vec<[f32; 4]>,
    frames: u64,
    dirty: bool,
}

impl StagingRenderer {
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// True once per uploaded frame.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

impl RenderAdapter for StagingRenderer {
    fn upload_frame(&mut self, positions: &[Point], colors: &[Rgb]) {
        self.positions.clear();
        self.positions.extend_from_slice(positions);
        self.colors.clear();
        self.colors
            .extend(colors.iter().map(|c| [c[0], c[1], c[2], 1.0]));
        self.frames += 1;
        self.dirty = true;
    }
}
