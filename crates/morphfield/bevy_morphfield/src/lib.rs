use bevy::prelude::*;
use morphfield_core::{MorphConfig, MorphEngine, TextRasterAdapter, DEFAULT_SEED};

pub mod resources;
pub mod systems;

pub use resources::{MorphFieldEngine, MorphFieldEvent, ParticleMesh, StagingRenderer, SubmitMorphText};

/// Adds a morph engine resource driven by `Time`, a `SubmitMorphText` input
/// event, and a point-list mesh that mirrors the particle buffers.
///
/// An invalid config is logged and leaves the plugin inert instead of
/// panicking the app.
pub struct MorphFieldPlugin<T> {
    pub config: MorphConfig,
    pub rasterizer: T,
    pub seed: u64,
}

impl<T> MorphFieldPlugin<T> {
    pub fn new(config: MorphConfig, rasterizer: T) -> Self {
        Self {
            config,
            rasterizer,
            seed: DEFAULT_SEED,
        }
    }
}

impl<T> Plugin for MorphFieldPlugin<T>
where
    T: TextRasterAdapter + Clone + Send + Sync + 'static,
{
    fn build(&self, app: &mut App) {
        app.add_event::<SubmitMorphText>()
            .add_event::<MorphFieldEvent>()
            .add_systems(Startup, systems::create_particle_mesh::<T>)
            .add_systems(
                Update,
                (
                    systems::submit_text_system::<T>,
                    systems::tick_engine_system::<T>,
                    systems::apply_frame_system::<T>,
                )
                    .chain(),
            );

        let built = MorphEngine::builder(self.config.clone())
            .renderer(StagingRenderer::default())
            .rasterizer(self.rasterizer.clone())
            .seed(self.seed)
            .build();
        match built {
            Ok(engine) => {
                app.insert_resource(MorphFieldEngine(engine));
            }
            Err(e) => error!("morphfield disabled: {e}"),
        }
    }
}
