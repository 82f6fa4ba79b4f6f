use bevy::prelude::*;
use bevy::render::render_resource::PrimitiveTopology;
use bevy::render::render_asset::RenderAssetUsages;

use crate::resources::{MorphFieldEngine, MorphFieldEvent, ParticleMesh, SubmitMorphText};
use morphfield_core::TextRasterAdapter;

/// Startup: build the point-list mesh from the initial sphere. Skipped when
/// the app has no mesh assets (headless/minimal apps).
pub fn create_particle_mesh<T>(
    mut commands: Commands,
    engine: Option<Res<MorphFieldEngine<T>>>,
    meshes: Option<ResMut<Assets<Mesh>>>,
) where
    T: TextRasterAdapter + Send + Sync + 'static,
{
    let (Some(engine), Some(mut meshes)) = (engine, meshes) else {
        return;
    };
    let colors: Vec<[f32; 4]> = engine
        .0
        .colors()
        .iter()
        .map(|c| [c[0], c[1], c[2], 1.0])
        .collect();
    let mut mesh = Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, engine.0.positions().to_vec());
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colors);
    commands.insert_resource(ParticleMesh(meshes.add(mesh)));
}

/// Forward the latest text submission of this frame to the engine.
pub fn submit_text_system<T>(
    mut submissions: EventReader<SubmitMorphText>,
    engine: Option<ResMut<MorphFieldEngine<T>>>,
) where
    T: TextRasterAdapter + Send + Sync + 'static,
{
    let latest = submissions.read().last().cloned();
    let (Some(mut engine), Some(SubmitMorphText(text))) = (engine, latest) else {
        return;
    };
    if let Err(e) = engine.0.submit_text(&text) {
        warn!("morph text submit failed: {e}");
    }
}

/// Advance the engine by the frame delta and republish its events.
pub fn tick_engine_system<T>(
    time: Res<Time>,
    engine: Option<ResMut<MorphFieldEngine<T>>>,
    mut events: EventWriter<MorphFieldEvent>,
) where
    T: TextRasterAdapter + Send + Sync + 'static,
{
    let Some(mut engine) = engine else {
        return;
    };
    for ev in engine.0.update(time.delta_seconds()) {
        events.send(MorphFieldEvent(ev.clone()));
    }
}

/// Copy the staged frame into the particle mesh.
pub fn apply_frame_system<T>(
    engine: Option<ResMut<MorphFieldEngine<T>>>,
    handle: Option<Res<ParticleMesh>>,
    meshes: Option<ResMut<Assets<Mesh>>>,
) where
    T: TextRasterAdapter + Send + Sync + 'static,
{
    let (Some(mut engine), Some(handle), Some(mut meshes)) = (engine, handle, meshes) else {
        return;
    };
    let staging = engine.0.renderer_mut();
    if !staging.take_dirty() {
        return;
    }
    if let Some(mesh) = meshes.get_mut(&handle.0) {
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, staging.positions.clone());
        mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, staging.colors.clone());
    }
}
