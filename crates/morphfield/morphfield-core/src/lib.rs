//! Morphfield Core (engine-agnostic)
//!
//! A fixed-size particle field that morphs between a sphere distribution and
//! a sampled text glyph field. Rendering and text rasterization stay with the
//! host; this crate owns the point sets, the colors, and the batched
//! interpolation that moves one toward the other.

pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod filler;
pub mod generate;
pub mod interp;
pub mod outputs;
pub mod point_set;
pub mod raster;
pub mod render;
pub mod scheduler;

// Re-exports for consumers (adapters)
pub use color::{color_for_sphere_point, color_for_text_point, FILLER_COLOR};
pub use config::{MorphConfig, SphereConfig, TextSamplingConfig, TransitionConfig};
pub use engine::{MorphEngine, MorphEngineBuilder, DEFAULT_SEED};
pub use error::MorphError;
pub use filler::FillerStrategy;
pub use generate::{generate_sphere, generate_text_points, TextSampling};
pub use interp::Easing;
pub use outputs::MorphEvent;
pub use point_set::{Point, PointSet, PointSetKind, Rgb};
#[cfg(feature = "glyph-raster")]
pub use raster::GlyphRasterizer;
pub use raster::{pixel_count, PixelBuffer, TextRasterAdapter, MAX_CANVAS_PIXELS};
pub use render::RenderAdapter;
pub use scheduler::{MorphScheduler, MorphState};
