//! Render contract: the host receives read-only buffer views once per frame.

use crate::point_set::{Point, Rgb};

pub trait RenderAdapter {
    /// Called once per `MorphEngine::update`, after the buffers settled for
    /// the frame. `positions` and `colors` always have the same length.
    fn upload_frame(&mut self, positions: &[Point], colors: &[Rgb]);
}

impl<F> RenderAdapter for F
where
    F: FnMut(&[Point], &[Rgb]),
{
    fn upload_frame(&mut self, positions: &[Point], colors: &[Rgb]) {
        self(positions, colors)
    }
}
