//! Point sets: immutable snapshots of target positions produced by a generator.

use serde::{Deserialize, Serialize};

/// World-space position (x, y, z).
pub type Point = [f32; 3];

/// Linear RGB color, components in 0..1.
pub type Rgb = [f32; 3];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointSetKind {
    Sphere,
    Text,
}

/// Target positions plus parallel per-point colors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointSet {
    pub kind: PointSetKind,
    positions: Vec<Point>,
    colors: Vec<Rgb>,
}

impl PointSet {
    /// Build a point set. Colors are truncated or padded with the last color
    /// (or white when empty) so they stay parallel to `positions`.
    pub fn new(kind: PointSetKind, positions: Vec<Point>, mut colors: Vec<Rgb>) -> Self {
        let fill = colors.last().copied().unwrap_or([1.0, 1.0, 1.0]);
        colors.resize(positions.len(), fill);
        Self {
            kind,
            positions,
            colors,
        }
    }

    pub fn empty(kind: PointSetKind) -> Self {
        Self {
            kind,
            positions: Vec::new(),
            colors: Vec::new(),
        }
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
    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    #[inline]
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Keep the first `max` points (scan order) and drop the rest.
    pub fn truncate(&mut self, max: usize) {
        self.positions.truncate(max);
        self.colors.truncate(max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_stay_parallel() {
        let ps = PointSet::new(
            PointSetKind::Text,
            vec![[0.0; 3], [1.0; 3], [2.0; 3]],
            vec![[0.5, 0.5, 0.5]],
        );
        assert_eq!(ps.colors().len(), 3);
        assert_eq!(ps.colors()[2], [0.5, 0.5, 0.5]);

        let ps = PointSet::new(PointSetKind::Sphere, vec![[0.0; 3]], vec![[0.1; 3], [0.2; 3]]);
        assert_eq!(ps.colors(), &[[0.1; 3]]);
    }

    #[test]
    fn truncate_keeps_scan_order() {
        let mut ps = PointSet::new(
            PointSetKind::Text,
            vec![[0.0; 3], [1.0; 3], [2.0; 3]],
            Vec::new(),
        );
        ps.truncate(2);
        assert_eq!(ps.positions(), &[[0.0; 3], [1.0; 3]]);
        assert_eq!(ps.colors().len(), 2);
    }
}
