//! Edge spawn placement.
//!
//! Every particle life begins just outside one of the four surface edges,
//! chosen uniformly, so respawns drift in from off-screen instead of
//! popping into view.

use glam::Vec2;
use rand::Rng;

/// One of the four surface edges a particle can spawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    /// All edges, in spawn-roll order.
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    /// Pick one of the four edges uniformly.
    pub fn sample<R: Rng>(rng: &mut R) -> Edge {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Position just outside this edge for a circle of `radius`.
    ///
    /// The coordinate along the edge is uniform across that dimension of the
    /// surface; the orthogonal coordinate sits one radius outside the bound,
    /// so the circle starts fully off-surface and drifts in.
    pub fn place<R: Rng>(self, rng: &mut R, radius: f32, width: f32, height: f32) -> Vec2 {
        match self {
            Edge::Top => Vec2::new(rng.gen_range(0.0..width), -radius),
            Edge::Right => Vec2::new(width + radius, rng.gen_range(0.0..height)),
            Edge::Bottom => Vec2::new(rng.gen_range(0.0..width), height + radius),
            Edge::Left => Vec2::new(-radius, rng.gen_range(0.0..height)),
        }
    }
}
