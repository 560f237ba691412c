//! A single animated glow point.
//!
//! A particle's life runs from one reset to the next: it drifts along a
//! constant velocity, fades by a fixed per-step decay, and respawns from a
//! random surface edge the moment it fully fades or leaves the surface.

use glam::Vec2;
use rand::Rng;

use crate::spawn::Edge;
use crate::surface::Surface;
use crate::visuals::Accent;

/// Drawn radius range in pixels, re-rolled per life.
pub const RADIUS_RANGE: std::ops::Range<f32> = 1.0..3.0;
/// Velocity component range in pixels per step, re-rolled per life.
pub const VELOCITY_RANGE: std::ops::Range<f32> = -0.4..0.4;
/// Per-step opacity decay range, re-rolled per life.
pub const FADE_DECAY_RANGE: std::ops::Range<f32> = 0.003..0.005;
/// Glow radius as a multiple of the particle radius.
pub const GLOW_FACTOR: f32 = 2.0;

/// One drifting, fading point.
///
/// Position may transiently lie outside the surface bounds; the particle
/// resets once its bounding circle is fully outside on any one side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Center in surface-space pixels.
    pub position: Vec2,
    /// Drift per step, constant for the life of the particle.
    pub velocity: Vec2,
    /// Drawn circle radius in pixels.
    pub radius: f32,
    /// Accent tint, re-rolled per life.
    pub color: Accent,
    /// Current opacity; starts at 1.0 and decays monotonically.
    pub opacity: f32,
    /// Per-step opacity decay, constant for the life of the particle.
    pub fade_decay: f32,
}

impl Particle {
    /// Create a particle already reset to a fresh edge-spawn state.
    pub fn spawned<R: Rng>(rng: &mut R, width: f32, height: f32) -> Self {
        let mut particle = Particle {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            radius: 0.0,
            color: Accent::default(),
            opacity: 0.0,
            fade_decay: 0.0,
        };
        particle.reset(rng, width, height);
        particle
    }

    /// Start a fresh life: re-roll every per-life attribute and move just
    /// outside a uniformly chosen surface edge.
    ///
    /// The radius is rolled before placement so the spawn offset matches the
    /// radius the particle will be drawn with.
    pub fn reset<R: Rng>(&mut self, rng: &mut R, width: f32, height: f32) {
        self.radius = rng.gen_range(RADIUS_RANGE);
        self.position = Edge::sample(rng).place(rng, self.radius, width, height);
        self.color = Accent::sample(rng);
        self.velocity = Vec2::new(rng.gen_range(VELOCITY_RANGE), rng.gen_range(VELOCITY_RANGE));
        self.opacity = 1.0;
        self.fade_decay = rng.gen_range(FADE_DECAY_RANGE);
    }

    /// Advance one step: drift, fade, and respawn if the life ended.
    ///
    /// The respawn happens inside the same step, before this frame's draw,
    /// so an expiring particle is redrawn in its fresh state rather than
    /// skipping a frame.
    pub fn update<R: Rng>(&mut self, rng: &mut R, width: f32, height: f32) {
        self.position += self.velocity;
        self.opacity -= self.fade_decay;

        if self.opacity <= 0.0 || self.is_off_surface(width, height) {
            self.reset(rng, width, height);
        }
    }

    /// Whether the bounding circle sits fully outside the surface on any side.
    pub fn is_off_surface(&self, width: f32, height: f32) -> bool {
        self.position.x + self.radius < 0.0
            || self.position.x - self.radius > width
            || self.position.y + self.radius < 0.0
            || self.position.y - self.radius > height
    }

    /// Draw as a filled circle with a glow halo twice the particle radius.
    pub fn draw<S: Surface>(&self, surface: &mut S) {
        surface.fill_circle(
            self.position,
            self.radius,
            self.color.rgb(),
            self.opacity,
            self.radius * GLOW_FACTOR,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    const W: f32 = 800.0;
    const H: f32 = 600.0;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(0xD21F)
    }

    #[test]
    fn test_reset_rolls_attributes_within_ranges() {
        let mut rng = rng();
        let mut p = Particle::spawned(&mut rng, W, H);
        for _ in 0..500 {
            p.reset(&mut rng, W, H);
            assert!(p.radius >= 1.0 && p.radius < 3.0);
            assert!(p.velocity.x >= -0.4 && p.velocity.x < 0.4);
            assert!(p.velocity.y >= -0.4 && p.velocity.y < 0.4);
            assert!(p.fade_decay >= 0.003 && p.fade_decay < 0.005);
            assert_eq!(p.opacity, 1.0);
        }
    }

    #[test]
    fn test_reset_places_on_exactly_one_edge() {
        let mut rng = rng();
        let mut p = Particle::spawned(&mut rng, W, H);
        for _ in 0..500 {
            p.reset(&mut rng, W, H);
            let on_top = p.position.y == -p.radius && (0.0..W).contains(&p.position.x);
            let on_right = p.position.x == W + p.radius && (0.0..H).contains(&p.position.y);
            let on_bottom = p.position.y == H + p.radius && (0.0..W).contains(&p.position.x);
            let on_left = p.position.x == -p.radius && (0.0..H).contains(&p.position.y);
            let edges = [on_top, on_right, on_bottom, on_left];
            assert_eq!(edges.iter().filter(|e| **e).count(), 1, "{:?}", p.position);
        }
    }

    #[test]
    fn test_update_integrates_velocity_and_fades() {
        let mut rng = rng();
        let mut p = Particle::spawned(&mut rng, W, H);
        p.position = Vec2::new(400.0, 300.0);
        p.velocity = Vec2::new(0.3, -0.2);
        p.opacity = 0.8;
        p.fade_decay = 0.004;

        p.update(&mut rng, W, H);

        assert_eq!(p.position, Vec2::new(400.3, 299.8));
        assert!((p.opacity - 0.796).abs() < 1e-6);
    }

    #[test]
    fn test_faded_out_particle_respawns_fresh() {
        let mut rng = rng();
        let mut p = Particle::spawned(&mut rng, W, H);
        p.position = Vec2::new(400.0, 300.0);
        p.opacity = 0.001;
        p.fade_decay = 0.01;

        p.update(&mut rng, W, H);

        assert_eq!(p.opacity, 1.0);
        assert!(p.radius >= 1.0 && p.radius < 3.0);
        // An interior position cannot survive a reset: spawns sit on an edge.
        assert_ne!(p.position, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_fully_off_surface_particle_respawns() {
        let mut rng = rng();
        let mut p = Particle::spawned(&mut rng, W, H);
        p.position = Vec2::new(-50.0, 300.0);
        p.radius = 2.0;
        p.velocity = Vec2::new(-1.0, 0.0);
        p.opacity = 1.0;
        p.fade_decay = 0.004;

        p.update(&mut rng, W, H);

        // (-51, 300) with radius 2 is fully past the left bound, so the
        // particle must be in a fresh-reset state.
        assert_eq!(p.opacity, 1.0);
        assert_ne!(p.position, Vec2::new(-51.0, 300.0));
    }

    #[test]
    fn test_partially_visible_particle_does_not_respawn() {
        let mut rng = rng();
        let mut p = Particle::spawned(&mut rng, W, H);
        // Circle straddles the left bound: x + radius >= 0.
        p.position = Vec2::new(-1.0, 300.0);
        p.radius = 2.0;
        p.velocity = Vec2::new(0.5, 0.0);
        p.opacity = 0.5;
        p.fade_decay = 0.004;

        p.update(&mut rng, W, H);

        assert_eq!(p.position, Vec2::new(-0.5, 300.0));
        assert!((p.opacity - 0.496).abs() < 1e-6);
    }

    #[test]
    fn test_opacity_stays_in_unit_interval_after_update() {
        let mut rng = rng();
        let mut p = Particle::spawned(&mut rng, W, H);
        for _ in 0..5000 {
            p.update(&mut rng, W, H);
            assert!(p.opacity > 0.0 && p.opacity <= 1.0, "opacity {}", p.opacity);
        }
    }
}
