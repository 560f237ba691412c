//! Simulation driver: owns the particles and runs the frame loop.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::error::DriverError;
use crate::particle::Particle;
use crate::surface::{FrameScheduler, ManualScheduler, Surface};

/// Default number of live particles.
pub const DEFAULT_PARTICLE_COUNT: usize = 80;

/// Frame loop state. `Running` re-arms itself each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
}

/// The particle animation driver.
///
/// Owns the surface dimensions, the live particle collection, the injected
/// RNG, and the frame-loop state. One instance per animated surface; tests
/// can construct as many as they like with fixed seeds.
///
/// # Example
///
/// ```ignore
/// use driftglow::prelude::*;
///
/// let mut surface = NullSurface;
/// let mut sched = ManualScheduler::new();
/// let mut sim = Simulation::new(1024.0, 768.0)?
///     .with_seed(7);
/// sim.seed();
/// sim.start(&mut sched);
/// loop {
///     sim.frame(&mut surface, &mut sched);
/// }
/// ```
pub struct Simulation<F: FrameScheduler = ManualScheduler> {
    width: f32,
    height: f32,
    particle_count: usize,
    particles: Vec<Particle>,
    rng: SmallRng,
    state: LoopState,
    pending: Option<F::Handle>,
}

impl<F: FrameScheduler> Simulation<F> {
    /// Create a driver for a surface of the given size.
    ///
    /// Fails if the dimensions are not positive and finite - running the
    /// loop without a valid surface is the one fatal precondition, checked
    /// once here rather than per frame.
    pub fn new(width: f32, height: f32) -> Result<Self, DriverError> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(DriverError::EmptySurface { width, height });
        }
        Ok(Self {
            width,
            height,
            particle_count: DEFAULT_PARTICLE_COUNT,
            particles: Vec::new(),
            rng: SmallRng::from_entropy(),
            state: LoopState::Stopped,
            pending: None,
        })
    }

    /// Set the number of particles the next seed builds.
    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.particle_count = count;
        self
    }

    /// Replace the RNG with a fixed-seed one, for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    /// Change the particle count for subsequent seeds.
    ///
    /// Takes effect on the next [`Self::seed`]; the live collection is left
    /// untouched until then.
    pub fn set_particle_count(&mut self, count: usize) {
        self.particle_count = count;
    }

    /// (Re)build the particle collection from scratch.
    ///
    /// Discards whatever was there and constructs exactly `particle_count`
    /// fresh particles, each already reset to a randomized edge-spawn state.
    pub fn seed(&mut self) {
        let (width, height) = (self.width, self.height);
        self.particles.clear();
        self.particles.reserve(self.particle_count);
        for _ in 0..self.particle_count {
            let particle = Particle::spawned(&mut self.rng, width, height);
            self.particles.push(particle);
        }
    }

    /// Adopt a new viewport size and reseed.
    ///
    /// Forwards the size to the surface, then rebuilds all particles so the
    /// population adapts to the new bounds. Degenerate sizes (a minimized
    /// window reports 0x0) are ignored and the previous state kept.
    pub fn resize<S: Surface>(&mut self, surface: &mut S, width: f32, height: f32) {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return;
        }
        self.width = width;
        self.height = height;
        surface.set_dimensions(width, height);
        self.seed();
    }

    /// Enter the running state and arm the first frame.
    ///
    /// No-op if already running.
    pub fn start(&mut self, scheduler: &mut F) {
        if self.state == LoopState::Running {
            return;
        }
        self.state = LoopState::Running;
        self.pending = Some(scheduler.request_frame());
    }

    /// Run one iteration of the loop.
    ///
    /// The next frame is armed before any rendering work, so a slow frame
    /// never delays the scheduling of its successor. When stopped this is a
    /// no-op: a callback already in flight when `stop` ran completes
    /// harmlessly without re-arming.
    pub fn frame<S: Surface>(&mut self, surface: &mut S, scheduler: &mut F) {
        if self.state != LoopState::Running {
            return;
        }
        self.pending = Some(scheduler.request_frame());
        self.advance(surface);
    }

    /// Clear the surface, then update and draw every particle in order.
    ///
    /// Split out from [`Self::frame`] so headless callers can step the
    /// simulation without a scheduler.
    pub fn advance<S: Surface>(&mut self, surface: &mut S) {
        surface.clear();
        let (width, height) = (self.width, self.height);
        for particle in &mut self.particles {
            particle.update(&mut self.rng, width, height);
            particle.draw(surface);
        }
    }

    /// Leave the running state and cancel the pending frame, if any.
    ///
    /// Idempotent: stopping twice, or with nothing armed, is a no-op.
    pub fn stop(&mut self, scheduler: &mut F) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel(handle);
        }
        self.state = LoopState::Stopped;
    }

    /// Current loop state.
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Whether the frame loop is running.
    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// The live particle collection, in draw order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Current surface dimensions.
    pub fn dimensions(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::NullSurface;

    fn sim(width: f32, height: f32) -> Simulation {
        Simulation::new(width, height)
            .expect("valid dimensions")
            .with_seed(99)
    }

    #[test]
    fn test_new_rejects_degenerate_surfaces() {
        assert!(Simulation::<ManualScheduler>::new(0.0, 600.0).is_err());
        assert!(Simulation::<ManualScheduler>::new(800.0, -1.0).is_err());
        assert!(Simulation::<ManualScheduler>::new(f32::NAN, 600.0).is_err());
        assert!(Simulation::<ManualScheduler>::new(800.0, 600.0).is_ok());
    }

    #[test]
    fn test_seed_builds_exactly_the_configured_count() {
        let mut sim = sim(800.0, 600.0);
        assert!(sim.particles().is_empty());
        sim.seed();
        assert_eq!(sim.particles().len(), DEFAULT_PARTICLE_COUNT);
    }

    #[test]
    fn test_resize_ignores_minimized_sizes() {
        let mut sim = sim(800.0, 600.0);
        sim.seed();
        sim.resize(&mut NullSurface, 0.0, 0.0);
        assert_eq!(sim.dimensions(), (800.0, 600.0));
    }

    #[test]
    fn test_resize_reseeds_wholesale() {
        let mut sim = sim(800.0, 600.0);
        sim.seed();
        let before = sim.particles().to_vec();
        sim.resize(&mut NullSurface, 1024.0, 768.0);
        assert_eq!(sim.dimensions(), (1024.0, 768.0));
        assert_eq!(sim.particles().len(), before.len());
        assert_ne!(sim.particles(), &before[..]);
    }

    #[test]
    fn test_frame_is_a_noop_while_stopped() {
        let mut sim = sim(800.0, 600.0);
        sim.seed();
        let mut sched = ManualScheduler::new();
        sim.frame(&mut NullSurface, &mut sched);
        assert_eq!(sched.requested(), 0);
    }

    #[test]
    fn test_running_frame_rearms_itself() {
        let mut sim = sim(800.0, 600.0);
        sim.seed();
        let mut sched = ManualScheduler::new();
        sim.start(&mut sched);
        assert_eq!(sched.requested(), 1);
        sim.frame(&mut NullSurface, &mut sched);
        sim.frame(&mut NullSurface, &mut sched);
        assert_eq!(sched.requested(), 3);
        assert!(sched.is_armed());
    }
}
