//! # driftglow
//!
//! An ambient glow-particle background: points that drift along constant
//! velocities, fade out, and respawn from the surface edges, forever.
//!
//! The engine is a plain CPU simulation behind two small traits - a
//! [`Surface`](surface::Surface) it paints circles onto and a
//! [`FrameScheduler`](surface::FrameScheduler) that arms the next frame -
//! so it runs identically under the bundled winit/wgpu window, in headless
//! tests, or embedded in another render loop.
//!
//! ## Quick Start
//!
//! ```ignore
//! use driftglow::prelude::*;
//!
//! let mut sim = Simulation::new(1024.0, 768.0)?
//!     .with_particle_count(80)
//!     .with_seed(7);
//!
//! let mut surface = NullSurface;
//! let mut sched = ManualScheduler::new();
//! sim.seed();
//! sim.start(&mut sched);
//! sim.frame(&mut surface, &mut sched); // clear, update all, draw all
//! ```
//!
//! ## Lifecycle
//!
//! Each particle life runs from one reset to the next: the reset rolls a
//! radius in [1, 3), a velocity with components in [-0.4, 0.4), one of four
//! accent colors, and a per-step opacity decay in [0.003, 0.005), then
//! places the particle just outside a random surface edge. The life ends
//! when opacity reaches zero or the particle fully leaves the surface, and
//! the respawn happens inside the same update so no frame is skipped.
//!
//! Resizing reseeds the whole population for the new bounds; stopping
//! cancels the pending frame and is idempotent.

pub mod error;
pub mod particle;
mod shader;
pub mod simulation;
pub mod spawn;
pub mod surface;
pub mod time;
pub mod visuals;
pub mod window;

pub use glam::{Vec2, Vec3};
pub use particle::Particle;
pub use simulation::{LoopState, Simulation, DEFAULT_PARTICLE_COUNT};
pub use spawn::Edge;
pub use surface::{FrameScheduler, ManualScheduler, NullSurface, Surface};
pub use visuals::Accent;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use driftglow::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{DriverError, RunError};
    pub use crate::particle::Particle;
    pub use crate::simulation::{LoopState, Simulation, DEFAULT_PARTICLE_COUNT};
    pub use crate::spawn::Edge;
    pub use crate::surface::{FrameScheduler, ManualScheduler, NullSurface, Surface};
    pub use crate::time::Time;
    pub use crate::visuals::Accent;
    pub use crate::{Vec2, Vec3};
}
