//! Rendering and scheduling collaborators.
//!
//! The simulation core depends only on these capabilities, not on any
//! specific rendering technology: a [`Surface`] it can clear and paint
//! circles onto, and a [`FrameScheduler`] that arms the next frame callback
//! and can cancel a pending one. The winit/wgpu backend in [`crate::window`]
//! provides the real implementations; [`NullSurface`] and
//! [`ManualScheduler`] run the engine headless for tests and benches.

use glam::{Vec2, Vec3};

/// A 2D rendering surface particles are drawn onto.
pub trait Surface {
    /// Resize the surface to the current viewport size.
    fn set_dimensions(&mut self, width: f32, height: f32);

    /// Erase the whole surface at the start of a frame.
    fn clear(&mut self);

    /// Paint a filled circle with a soft glow halo.
    ///
    /// `glow_radius` extends beyond `radius`; the whole shape is painted at
    /// `opacity`.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Vec3, opacity: f32, glow_radius: f32);
}

/// Per-frame callback scheduling.
///
/// `request_frame` arms the next iteration and returns an opaque handle;
/// `cancel` disarms a pending one. A frame already dispatched by the host
/// still runs to completion - cancellation only stops future arming.
pub trait FrameScheduler {
    /// Token identifying one pending frame request.
    type Handle;

    fn request_frame(&mut self) -> Self::Handle;

    fn cancel(&mut self, handle: Self::Handle);
}

/// Surface that swallows every draw call.
///
/// Lets the simulation advance at full speed with no rendering attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl Surface for NullSurface {
    fn set_dimensions(&mut self, _width: f32, _height: f32) {}

    fn clear(&mut self) {}

    fn fill_circle(&mut self, _: Vec2, _: f32, _: Vec3, _: f32, _: f32) {}
}

/// Scheduler that only counts requests, for driving frames by hand.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_token: u64,
    armed: Option<u64>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a frame request is currently armed.
    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Total frame requests made so far.
    pub fn requested(&self) -> u64 {
        self.next_token
    }
}

impl FrameScheduler for ManualScheduler {
    type Handle = u64;

    fn request_frame(&mut self) -> u64 {
        self.next_token += 1;
        self.armed = Some(self.next_token);
        self.next_token
    }

    fn cancel(&mut self, handle: u64) {
        if self.armed == Some(handle) {
            self.armed = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_scheduler_arms_and_cancels() {
        let mut sched = ManualScheduler::new();
        assert!(!sched.is_armed());

        let handle = sched.request_frame();
        assert!(sched.is_armed());

        sched.cancel(handle);
        assert!(!sched.is_armed());
    }

    #[test]
    fn test_cancel_of_stale_handle_is_a_noop() {
        let mut sched = ManualScheduler::new();
        let old = sched.request_frame();
        let _current = sched.request_frame();

        sched.cancel(old);
        assert!(sched.is_armed());
    }
}
