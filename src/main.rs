use winit::event_loop::{ControlFlow, EventLoop};

use driftglow::error::RunError;
use driftglow::window::App;
use driftglow::DEFAULT_PARTICLE_COUNT;

fn main() -> Result<(), RunError> {
    let particle_count = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_PARTICLE_COUNT);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(particle_count);
    event_loop.run_app(&mut app)?;
    Ok(())
}
