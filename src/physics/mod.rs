pub mod body;
pub mod integrator;
pub mod registry;

pub use body::{ControlMode, WindowBody};
pub use integrator::{step, MoveCommand, PhysicsParams, ScreenRect};
pub use registry::WindowRegistry;
