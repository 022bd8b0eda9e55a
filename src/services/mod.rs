pub mod input_state;
pub mod pointer_listener;
pub mod simulation;
pub mod window_adapter;

pub use input_state::InputState;
pub use pointer_listener::create_pointer_listener;
pub use simulation::SimulationLoop;
pub use window_adapter::create_window_adapter;
