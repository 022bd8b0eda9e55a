//! WindowAdapter service: responsibility and boundaries
//!
//! This module and its submodules are responsible ONLY for talking to
//! the window manager: enumerating visible windows, querying the active
//! window, moving a window, reporting screen size. They MUST NOT
//! contain any physics or tracking logic. All simulation decisions are
//! made exclusively by the simulation loop and the physics integrator.

mod dry_run;
mod sway;
mod r#trait;
mod wmctrl;
mod xdotool;

pub use self::r#trait::{create_window_adapter, MoveOutcome, WindowAdapter};
