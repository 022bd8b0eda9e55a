pub mod pointer;
pub mod window;

pub use window::{Snapshot, WindowId, WindowInfo, WindowRect};
