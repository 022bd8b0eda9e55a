use crate::config::Config;
use crate::error::{GravityError, Result};
use crate::events::{Snapshot, WindowId};
use crate::physics::ScreenRect;
use std::sync::Arc;
use tracing::info;

/// Outcome of a move request. A window destroyed between the snapshot
/// and the move call is a tolerated race, not an error: the body gets
/// dropped on the next reconcile pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    Vanished,
}

/// Trait for window-manager adapters. The simulation loop is the sole
/// owner and caller, so methods take `&mut self` and no adapter needs
/// internal locking.
#[async_trait::async_trait]
pub trait WindowAdapter: Send {
    /// Backend name for logging
    fn name(&self) -> &'static str;

    /// Cheap probe used by backend auto-detection
    async fn probe(&mut self) -> Result<()>;

    /// Enumerate all visible top-level windows plus the active window id.
    /// A failed call means a transient enumeration race; the caller
    /// skips the whole tick and retries on the next one.
    async fn snapshot(&mut self) -> Result<Snapshot>;

    /// Move a window to integer screen coordinates
    async fn move_window(&mut self, id: &WindowId, x: i32, y: i32) -> Result<MoveOutcome>;

    /// Usable screen size in pixels
    async fn screen_size(&mut self) -> Result<ScreenRect>;
}

/// Factory: pick a window adapter based on config and the dry_run flag
pub async fn create_window_adapter(
    config: Arc<Config>,
    dry_run: bool,
) -> Result<Box<dyn WindowAdapter + Send>> {
    if dry_run {
        return Ok(Box::new(super::dry_run::DryRunAdapter::new()));
    }

    match config.window.backend.as_str() {
        "xdotool" => Ok(Box::new(super::xdotool::XdotoolAdapter::new())),
        "wmctrl" => Ok(Box::new(super::wmctrl::WmctrlAdapter::new())),
        "sway" => Ok(Box::new(super::sway::SwayAdapter::new())),
        "auto" => detect_working_adapter().await,
        other => Err(GravityError::Internal(format!(
            "Неизвестный бэкенд окон: {}",
            other
        ))),
    }
}

/// Пробуем бэкенды по очереди и берём первый работающий
async fn detect_working_adapter() -> Result<Box<dyn WindowAdapter + Send>> {
    info!("Определяем рабочий бэкенд управления окнами...");

    let mut candidates: Vec<Box<dyn WindowAdapter + Send>> = vec![
        Box::new(super::xdotool::XdotoolAdapter::new()),
        Box::new(super::wmctrl::WmctrlAdapter::new()),
        Box::new(super::sway::SwayAdapter::new()),
    ];

    for mut adapter in candidates.drain(..) {
        if adapter.probe().await.is_ok() {
            info!("Используем бэкенд: {}", adapter.name());
            return Ok(adapter);
        }
    }

    Err(GravityError::ServiceUnavailable(
        "Ни один бэкенд управления окнами не работает (xdotool/wmctrl/sway)".to_string(),
    ))
}
