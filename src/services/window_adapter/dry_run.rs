use crate::error::Result;
use crate::events::{Snapshot, WindowId, WindowInfo, WindowRect};
use crate::physics::ScreenRect;
use tracing::info;

use super::r#trait::{MoveOutcome, WindowAdapter};

/// Эмуляция рабочего стола для dry-run режима: несколько синтетических
/// окон на экране 1920x1080. Команды перемещения применяются к
/// внутреннему состоянию, так что полный цикл симуляции можно гонять
/// без дисплейного сервера.
pub struct DryRunAdapter {
    windows: Vec<WindowInfo>,
}

impl DryRunAdapter {
    pub fn new() -> Self {
        info!("Dry-run режим - WindowAdapter работает в режиме эмуляции");

        let windows = vec![
            WindowInfo::new(
                WindowId::new("dry-1"),
                "Terminal - dry_run",
                WindowRect::new(100, 50, 640, 400),
            ),
            WindowInfo::new(
                WindowId::new("dry-2"),
                "Browser - dry_run",
                WindowRect::new(900, 200, 800, 600),
            ),
            WindowInfo::new(
                WindowId::new("dry-3"),
                "Editor - dry_run",
                WindowRect::new(400, 0, 500, 350),
            ),
        ];

        Self { windows }
    }
}

#[async_trait::async_trait]
impl WindowAdapter for DryRunAdapter {
    fn name(&self) -> &'static str {
        "dry-run"
    }

    async fn probe(&mut self) -> Result<()> {
        Ok(())
    }

    async fn snapshot(&mut self) -> Result<Snapshot> {
        Ok(Snapshot::new(self.windows.clone(), None))
    }

    async fn move_window(&mut self, id: &WindowId, x: i32, y: i32) -> Result<MoveOutcome> {
        match self.windows.iter_mut().find(|w| &w.id == id) {
            Some(win) => {
                win.rect.x = x;
                win.rect.y = y;
                Ok(MoveOutcome::Moved)
            }
            None => Ok(MoveOutcome::Vanished),
        }
    }

    async fn screen_size(&mut self) -> Result<ScreenRect> {
        Ok(ScreenRect::new(1920.0, 1080.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_move_reflected_in_next_snapshot() {
        let mut adapter = DryRunAdapter::new();

        let outcome = adapter
            .move_window(&WindowId::new("dry-1"), 10, 700)
            .await
            .unwrap();
        assert_eq!(outcome, MoveOutcome::Moved);

        let snapshot = adapter.snapshot().await.unwrap();
        let win = snapshot.get(&WindowId::new("dry-1")).unwrap();
        assert_eq!((win.rect.x, win.rect.y), (10, 700));
    }

    #[tokio::test]
    async fn test_move_unknown_window_is_vanished() {
        let mut adapter = DryRunAdapter::new();
        let outcome = adapter
            .move_window(&WindowId::new("ghost"), 0, 0)
            .await
            .unwrap();
        assert_eq!(outcome, MoveOutcome::Vanished);
    }
}
