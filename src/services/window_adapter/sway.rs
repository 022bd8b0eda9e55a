use crate::error::{GravityError, Result};
use crate::events::{Snapshot, WindowId, WindowInfo, WindowRect};
use crate::physics::ScreenRect;
use serde::Deserialize;
use std::process::Command;
use tracing::debug;

use super::r#trait::{MoveOutcome, WindowAdapter};

/// Бэкенд для sway (Wayland): дерево контейнеров из
/// `swaymsg -t get_tree`, перемещение плавающих окон через критерий
/// `[con_id=..] move absolute position`.
pub struct SwayAdapter;

/// Узел дерева sway; разбираем только нужные поля
#[derive(Debug, Deserialize)]
struct TreeNode {
    id: u64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    focused: bool,
    #[serde(default)]
    visible: Option<bool>,
    #[serde(default)]
    pid: Option<i32>,
    rect: TreeRect,
    #[serde(default)]
    nodes: Vec<TreeNode>,
    #[serde(default)]
    floating_nodes: Vec<TreeNode>,
}

#[derive(Debug, Deserialize)]
struct TreeRect {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl SwayAdapter {
    pub fn new() -> Self {
        Self
    }

    fn run(args: &[&str]) -> Result<std::process::Output> {
        Command::new("swaymsg").args(args).output().map_err(|e| {
            debug!("swaymsg не найден или не работает: {}", e);
            GravityError::Backend(format!("swaymsg не найден: {}", e))
        })
    }

    fn get_tree() -> Result<TreeNode> {
        let output = Self::run(&["-t", "get_tree"])?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return GravityError::backend(format!("swaymsg вернул ошибку: {}", stderr));
        }
        serde_json::from_slice(&output.stdout)
            .map_err(|e| GravityError::Backend(format!("Неверный JSON от swaymsg: {}", e)))
    }
}

#[async_trait::async_trait]
impl WindowAdapter for SwayAdapter {
    fn name(&self) -> &'static str {
        "sway"
    }

    async fn probe(&mut self) -> Result<()> {
        Self::get_tree().map(|_| ())
    }

    async fn snapshot(&mut self) -> Result<Snapshot> {
        let tree = Self::get_tree()?;
        let mut windows = Vec::new();
        let mut active_id = None;
        collect_windows(&tree, &mut windows, &mut active_id);
        Ok(Snapshot::new(windows, active_id))
    }

    async fn move_window(&mut self, id: &WindowId, x: i32, y: i32) -> Result<MoveOutcome> {
        let command = format!(
            "[con_id={}] move absolute position {} {}",
            id.as_str(),
            x,
            y
        );
        let output = Self::run(&[command.as_str()])?;
        if output.status.success() {
            Ok(MoveOutcome::Moved)
        } else {
            // Критерий не нашёл контейнер - окно уже закрыто
            Ok(MoveOutcome::Vanished)
        }
    }

    async fn screen_size(&mut self) -> Result<ScreenRect> {
        let tree = Self::get_tree()?;
        Ok(ScreenRect::new(
            tree.rect.width as f64,
            tree.rect.height as f64,
        ))
    }
}

/// Обход дерева: окнами считаются узлы с pid (реальные приложения),
/// невидимые на текущем воркспейсе пропускаются
fn collect_windows(node: &TreeNode, windows: &mut Vec<WindowInfo>, active_id: &mut Option<WindowId>) {
    if node.pid.is_some() && node.visible != Some(false) {
        let id = WindowId::new(node.id.to_string());
        if node.focused {
            *active_id = Some(id.clone());
        }
        windows.push(WindowInfo::new(
            id,
            node.name.clone().unwrap_or_default(),
            WindowRect::new(node.rect.x, node.rect.y, node.rect.width, node.rect.height),
        ));
    }

    for child in node.nodes.iter().chain(node.floating_nodes.iter()) {
        collect_windows(child, windows, active_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_TREE: &str = r#"{
        "id": 1,
        "name": "root",
        "rect": {"x": 0, "y": 0, "width": 1920, "height": 1080},
        "nodes": [
            {
                "id": 3,
                "name": "workspace 1",
                "rect": {"x": 0, "y": 0, "width": 1920, "height": 1055},
                "nodes": [
                    {
                        "id": 10,
                        "name": "Терминал - htop",
                        "pid": 1234,
                        "visible": true,
                        "focused": true,
                        "rect": {"x": 760, "y": 0, "width": 400, "height": 300}
                    }
                ],
                "floating_nodes": [
                    {
                        "id": 11,
                        "name": "Firefox",
                        "pid": 5678,
                        "visible": true,
                        "rect": {"x": 0, "y": 128, "width": 1280, "height": 720}
                    },
                    {
                        "id": 12,
                        "name": "Скрытое окно",
                        "pid": 9999,
                        "visible": false,
                        "rect": {"x": 0, "y": 0, "width": 640, "height": 480}
                    }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_collect_windows_from_tree() {
        let tree: TreeNode = serde_json::from_str(SAMPLE_TREE).unwrap();
        let mut windows = Vec::new();
        let mut active_id = None;
        collect_windows(&tree, &mut windows, &mut active_id);

        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].id, WindowId::new("10"));
        assert_eq!(windows[0].title, "Терминал - htop");
        assert_eq!(windows[0].rect, WindowRect::new(760, 0, 400, 300));
        assert_eq!(windows[1].id, WindowId::new("11"));

        assert_eq!(active_id, Some(WindowId::new("10")));
    }

    #[test]
    fn test_root_rect_is_screen_size() {
        let tree: TreeNode = serde_json::from_str(SAMPLE_TREE).unwrap();
        assert_eq!(tree.rect.width, 1920);
        assert_eq!(tree.rect.height, 1080);
    }
}
