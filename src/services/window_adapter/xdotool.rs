use crate::error::{GravityError, Result};
use crate::events::{Snapshot, WindowId, WindowInfo, WindowRect};
use crate::physics::ScreenRect;
use std::process::Command;
use tracing::debug;

use super::r#trait::{MoveOutcome, WindowAdapter};

/// Бэкенд на базе xdotool (X11).
///
/// Снимок берётся одним вызовом с цепочкой команд, чтобы имена и
/// геометрия относились к одному и тому же набору окон:
/// `xdotool search --onlyvisible --name "." getwindowname %@
///  getwindowgeometry --shell %@`
pub struct XdotoolAdapter;

impl XdotoolAdapter {
    pub fn new() -> Self {
        Self
    }

    fn run(args: &[&str]) -> Result<std::process::Output> {
        Command::new("xdotool").args(args).output().map_err(|e| {
            debug!("xdotool не найден или не работает: {}", e);
            GravityError::Backend(format!("xdotool не найден: {}", e))
        })
    }
}

#[async_trait::async_trait]
impl WindowAdapter for XdotoolAdapter {
    fn name(&self) -> &'static str {
        "xdotool"
    }

    async fn probe(&mut self) -> Result<()> {
        let output = Self::run(&["getdisplaygeometry"])?;
        if output.status.success() {
            Ok(())
        } else {
            GravityError::backend("xdotool getdisplaygeometry failed")
        }
    }

    async fn snapshot(&mut self) -> Result<Snapshot> {
        let output = Self::run(&[
            "search",
            "--onlyvisible",
            "--name",
            ".",
            "getwindowname",
            "%@",
            "getwindowgeometry",
            "--shell",
            "%@",
        ])?;

        if !output.status.success() {
            // Окно могло исчезнуть посреди цепочки команд - гонка
            // перечисления, тик просто пропускается
            let stderr = String::from_utf8_lossy(&output.stderr);
            return GravityError::backend(format!("xdotool search вернул ошибку: {}", stderr));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let windows = parse_snapshot_output(&stdout)?;

        // Отсутствие активного окна - не ошибка (фокус на рабочем столе)
        let active_id = Self::run(&["getactivewindow"])
            .ok()
            .filter(|out| out.status.success())
            .map(|out| WindowId::new(String::from_utf8_lossy(&out.stdout).trim().to_string()));

        Ok(Snapshot::new(windows, active_id))
    }

    async fn move_window(&mut self, id: &WindowId, x: i32, y: i32) -> Result<MoveOutcome> {
        let output = Self::run(&["windowmove", id.as_str(), &x.to_string(), &y.to_string()])?;
        if output.status.success() {
            Ok(MoveOutcome::Moved)
        } else {
            // BadWindow: окно разрушено между снимком и перемещением
            Ok(MoveOutcome::Vanished)
        }
    }

    async fn screen_size(&mut self) -> Result<ScreenRect> {
        let output = Self::run(&["getdisplaygeometry"])?;
        if !output.status.success() {
            return GravityError::backend("xdotool getdisplaygeometry вернул ошибку");
        }
        parse_display_geometry(&String::from_utf8_lossy(&output.stdout))
    }
}

fn parse_display_geometry(stdout: &str) -> Result<ScreenRect> {
    let mut parts = stdout.split_whitespace();
    let width: f64 = parts
        .next()
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| GravityError::Backend(format!("Неверная геометрия экрана: {}", stdout)))?;
    let height: f64 = parts
        .next()
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| GravityError::Backend(format!("Неверная геометрия экрана: {}", stdout)))?;
    Ok(ScreenRect::new(width, height))
}

/// Разбор объединённого вывода: сначала имена окон (по строке на окно),
/// затем блоки `getwindowgeometry --shell` по 6 строк каждый
fn parse_snapshot_output(stdout: &str) -> Result<Vec<WindowInfo>> {
    let lines: Vec<&str> = stdout.lines().collect();
    let first_block = lines
        .iter()
        .position(|l| l.starts_with("WINDOW="))
        .unwrap_or(lines.len());

    let names = &lines[..first_block];
    let mut windows = Vec::new();
    let mut current: Option<(WindowId, WindowRect)> = None;

    for line in &lines[first_block..] {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        match key {
            "WINDOW" => {
                if let Some(win) = current.take() {
                    windows.push(win);
                }
                current = Some((WindowId::new(value.to_string()), WindowRect::new(0, 0, 0, 0)));
            }
            "X" => {
                if let Some((_, rect)) = current.as_mut() {
                    rect.x = parse_field(value)?;
                }
            }
            "Y" => {
                if let Some((_, rect)) = current.as_mut() {
                    rect.y = parse_field(value)?;
                }
            }
            "WIDTH" => {
                if let Some((_, rect)) = current.as_mut() {
                    rect.width = parse_field(value)?;
                }
            }
            "HEIGHT" => {
                if let Some((_, rect)) = current.as_mut() {
                    rect.height = parse_field(value)?;
                }
            }
            _ => {}
        }
    }
    if let Some(win) = current.take() {
        windows.push(win);
    }

    if names.len() != windows.len() {
        // Набор окон поменялся между командами цепочки
        return GravityError::backend(format!(
            "Рассинхронизация имён и геометрии: {} имён, {} окон",
            names.len(),
            windows.len()
        ));
    }

    Ok(names
        .iter()
        .zip(windows)
        .map(|(name, (id, rect))| WindowInfo::new(id, name.to_string(), rect))
        .collect())
}

fn parse_field(value: &str) -> Result<i32> {
    value
        .parse()
        .map_err(|_| GravityError::Backend(format!("Неверное значение геометрии: {}", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_display_geometry() {
        let screen = parse_display_geometry("1920 1080\n").unwrap();
        assert_eq!(screen.width, 1920.0);
        assert_eq!(screen.height, 1080.0);

        assert!(parse_display_geometry("garbage").is_err());
    }

    #[test]
    fn test_parse_snapshot_output() {
        let stdout = "\
Терминал - htop
Firefox
WINDOW=41943044
X=760
Y=0
WIDTH=400
HEIGHT=300
SCREEN=0
WINDOW=46137352
X=0
Y=128
WIDTH=1280
HEIGHT=720
SCREEN=0
";
        let windows = parse_snapshot_output(stdout).unwrap();
        assert_eq!(windows.len(), 2);

        assert_eq!(windows[0].id, WindowId::new("41943044"));
        assert_eq!(windows[0].title, "Терминал - htop");
        assert_eq!(windows[0].rect, WindowRect::new(760, 0, 400, 300));

        assert_eq!(windows[1].id, WindowId::new("46137352"));
        assert_eq!(windows[1].rect, WindowRect::new(0, 128, 1280, 720));
    }

    #[test]
    fn test_parse_snapshot_mismatch_is_error() {
        // Окно исчезло между getwindowname и getwindowgeometry
        let stdout = "\
Терминал
Firefox
WINDOW=41943044
X=0
Y=0
WIDTH=400
HEIGHT=300
SCREEN=0
";
        assert!(parse_snapshot_output(stdout).is_err());
    }

    #[test]
    fn test_parse_empty_output() {
        let windows = parse_snapshot_output("").unwrap();
        assert!(windows.is_empty());
    }
}
