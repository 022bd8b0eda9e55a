use crate::error::{GravityError, Result};
use crate::events::{Snapshot, WindowId, WindowInfo, WindowRect};
use crate::physics::ScreenRect;
use std::process::Command;
use tracing::debug;

use super::r#trait::{MoveOutcome, WindowAdapter};

/// Бэкенд на базе wmctrl (EWMH). Перечисление - `wmctrl -lG`,
/// перемещение - `wmctrl -i -r .. -e`, активное окно - через
/// `xprop -root _NET_ACTIVE_WINDOW`, потому что сам wmctrl его не отдаёт.
pub struct WmctrlAdapter;

impl WmctrlAdapter {
    pub fn new() -> Self {
        Self
    }

    fn run(program: &str, args: &[&str]) -> Result<std::process::Output> {
        Command::new(program).args(args).output().map_err(|e| {
            debug!("{} не найден или не работает: {}", program, e);
            GravityError::Backend(format!("{} не найден: {}", program, e))
        })
    }
}

#[async_trait::async_trait]
impl WindowAdapter for WmctrlAdapter {
    fn name(&self) -> &'static str {
        "wmctrl"
    }

    async fn probe(&mut self) -> Result<()> {
        let output = Self::run("wmctrl", &["-d"])?;
        if output.status.success() {
            Ok(())
        } else {
            GravityError::backend("wmctrl -d failed")
        }
    }

    async fn snapshot(&mut self) -> Result<Snapshot> {
        let output = Self::run("wmctrl", &["-lG"])?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return GravityError::backend(format!("wmctrl вернул ошибку: {}", stderr));
        }

        let windows = parse_window_list(&String::from_utf8_lossy(&output.stdout))?;

        let active_id = Self::run("xprop", &["-root", "_NET_ACTIVE_WINDOW"])
            .ok()
            .filter(|out| out.status.success())
            .and_then(|out| parse_active_window(&String::from_utf8_lossy(&out.stdout)));

        Ok(Snapshot::new(windows, active_id))
    }

    async fn move_window(&mut self, id: &WindowId, x: i32, y: i32) -> Result<MoveOutcome> {
        let geometry = format!("0,{},{},-1,-1", x, y);
        let output = Self::run("wmctrl", &["-i", "-r", id.as_str(), "-e", &geometry])?;
        if output.status.success() {
            Ok(MoveOutcome::Moved)
        } else {
            Ok(MoveOutcome::Vanished)
        }
    }

    async fn screen_size(&mut self) -> Result<ScreenRect> {
        let output = Self::run("wmctrl", &["-d"])?;
        if !output.status.success() {
            return GravityError::backend("wmctrl -d вернул ошибку");
        }
        parse_desktop_geometry(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Нормализация идентификатора в каноничный вид: wmctrl печатает
/// 0x03e00006, а xprop - 0x3e00006, без нормализации они не совпадут
fn normalize_id(raw: &str) -> Option<WindowId> {
    let hex = raw.strip_prefix("0x")?;
    let value = u64::from_str_radix(hex, 16).ok()?;
    Some(WindowId::new(format!("0x{:x}", value)))
}

/// Разбор вывода `wmctrl -lG`:
/// `0x03e00006  0 760  0    400  300  host Заголовок окна`
fn parse_window_list(stdout: &str) -> Result<Vec<WindowInfo>> {
    let mut windows = Vec::new();

    for line in stdout.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 8 {
            // Строка без заголовка - безымянные окна не отслеживаем
            continue;
        }

        // Липкие окна (доки, панели) помечены рабочим столом -1
        if parts[1] == "-1" {
            continue;
        }

        let Some(id) = normalize_id(parts[0]) else {
            continue;
        };

        let coords: Option<Vec<i32>> = parts[2..6].iter().map(|v| v.parse().ok()).collect();
        let Some(coords) = coords else {
            return GravityError::backend(format!("Неверная строка wmctrl: {}", line));
        };

        let rect = WindowRect::new(coords[0], coords[1], coords[2], coords[3]);
        let title = parts[7..].join(" ");
        windows.push(WindowInfo::new(id, title, rect));
    }

    Ok(windows)
}

/// Разбор `_NET_ACTIVE_WINDOW(WINDOW): window id # 0x3e00006`
fn parse_active_window(stdout: &str) -> Option<WindowId> {
    let raw = stdout
        .split_whitespace()
        .find(|token| token.starts_with("0x"))?
        .trim_end_matches(',');
    // 0x0 означает, что активного окна нет
    let id = normalize_id(raw)?;
    if id.as_str() == "0x0" {
        None
    } else {
        Some(id)
    }
}

/// Разбор `wmctrl -d`: размер экрана из поля DG первой строки
fn parse_desktop_geometry(stdout: &str) -> Result<ScreenRect> {
    for line in stdout.lines() {
        let mut tokens = line.split_whitespace();
        while let Some(token) = tokens.next() {
            if token == "DG:" {
                if let Some(geometry) = tokens.next() {
                    if let Some((w, h)) = geometry.split_once('x') {
                        if let (Ok(width), Ok(height)) = (w.parse(), h.parse()) {
                            return Ok(ScreenRect::new(width, height));
                        }
                    }
                }
            }
        }
    }
    GravityError::backend(format!("Не удалось разобрать wmctrl -d: {}", stdout))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_window_list() {
        let stdout = "\
0x03e00006  0 760  0    400  300  host Терминал - htop
0x04a00012 -1 0    0    1920 28   host Панель
0x05200003  1 0    128  1280 720  host Firefox - Mozilla Firefox
";
        let windows = parse_window_list(stdout).unwrap();
        assert_eq!(windows.len(), 2);

        assert_eq!(windows[0].id, WindowId::new("0x3e00006"));
        assert_eq!(windows[0].title, "Терминал - htop");
        assert_eq!(windows[0].rect, WindowRect::new(760, 0, 400, 300));

        assert_eq!(windows[1].id, WindowId::new("0x5200003"));
        assert_eq!(windows[1].title, "Firefox - Mozilla Firefox");
    }

    #[test]
    fn test_parse_active_window() {
        let id = parse_active_window("_NET_ACTIVE_WINDOW(WINDOW): window id # 0x03e00006\n");
        assert_eq!(id, Some(WindowId::new("0x3e00006")));

        // Идентификаторы wmctrl и xprop сходятся после нормализации
        let from_list = normalize_id("0x03e00006").unwrap();
        assert_eq!(id.unwrap(), from_list);

        assert_eq!(
            parse_active_window("_NET_ACTIVE_WINDOW(WINDOW): window id # 0x0\n"),
            None
        );
        assert_eq!(parse_active_window("garbage"), None);
    }

    #[test]
    fn test_parse_desktop_geometry() {
        let stdout = "0  * DG: 1920x1080  VP: 0,0  WA: 0,25 1920x1055  Рабочий стол\n";
        let screen = parse_desktop_geometry(stdout).unwrap();
        assert_eq!(screen.width, 1920.0);
        assert_eq!(screen.height, 1080.0);

        assert!(parse_desktop_geometry("garbage").is_err());
    }
}
