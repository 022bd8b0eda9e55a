use serde::{Deserialize, Serialize};
use std::fmt;

/// Непрозрачный идентификатор окна.
///
/// Принадлежит оконному менеджеру: xdotool выдаёт десятичные числа,
/// wmctrl - шестнадцатеричные с префиксом 0x, sway - con_id. Внутри
/// одного бэкенда идентификаторы стабильны на время жизни окна.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowId(String);

impl WindowId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Геометрия окна в координатах экрана
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl WindowRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Мимолётные окна в процессе создания/разрушения сообщают нулевой
    /// или отрицательный размер - такие не отслеживаем
    pub fn has_positive_size(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Информация об окне из снимка
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowInfo {
    pub id: WindowId,
    pub title: String,
    pub rect: WindowRect,
}

impl WindowInfo {
    pub fn new(id: WindowId, title: impl Into<String>, rect: WindowRect) -> Self {
        Self {
            id,
            title: title.into(),
            rect,
        }
    }
}

impl fmt::Display for WindowInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\" [{}] {}x{}+{}+{}",
            self.title, self.id, self.rect.width, self.rect.height, self.rect.x, self.rect.y
        )
    }
}

/// Снимок состояния рабочего стола: все видимые окна верхнего уровня
/// плюс идентификатор активного окна на момент опроса
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub windows: Vec<WindowInfo>,
    pub active_id: Option<WindowId>,
}

impl Snapshot {
    pub fn new(windows: Vec<WindowInfo>, active_id: Option<WindowId>) -> Self {
        Self { windows, active_id }
    }

    pub fn get(&self, id: &WindowId) -> Option<&WindowInfo> {
        // Линейный поиск: окон на рабочем столе единицы-десятки
        self.windows.iter().find(|w| &w.id == id)
    }

    pub fn contains(&self, id: &WindowId) -> bool {
        self.get(id).is_some()
    }

    pub fn is_active(&self, id: &WindowId) -> bool {
        self.active_id.as_ref() == Some(id)
    }
}
