use crate::events::{WindowId, WindowRect};
use glam::DVec2;
use std::fmt;

/// Режим управления окном
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlMode {
    /// Окно в свободном падении, позицией владеет симулятор
    #[default]
    Falling,
    /// Пользователь тащит окно: позицией владеет оконный менеджер,
    /// симулятор только оценивает скорость для будущего броска
    Dragged,
}

impl fmt::Display for ControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlMode::Falling => write!(f, "falling"),
            ControlMode::Dragged => write!(f, "dragged"),
        }
    }
}

/// Физическое тело, соответствующее одному окну.
///
/// Вся арифметика в f64; усечение до целых пикселей происходит только
/// на границе с оконным менеджером, чтобы ошибка округления не
/// накапливалась между тиками.
#[derive(Debug, Clone)]
pub struct WindowBody {
    pub id: WindowId,
    /// Позиция верхнего левого угла на конец предыдущего тика
    pub position: DVec2,
    /// Скорость в пикселях/секунду
    pub velocity: DVec2,
    /// Размер окна, обновляется из снимка каждый тик
    pub size: DVec2,
    pub mode: ControlMode,
}

impl WindowBody {
    /// Новое тело: стартует с текущей позиции окна, нулевой скоростью,
    /// в режиме свободного падения
    pub fn new(id: WindowId, rect: &WindowRect) -> Self {
        Self {
            id,
            position: DVec2::new(rect.x as f64, rect.y as f64),
            velocity: DVec2::ZERO,
            size: DVec2::new(rect.width as f64, rect.height as f64),
            mode: ControlMode::Falling,
        }
    }

    pub fn refresh_size(&mut self, rect: &WindowRect) {
        // Отрицательный размер в обновлении игнорируем: окно в процессе
        // разрушения, реконсиляция уберёт его следующим снимком
        if rect.has_positive_size() {
            self.size = DVec2::new(rect.width as f64, rect.height as f64);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_mode_display() {
        assert_eq!(format!("{}", ControlMode::Falling), "falling");
        assert_eq!(format!("{}", ControlMode::Dragged), "dragged");
    }

    #[test]
    fn test_new_body_seeded_from_rect() {
        let rect = WindowRect::new(760, 0, 400, 300);
        let body = WindowBody::new(WindowId::new("1"), &rect);

        assert_eq!(body.position, DVec2::new(760.0, 0.0));
        assert_eq!(body.velocity, DVec2::ZERO);
        assert_eq!(body.size, DVec2::new(400.0, 300.0));
        assert_eq!(body.mode, ControlMode::Falling);
    }

    #[test]
    fn test_refresh_size_ignores_degenerate_rect() {
        let rect = WindowRect::new(0, 0, 400, 300);
        let mut body = WindowBody::new(WindowId::new("1"), &rect);

        body.refresh_size(&WindowRect::new(5, 5, 500, 350));
        assert_eq!(body.size, DVec2::new(500.0, 350.0));

        body.refresh_size(&WindowRect::new(5, 5, 0, 350));
        assert_eq!(body.size, DVec2::new(500.0, 350.0));
    }
}
