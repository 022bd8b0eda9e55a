//! Интегратор физики окон: полуявный метод Эйлера с фиксированным шагом.
//!
//! За один тик для каждого тела: выбор режима управления, интеграция
//! скорости и позиции, отражение от краёв экрана, ограничение позиции
//! рабочей областью и, при необходимости, команда перемещения для
//! оконного менеджера.

use crate::config::PhysicsConfig;
use crate::events::{WindowId, WindowRect};
use crate::physics::body::{ControlMode, WindowBody};
use glam::DVec2;

/// Физические константы симуляции, снятые с конфигурации один раз при старте
#[derive(Debug, Clone, Copy)]
pub struct PhysicsParams {
    pub gravity: f64,
    pub friction: f64,
    pub throw_multiplier: f64,
    pub horizontal_restitution: f64,
    pub vertical_restitution: f64,
}

impl From<&PhysicsConfig> for PhysicsParams {
    fn from(config: &PhysicsConfig) -> Self {
        Self {
            gravity: config.gravity,
            friction: config.friction,
            throw_multiplier: config.throw_multiplier,
            horizontal_restitution: config.horizontal_restitution,
            vertical_restitution: config.vertical_restitution,
        }
    }
}

/// Размер экрана в пикселях
#[derive(Debug, Clone, Copy)]
pub struct ScreenRect {
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Команда перемещения окна, адресованная оконному менеджеру
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveCommand {
    pub id: WindowId,
    pub x: i32,
    pub y: i32,
}

/// Продвинуть одно тело на один тик.
///
/// `reported` - геометрия окна из свежего снимка этого тика. В режиме
/// перетаскивания позицией владеет оконный менеджер: команда
/// перемещения не выдаётся никогда, скорость оценивается по смещению
/// окна за тик (для броска при отпускании кнопки). В свободном падении
/// позицией владеет симулятор, а команда выдаётся только если усечённая
/// до пикселей цель отличается от текущей позиции окна.
pub fn step(
    body: &mut WindowBody,
    reported: &WindowRect,
    is_active: bool,
    pointer_pressed: bool,
    dt: f64,
    params: &PhysicsParams,
    screen: ScreenRect,
) -> Option<MoveCommand> {
    // Переходы вычисляются каждый тик по уровню сигнала, не по фронту
    body.mode = if is_active && pointer_pressed {
        ControlMode::Dragged
    } else {
        ControlMode::Falling
    };

    if body.mode == ControlMode::Dragged {
        let current = DVec2::new(reported.x as f64, reported.y as f64);
        body.velocity = (current - body.position) / dt * params.throw_multiplier;
        // Скорость отражает только движение последнего тика
        body.position = current;
        return None;
    }

    // Свободное падение: гравитация по вертикали, трение воздуха по горизонтали
    body.velocity.y += params.gravity * dt;
    body.velocity.x *= params.friction;

    let candidate = body.position + body.velocity * dt;

    // Отражение проверяется по кандидату до ограничения, чтобы тело,
    // перелетающее край за один тик, получило коррекцию скорости сразу
    if candidate.x <= 0.0 || candidate.x + body.size.x >= screen.width {
        body.velocity.x *= -params.horizontal_restitution;
    }
    if candidate.y <= 0.0 || candidate.y + body.size.y >= screen.height {
        body.velocity.y *= -params.vertical_restitution;
    }

    let max_x = (screen.width - body.size.x).max(0.0);
    let max_y = (screen.height - body.size.y).max(0.0);
    let clamped = DVec2::new(candidate.x.clamp(0.0, max_x), candidate.y.clamp(0.0, max_y));
    body.position = clamped;

    let target_x = clamped.x as i32;
    let target_y = clamped.y as i32;
    if target_x != reported.x || target_y != reported.y {
        Some(MoveCommand {
            id: body.id.clone(),
            x: target_x,
            y: target_y,
        })
    } else {
        None
    }
}
