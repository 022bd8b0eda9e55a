use crate::debug_if_enabled;
use crate::events::{Snapshot, WindowId};
use crate::physics::body::WindowBody;
use smallvec::SmallVec;
use std::collections::HashMap;
use tracing::info;

/// Реестр отслеживаемых окон.
///
/// Единственный владелец - цикл симуляции: вся мутация происходит на
/// его потоке, поэтому блокировки вокруг реестра не нужны. Между
/// потоками разделяется только флаг кнопки мыши в InputState.
#[derive(Debug)]
pub struct WindowRegistry {
    bodies: HashMap<WindowId, WindowBody>,
    min_width: i32,
    min_height: i32,
}

impl WindowRegistry {
    pub fn new(min_width: i32, min_height: i32) -> Self {
        Self {
            bodies: HashMap::new(),
            min_width,
            min_height,
        }
    }

    /// Привести реестр в соответствие со свежим снимком: завести тела
    /// для новых окон, обновить размеры существующих, выселить
    /// исчезнувшие. Позицию и скорость существующих тел реконсиляция
    /// не трогает.
    pub fn reconcile(&mut self, snapshot: &Snapshot) {
        for win in &snapshot.windows {
            match self.bodies.get_mut(&win.id) {
                Some(body) => body.refresh_size(&win.rect),
                None => {
                    // Мимолётное окно в процессе создания или разрушения -
                    // не ошибка, просто не отслеживаем
                    if !win.rect.has_positive_size()
                        || win.rect.width < self.min_width
                        || win.rect.height < self.min_height
                    {
                        debug_if_enabled!("Пропускаем мимолётное окно: {}", win);
                        continue;
                    }
                    info!("Обнаружено новое окно: {}", win);
                    self.bodies
                        .insert(win.id.clone(), WindowBody::new(win.id.clone(), &win.rect));
                }
            }
        }

        // Выселение синхронно в том же тике, где пропажа обнаружена
        let vanished: SmallVec<[WindowId; 8]> = self
            .bodies
            .keys()
            .filter(|id| !snapshot.contains(id))
            .cloned()
            .collect();
        for id in vanished {
            self.bodies.remove(&id);
            info!("Окно закрыто: {}", id);
        }
    }

    pub fn bodies_mut(&mut self) -> impl Iterator<Item = &mut WindowBody> {
        self.bodies.values_mut()
    }

    pub fn get(&self, id: &WindowId) -> Option<&WindowBody> {
        self.bodies.get(id)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{WindowInfo, WindowRect};
    use glam::DVec2;

    fn window(id: &str, rect: WindowRect) -> WindowInfo {
        WindowInfo::new(WindowId::new(id), format!("window-{}", id), rect)
    }

    fn registry() -> WindowRegistry {
        WindowRegistry::new(1, 1)
    }

    #[test]
    fn test_discovery_seeds_body_from_snapshot() {
        let mut reg = registry();
        let snapshot = Snapshot::new(vec![window("1", WindowRect::new(50, 60, 400, 300))], None);

        reg.reconcile(&snapshot);

        assert_eq!(reg.len(), 1);
        let body = reg.get(&WindowId::new("1")).unwrap();
        assert_eq!(body.position, DVec2::new(50.0, 60.0));
        assert_eq!(body.velocity, DVec2::ZERO);
    }

    #[test]
    fn test_zero_size_window_filtered() {
        let mut reg = registry();
        let snapshot = Snapshot::new(
            vec![
                window("fleeting", WindowRect::new(0, 0, 0, 300)),
                window("real", WindowRect::new(10, 10, 400, 300)),
            ],
            None,
        );

        reg.reconcile(&snapshot);

        assert_eq!(reg.len(), 1);
        assert!(reg.get(&WindowId::new("fleeting")).is_none());
    }

    #[test]
    fn test_min_size_filter() {
        let mut reg = WindowRegistry::new(100, 50);
        let snapshot = Snapshot::new(vec![window("tiny", WindowRect::new(0, 0, 99, 300))], None);

        reg.reconcile(&snapshot);
        assert!(reg.is_empty());
    }

    #[test]
    fn test_eviction_within_one_reconcile() {
        // Scenario D: окно пропало из снимка - следующая реконсиляция
        // убирает его из реестра
        let mut reg = registry();
        let rect = WindowRect::new(10, 10, 400, 300);
        reg.reconcile(&Snapshot::new(
            vec![window("1", rect), window("2", rect)],
            None,
        ));
        assert_eq!(reg.len(), 2);

        reg.reconcile(&Snapshot::new(vec![window("2", rect)], None));
        assert_eq!(reg.len(), 1);
        assert!(reg.get(&WindowId::new("1")).is_none());
        assert!(reg.get(&WindowId::new("2")).is_some());
    }

    #[test]
    fn test_reconcile_refreshes_size_only() {
        let mut reg = registry();
        reg.reconcile(&Snapshot::new(
            vec![window("1", WindowRect::new(10, 10, 400, 300))],
            None,
        ));

        // Симулятор успел сдвинуть тело и набрать скорость
        {
            let body = reg.bodies.get_mut(&WindowId::new("1")).unwrap();
            body.position = DVec2::new(200.0, 300.0);
            body.velocity = DVec2::new(0.0, 640.0);
        }

        // Окно ресайзнули снаружи, позиция в снимке тоже другая
        reg.reconcile(&Snapshot::new(
            vec![window("1", WindowRect::new(500, 500, 640, 480))],
            None,
        ));

        let body = reg.get(&WindowId::new("1")).unwrap();
        assert_eq!(body.size, DVec2::new(640.0, 480.0));
        assert_eq!(body.position, DVec2::new(200.0, 300.0));
        assert_eq!(body.velocity, DVec2::new(0.0, 640.0));
    }

    #[test]
    fn test_empty_snapshot_evicts_everything() {
        let mut reg = registry();
        let rect = WindowRect::new(10, 10, 400, 300);
        reg.reconcile(&Snapshot::new(
            vec![window("1", rect), window("2", rect), window("3", rect)],
            None,
        ));
        assert_eq!(reg.len(), 3);

        reg.reconcile(&Snapshot::default());
        assert!(reg.is_empty());
    }
}
