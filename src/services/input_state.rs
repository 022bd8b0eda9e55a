use std::sync::atomic::{AtomicBool, Ordering};

/// Разделяемое между потоками состояние: уровень левой кнопки мыши и
/// флаг работы процесса. Единственная точка синхронизации всего ядра -
/// два атомарных булева, никакой очереди событий не ведётся: детекция
/// перетаскивания срабатывает по уровню, не по фронту.
#[derive(Debug)]
pub struct InputState {
    pointer_pressed: AtomicBool,
    running: AtomicBool,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    pub fn new() -> Self {
        Self {
            pointer_pressed: AtomicBool::new(false),
            running: AtomicBool::new(true),
        }
    }

    /// Вызывается из потока слушателя мыши; никогда не блокирует
    pub fn set_pointer_pressed(&self, pressed: bool) {
        self.pointer_pressed.store(pressed, Ordering::Relaxed);
    }

    /// Читается один раз за тик потоком симуляции
    pub fn pointer_pressed(&self) -> bool {
        self.pointer_pressed.load(Ordering::Relaxed)
    }

    /// Запросить остановку: цикл симуляции завершит текущий тик и выйдет
    pub fn shutdown(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }
}
