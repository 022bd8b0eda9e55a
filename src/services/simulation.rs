use crate::config::Config;
use crate::debug_if_enabled;
use crate::physics::{self, MoveCommand, PhysicsParams, ScreenRect, WindowRegistry};
use crate::services::window_adapter::{MoveOutcome, WindowAdapter};
use crate::services::InputState;
use std::sync::Arc;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Цикл симуляции: единственный владелец реестра и адаптера окон.
///
/// Каждый тик: свежий снимок рабочего стола, реконсиляция реестра,
/// интеграция каждого тела, команды перемещения. Расписание тиков
/// ведётся по абсолютным дедлайнам (tokio interval), а не накопительным
/// сном, чтобы дрейф под нагрузкой не накапливался.
pub struct SimulationLoop {
    adapter: Box<dyn WindowAdapter + Send>,
    input_state: Arc<InputState>,
    registry: WindowRegistry,
    params: PhysicsParams,
    screen: ScreenRect,
    dt: f64,
}

impl SimulationLoop {
    pub fn new(
        config: Arc<Config>,
        adapter: Box<dyn WindowAdapter + Send>,
        input_state: Arc<InputState>,
    ) -> Self {
        Self {
            adapter,
            input_state,
            registry: WindowRegistry::new(
                config.physics.min_window_width,
                config.physics.min_window_height,
            ),
            params: PhysicsParams::from(&config.physics),
            screen: ScreenRect::new(0.0, 0.0),
            dt: config.simulation.tick_duration_secs(),
        }
    }

    pub async fn run(mut self) -> crate::error::Result<()> {
        self.bootstrap().await?;

        let mut ticker = interval(Duration::from_secs_f64(self.dt));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            "Цикл симуляции запущен: {} Гц, бэкенд {}",
            (1.0 / self.dt).round(),
            self.adapter.name()
        );

        // Флаг проверяется в начале каждого тика: остановка завершает
        // текущий тик целиком, а не прерывает его посередине
        while self.input_state.is_running() {
            ticker.tick().await;
            if !self.input_state.is_running() {
                break;
            }
            self.tick().await;
        }

        info!("Цикл симуляции остановлен");
        Ok(())
    }

    async fn bootstrap(&mut self) -> crate::error::Result<()> {
        self.screen = self.adapter.screen_size().await?;
        info!(
            "Экран {}x{}, бэкенд окон: {}",
            self.screen.width,
            self.screen.height,
            self.adapter.name()
        );
        Ok(())
    }

    /// Один тик симуляции. Никакая ошибка внутри тика не фатальна и не
    /// прекращает отслеживание остальных окон.
    async fn tick(&mut self) {
        // Гонка перечисления: реестр не трогаем, тик становится no-op
        let snapshot = match self.adapter.snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                debug_if_enabled!("Снимок окон не удался, пропускаем тик: {}", e);
                return;
            }
        };

        self.registry.reconcile(&snapshot);

        let pointer_pressed = self.input_state.pointer_pressed();

        let mut commands: Vec<MoveCommand> = Vec::new();
        for body in self.registry.bodies_mut() {
            // Реконсиляция только что прошла, тело обязано быть в снимке
            let Some(win) = snapshot.get(&body.id) else {
                continue;
            };
            let is_active = snapshot.is_active(&body.id);
            let prev_mode = body.mode;
            if let Some(cmd) = physics::step(
                body,
                &win.rect,
                is_active,
                pointer_pressed,
                self.dt,
                &self.params,
                self.screen,
            ) {
                commands.push(cmd);
            }
            if body.mode != prev_mode {
                debug!("Окно {} сменило режим: {} -> {}", body.id, prev_mode, body.mode);
            }
        }

        for cmd in commands {
            match self.adapter.move_window(&cmd.id, cmd.x, cmd.y).await {
                Ok(MoveOutcome::Moved) => {}
                Ok(MoveOutcome::Vanished) => {
                    // Окно закрылось между снимком и перемещением;
                    // следующая реконсиляция его выселит
                    debug!("Окно {} исчезло во время перемещения", cmd.id);
                }
                Err(e) => {
                    warn!("Не удалось переместить окно {}: {}", cmd.id, e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GravityError, Result};
    use crate::events::{Snapshot, WindowId, WindowInfo, WindowRect};
    use crate::services::window_adapter::create_window_adapter;

    fn make_loop(adapter: Box<dyn WindowAdapter + Send>) -> SimulationLoop {
        let config = Arc::new(Config::default());
        SimulationLoop::new(config, adapter, Arc::new(InputState::new()))
    }

    #[tokio::test]
    async fn test_dry_run_windows_fall() {
        let adapter = create_window_adapter(Arc::new(Config::default()), true)
            .await
            .unwrap();
        let mut sim = make_loop(adapter);
        sim.bootstrap().await.unwrap();

        sim.tick().await;
        assert_eq!(sim.registry.len(), 3);

        for _ in 0..59 {
            sim.tick().await;
        }

        // Секунда падения: все тела ушли вниз и остались в пределах экрана
        let snapshot = sim.adapter.snapshot().await.unwrap();
        let starts = [("dry-1", 50, 400), ("dry-2", 200, 600), ("dry-3", 0, 350)];
        for (id, start_y, height) in starts {
            let win = snapshot.get(&WindowId::new(id)).unwrap();
            assert!(win.rect.y > start_y, "{} не упало: y={}", id, win.rect.y);
            assert!(win.rect.y <= 1080 - height);
        }
    }

    /// Адаптер, у которого перечисление отваливается после первого снимка
    struct FlakyAdapter {
        calls: usize,
    }

    #[async_trait::async_trait]
    impl WindowAdapter for FlakyAdapter {
        fn name(&self) -> &'static str {
            "flaky"
        }

        async fn probe(&mut self) -> Result<()> {
            Ok(())
        }

        async fn snapshot(&mut self) -> Result<Snapshot> {
            self.calls += 1;
            if self.calls == 1 {
                Ok(Snapshot::new(
                    vec![WindowInfo::new(
                        WindowId::new("w"),
                        "окно",
                        WindowRect::new(100, 100, 400, 300),
                    )],
                    None,
                ))
            } else {
                GravityError::backend("transient")
            }
        }

        async fn move_window(&mut self, _id: &WindowId, _x: i32, _y: i32) -> Result<MoveOutcome> {
            Ok(MoveOutcome::Moved)
        }

        async fn screen_size(&mut self) -> Result<ScreenRect> {
            Ok(ScreenRect::new(1920.0, 1080.0))
        }
    }

    #[tokio::test]
    async fn test_failed_snapshot_skips_tick() {
        let mut sim = make_loop(Box::new(FlakyAdapter { calls: 0 }));
        sim.bootstrap().await.unwrap();

        sim.tick().await;
        assert_eq!(sim.registry.len(), 1);
        let vy_after_first = sim
            .registry
            .get(&WindowId::new("w"))
            .unwrap()
            .velocity
            .y;

        // Сбойный снимок: реестр не тронут, тела не интегрировались
        sim.tick().await;
        assert_eq!(sim.registry.len(), 1);
        let body = sim.registry.get(&WindowId::new("w")).unwrap();
        assert_eq!(body.velocity.y, vy_after_first);
    }
}
