use crate::config::Config;
use crate::debug_if_enabled;
use crate::error::{GravityError, Result};
use crate::events::pointer::{button_name, BTN_LEFT_CODE};
use crate::services::InputState;
use crate::utils::DeviceFinder;
use evdev::{Device, EventType};
use std::sync::Arc;
use tracing::{debug, error, info};

use super::r#trait::PointerListenerTrait;

/// Слушатель кнопок мыши через evdev.
///
/// Устройство читается в разделяемом режиме, без grab: события должны
/// продолжать доходить до композитора, иначе пользователь не сможет
/// перетаскивать окна.
pub struct RealPointerListener {
    input_state: Arc<InputState>,
    device: Device,
}

impl RealPointerListener {
    pub fn new(config: Arc<Config>, input_state: Arc<InputState>) -> Result<Self> {
        info!("Инициализация RealPointerListener");

        let device_path = DeviceFinder::find_pointer_device(&config.input.device_path)?;

        let device = Device::open(&device_path).map_err(|e| {
            GravityError::DeviceNotFound(format!(
                "Не удалось открыть устройство {:?}: {}",
                device_path, e
            ))
        })?;

        info!("Устройство мыши: {}", device.name().unwrap_or("Unknown"));

        Ok(Self { input_state, device })
    }

    async fn run_impl(mut self) -> Result<()> {
        info!("RealPointerListener запущен, начинаем чтение событий");

        loop {
            // Чтение событий мыши (неблокирующее для tokio)
            let events_vec = match self.device.fetch_events() {
                Ok(events) => events.collect::<Vec<_>>(),
                Err(e) => {
                    error!("Ошибка чтения событий: {}", e);
                    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                    continue;
                }
            };

            for event in events_vec {
                self.handle_event(event);
            }

            // Небольшая задержка для предотвращения 100% загрузки CPU
            tokio::time::sleep(tokio::time::Duration::from_millis(1)).await;
        }
    }

    fn handle_event(&self, event: evdev::InputEvent) {
        if event.event_type() != EventType::KEY {
            return;
        }

        if event.code() != BTN_LEFT_CODE {
            debug_if_enabled!(
                "Игнорируем кнопку {}: перетаскивание только левой",
                button_name(event.code())
            );
            return;
        }

        match event.value() {
            0 => {
                debug!("Левая кнопка отпущена");
                self.input_state.set_pointer_pressed(false);
            }
            1 => {
                debug!("Левая кнопка нажата");
                self.input_state.set_pointer_pressed(true);
            }
            // Автоповтор (2) для кнопок мыши не интересен: важен уровень
            _ => {}
        }
    }
}

#[async_trait::async_trait]
impl PointerListenerTrait for RealPointerListener {
    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run_impl().await
    }
}

impl Drop for RealPointerListener {
    fn drop(&mut self) {
        info!("RealPointerListener завершает работу");
    }
}
