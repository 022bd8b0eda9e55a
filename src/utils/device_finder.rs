use crate::error::{GravityError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub struct DeviceFinder;

impl DeviceFinder {
    /// Найти подходящее устройство мыши
    pub fn find_pointer_device(device_path: &str) -> Result<PathBuf> {
        if device_path != "auto" {
            let path = PathBuf::from(device_path);
            return if path.exists() {
                info!("Используется указанное устройство: {:?}", path);
                Ok(path)
            } else {
                GravityError::device_not_found(format!(
                    "Указанное устройство не найдено: {:?}",
                    path
                ))
            };
        }

        // Автопоиск устройства мыши
        Self::auto_find_pointer()
    }

    fn auto_find_pointer() -> Result<PathBuf> {
        info!("Начинаем автопоиск устройства мыши...");

        // Попробуем найти устройство по ID
        if let Ok(device) = Self::find_by_id() {
            info!("Найдено устройство по ID: {:?}", device);
            return Ok(device);
        }

        // Попробуем найти устройство в /dev/input/event*
        if let Ok(device) = Self::find_by_event_devices() {
            info!("Найдено устройство среди event устройств: {:?}", device);
            return Ok(device);
        }

        GravityError::device_not_found(
            "Не удалось найти подходящее устройство мыши. \
             Убедитесь, что пользователь добавлен в группу 'input'",
        )
    }

    fn find_by_id() -> Result<PathBuf> {
        let by_id_dir = Path::new("/dev/input/by-id");

        if !by_id_dir.exists() {
            debug!("Директория /dev/input/by-id не существует");
            return GravityError::device_not_found("Директория by-id не найдена");
        }

        let entries = fs::read_dir(by_id_dir)
            .map_err(|e| GravityError::Permission(format!("Нет доступа к /dev/input/by-id: {}", e)))?;

        let mut candidates = Vec::new();

        for entry in entries {
            let entry = entry.map_err(GravityError::Io)?;
            let path = entry.path();
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("");

            if (name.contains("mouse") || name.contains("Mouse")) && name.contains("event") {
                debug!("Найдено потенциальное устройство мыши: {:?}", path);

                if !Self::is_device_accessible(&path) {
                    warn!("Устройство {:?} недоступно", path);
                    continue;
                }

                if Self::is_pointer_device(&path)? {
                    let priority = if name.ends_with("event-mouse") { 100 } else { 10 };
                    candidates.push((path, priority));
                }
            }
        }

        // Сортируем по приоритету и возвращаем лучшее
        candidates.sort_by(|a, b| b.1.cmp(&a.1));

        if let Some((pointer, _)) = candidates.into_iter().next() {
            Ok(pointer)
        } else {
            GravityError::device_not_found("Устройство мыши не найдено в by-id")
        }
    }

    fn find_by_event_devices() -> Result<PathBuf> {
        let input_dir = Path::new("/dev/input");

        let entries = fs::read_dir(input_dir)
            .map_err(|e| GravityError::Permission(format!("Нет доступа к /dev/input: {}", e)))?;

        let mut event_devices = Vec::new();

        for entry in entries {
            let entry = entry.map_err(GravityError::Io)?;
            let path = entry.path();
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("");

            if name.starts_with("event") {
                event_devices.push(path);
            }
        }

        // Сортируем устройства по номеру
        event_devices.sort();

        for device_path in event_devices {
            debug!("Проверяем устройство: {:?}", device_path);

            if Self::is_pointer_device(&device_path)? && Self::is_device_accessible(&device_path) {
                return Ok(device_path);
            }
        }

        GravityError::device_not_found("Не найдено доступное устройство мыши среди event устройств")
    }

    /// Мышь определяется по возможностям: левая кнопка плюс
    /// относительные оси перемещения. Тачпады с BTN_LEFT тоже подходят.
    fn is_pointer_device(device_path: &Path) -> Result<bool> {
        match evdev::Device::open(device_path) {
            Ok(device) => {
                let has_left_button = device
                    .supported_keys()
                    .map_or(false, |keys| keys.contains(evdev::KeyCode::BTN_LEFT));

                let has_motion = device.supported_relative_axes().map_or(false, |axes| {
                    axes.contains(evdev::RelativeAxisCode::REL_X)
                        && axes.contains(evdev::RelativeAxisCode::REL_Y)
                });

                let is_pointer = has_left_button && has_motion;
                if is_pointer {
                    info!("Устройство {:?} подходит как мышь", device_path);
                    debug!("Имя устройства: {:?}", device.name());
                } else {
                    debug!(
                        "Устройство {:?} не подходит как мышь (кнопка: {}, оси: {})",
                        device_path, has_left_button, has_motion
                    );
                }

                Ok(is_pointer)
            }
            Err(e) => {
                debug!("Не удалось открыть устройство {:?}: {}", device_path, e);
                Ok(false)
            }
        }
    }

    fn is_device_accessible(device_path: &Path) -> bool {
        match fs::File::open(device_path) {
            Ok(_) => true,
            Err(e) => {
                debug!("Устройство {:?} недоступно: {}", device_path, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_pointer_device_with_missing_path() {
        let result = DeviceFinder::find_pointer_device("/non/existent/path");
        assert!(result.is_err());
    }
}
