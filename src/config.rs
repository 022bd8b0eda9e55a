use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub physics: PhysicsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            filter: "gravity_rust=info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    /// Путь к evdev устройству мыши или "auto" для автопоиска
    pub device_path: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            device_path: "auto".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WindowConfig {
    /// Бэкенд управления окнами: "auto", "xdotool", "wmctrl" или "sway"
    pub backend: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            backend: "auto".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationConfig {
    /// Частота тиков симуляции в герцах
    pub tick_rate_hz: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { tick_rate_hz: 60 }
    }
}

impl SimulationConfig {
    /// Длительность одного тика в секундах
    pub fn tick_duration_secs(&self) -> f64 {
        1.0 / self.tick_rate_hz as f64
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PhysicsConfig {
    /// Ускорение свободного падения, пикселей/с^2
    pub gravity: f64,
    /// Коэффициент трения по горизонтали, применяется каждый тик, (0, 1]
    pub friction: f64,
    /// Множитель скорости при броске окна мышью
    pub throw_multiplier: f64,
    /// Доля скорости после отскока от боковых краёв
    pub horizontal_restitution: f64,
    /// Доля скорости после отскока от верхнего/нижнего края
    pub vertical_restitution: f64,
    /// Минимальный размер окна для отслеживания (фильтр мимолётных окон)
    pub min_window_width: i32,
    pub min_window_height: i32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 1200.0,
            friction: 0.98,
            throw_multiplier: 1.5,
            horizontal_restitution: 0.5,
            vertical_restitution: 0.4,
            min_window_width: 1,
            min_window_height: 1,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            input: InputConfig::default(),
            window: WindowConfig::default(),
            simulation: SimulationConfig::default(),
            physics: PhysicsConfig::default(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::new()
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("GRAVITY_"));

        let config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // Валидация настроек логирования
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "pretty" | "json" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        // Валидация настроек окон
        match self.window.backend.as_str() {
            "auto" | "xdotool" | "wmctrl" | "sway" => {}
            _ => anyhow::bail!("Неверный бэкенд окон: {}", self.window.backend),
        }

        // Валидация настроек симуляции
        if self.simulation.tick_rate_hz == 0 {
            anyhow::bail!("tick_rate_hz должно быть больше 0");
        }

        // Валидация физических параметров
        if self.physics.gravity <= 0.0 {
            anyhow::bail!("gravity должно быть больше 0");
        }

        if self.physics.friction <= 0.0 || self.physics.friction > 1.0 {
            anyhow::bail!(
                "friction должно быть в диапазоне (0, 1], получено {}",
                self.physics.friction
            );
        }

        if self.physics.throw_multiplier <= 0.0 {
            anyhow::bail!("throw_multiplier должно быть больше 0");
        }

        for (name, value) in [
            ("horizontal_restitution", self.physics.horizontal_restitution),
            ("vertical_restitution", self.physics.vertical_restitution),
        ] {
            if !(0.0..=1.0).contains(&value) {
                anyhow::bail!("{} должно быть в диапазоне [0, 1], получено {}", name, value);
            }
        }

        if self.physics.min_window_width < 1 || self.physics.min_window_height < 1 {
            anyhow::bail!("Минимальный размер окна должен быть положительным");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_tick_duration() {
        let config = Config::default();
        assert!((config.simulation.tick_duration_secs() - 1.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_friction_rejected() {
        let mut config = Config::default();
        config.physics.friction = 0.0;
        assert!(config.validate().is_err());

        config.physics.friction = 1.5;
        assert!(config.validate().is_err());

        config.physics.friction = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_restitution_rejected() {
        let mut config = Config::default();
        config.physics.vertical_restitution = -0.1;
        assert!(config.validate().is_err());

        config.physics.vertical_restitution = 0.4;
        config.physics.horizontal_restitution = 1.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_backend_rejected() {
        let mut config = Config::default();
        config.window.backend = "hyprland".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_tick_rate_rejected() {
        let mut config = Config::default();
        config.simulation.tick_rate_hz = 0;
        assert!(config.validate().is_err());
    }
}
