use thiserror::Error;

#[derive(Error, Debug)]
pub enum GravityError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Устройство не найдено: {0}")]
    DeviceNotFound(String),

    #[error("Недостаточно прав доступа: {0}")]
    Permission(String),

    #[error("Сервис недоступен: {0}")]
    ServiceUnavailable(String),

    #[error("Ошибка бэкенда окон: {0}")]
    Backend(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl GravityError {
    pub fn device_not_found<T>(msg: impl Into<String>) -> Result<T> {
        Err(GravityError::DeviceNotFound(msg.into()))
    }

    pub fn backend<T>(msg: impl Into<String>) -> Result<T> {
        Err(GravityError::Backend(msg.into()))
    }
}

pub type Result<T> = std::result::Result<T, GravityError>;
