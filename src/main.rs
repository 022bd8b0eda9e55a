use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

mod config;
mod error;
mod events;
mod physics;
mod services;
mod utils;

use config::Config;
use services::{create_pointer_listener, create_window_adapter, InputState, SimulationLoop};

#[derive(Parser, Debug)]
#[command(name = "gravity-rust")]
#[command(about = "Гравитация для окон рабочего стола")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "gravity.toml")]
    config: String,

    /// Режим сухого запуска (эмуляция рабочего стола, без реальных окон)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Инициализация системы логирования
    init_tracing(&args.log_level)?;

    info!("Запуск Gravity Rust v{}", env!("CARGO_PKG_VERSION"));

    // Загрузка конфигурации
    let config = Arc::new(Config::load(&args.config)?);
    info!("Конфигурация загружена из: {}", args.config);

    if args.dry_run {
        warn!("Режим сухого запуска - окна рабочего стола не трогаем");
    } else {
        // Проверка прав доступа (нужен evdev для кнопок мыши)
        utils::permissions::check_permissions()?;
    }

    // Инициализация компонентов: единственное разделяемое состояние -
    // атомарный флаг кнопки мыши плюс флаг остановки
    let input_state = Arc::new(InputState::new());
    let window_adapter = create_window_adapter(config.clone(), args.dry_run).await?;
    let pointer_listener =
        create_pointer_listener(config.clone(), input_state.clone(), args.dry_run)?;
    let simulation = SimulationLoop::new(config.clone(), window_adapter, input_state.clone());

    info!("Все компоненты инициализированы");

    // Запуск сервисов параллельно
    let pointer_handle = tokio::spawn(async move {
        if let Err(e) = pointer_listener.run().await {
            error!("Ошибка в PointerListener: {}", e);
        }
    });
    let simulation_handle = tokio::spawn(async move {
        if let Err(e) = simulation.run().await {
            error!("Ошибка в SimulationLoop: {}", e);
        }
    });

    info!("Все сервисы запущены");

    // Ожидание сигнала завершения
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Получен сигнал завершения (Ctrl+C)");
        }
        Err(err) => {
            error!("Ошибка при ожидании сигнала завершения: {}", err);
        }
    }

    info!("Завершение работы...");

    // Цикл симуляции завершает текущий тик и выходит сам
    input_state.shutdown();

    // Слушатель мыши событийный, его просто прерываем
    pointer_handle.abort();

    // Ожидаем завершения задач (с таймаутом)
    let shutdown_timeout = tokio::time::Duration::from_secs(5);
    let shutdown_result = tokio::time::timeout(shutdown_timeout, async {
        let _ = simulation_handle.await;
        let _ = pointer_handle.await;
    })
    .await;

    match shutdown_result {
        Ok(_) => info!("Все сервисы завершили работу корректно"),
        Err(_) => warn!("Таймаут при завершении сервисов"),
    }

    info!("Gravity Rust завершил работу");
    Ok(())
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().compact())
        .init();

    Ok(())
}
