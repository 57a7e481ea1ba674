use crate::config::Config;
use crate::error::AppError;
use tracing_subscriber::{
    fmt, prelude::*, registry, EnvFilter,
};

pub fn init_logging(config: &Config) -> Result<(), AppError> {
    // RUST_LOG 优先，否则只放开本服务和 tower_http 的日志
    let level = &config.logging.level;
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("velo_api={level},tower_http={level},warn")));

    let formatting_layer = match config.logging.format.as_str() {
        "json" => fmt::layer().json().boxed(),
        _ => fmt::layer().pretty().boxed(),
    };

    registry()
        .with(env_filter)
        .with(formatting_layer)
        .try_init()
        .map_err(|e| AppError::Internal(format!("Failed to initialize logging: {}", e)))?;

    tracing::info!(
        level = %config.logging.level,
        format = %config.logging.format,
        "logging initialized"
    );

    Ok(())
}
