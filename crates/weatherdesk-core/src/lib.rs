pub mod app;
pub mod config;
pub mod error;

pub use app::App;
pub use config::{Config, ProviderConfig, ValidationResult};
pub use error::{AppError, ConfigError, FavoritesError, StorageError, WeatherError};

use anyhow::Result;

/// Initialize logging. `RUST_LOG` wins over `default_level`.
pub fn init(default_level: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    tracing::debug!("WeatherDesk core initialized");
    Ok(())
}
