use anyhow::{Context, Result};
use std::sync::Arc;

use crate::Config;

/// Application state and lifecycle manager
pub struct App {
    config: Arc<Config>,
    initialized: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            initialized: false,
        }
    }

    /// Prepare the data directory. Safe to call more than once.
    pub fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }

        std::fs::create_dir_all(&self.config.data_dir).with_context(|| {
            format!(
                "Failed to create data directory {}",
                self.config.data_dir.display()
            )
        })?;

        tracing::info!(
            data_dir = %self.config.data_dir.display(),
            "Application initialized"
        );
        self.initialized = true;
        Ok(())
    }

    pub fn shutdown(&mut self) -> Result<()> {
        tracing::info!("Shutting down application");
        self.initialized = false;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}
