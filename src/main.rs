mod command;
mod error_mapping;
mod session;

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use weatherdesk_core::{App, AppError, Config};
use weatherdesk_services::{CollectionStore, Desk};
use weatherdesk_weather::{OpenWeatherProvider, ProviderOptions};

use crate::session::{Session, Step};

#[derive(Parser)]
#[command(name = "weatherdesk")]
#[command(about = "Look up city weather, keep favorites and recently viewed cities", long_about = None)]
struct Cli {
    /// Config file (defaults to <config dir>/weatherdesk/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for the favorites and history database
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// OpenWeatherMap API key
    #[arg(long)]
    api_key: Option<String>,

    /// Keep favorites and history in memory only
    #[arg(long)]
    ephemeral: bool,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(key) = &self.api_key {
            config.provider.api_key = key.clone();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_at(cli.config.as_deref())?;
    cli.apply(&mut config);
    weatherdesk_core::init(&config.log_level)?;
    let config = match config.into_validated() {
        Ok((config, _)) => config,
        Err(e) => {
            let app_error = AppError::from(e);
            tracing::error!("{}", app_error);
            eprintln!("{}", app_error.user_message());
            return Err(app_error.into());
        }
    };

    let mut app = App::new(config);
    if !cli.ephemeral {
        app.initialize()?;
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    runtime.block_on(run(app.config(), cli.ephemeral))?;

    app.shutdown()?;
    Ok(())
}

fn provider_from(config: &Config) -> Result<OpenWeatherProvider> {
    let provider = OpenWeatherProvider::new(ProviderOptions {
        base_url: config.provider.base_url.clone(),
        api_key: config.provider.effective_api_key().unwrap_or_default(),
        timeout: Duration::from_secs(config.provider.timeout_secs),
    })
    .context("Failed to create weather provider")?;
    Ok(provider)
}

fn open_store(config: &Config, ephemeral: bool) -> CollectionStore {
    if ephemeral {
        tracing::info!("Using in-memory store");
        return CollectionStore::ephemeral();
    }

    let path = config.store_path();
    match CollectionStore::sqlite(&path) {
        Ok(store) => {
            tracing::info!(path = %path.display(), "Opened store");
            store
        }
        Err(e) => {
            let app_error = error_mapping::from_store_open(e);
            tracing::error!("{}", app_error);
            println!("{}", app_error.user_message());
            println!("Changes will not be kept after you quit.");
            CollectionStore::ephemeral()
        }
    }
}

async fn run(config: &Config, ephemeral: bool) -> Result<()> {
    let provider = provider_from(config)?;
    let (desk, mut rx) = Desk::new(provider, open_store(config, ephemeral));
    let mut session = Session::new(desk);

    println!("WeatherDesk. Type 'help' for commands.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt()?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    break;
                };
                match session.run_line(&line) {
                    Step::Quit => break,
                    Step::Continue(output) => {
                        if let Some(text) = output {
                            println!("{}", text);
                        }
                        prompt()?;
                    }
                }
            }
            Some(message) = rx.recv() => {
                if let Some(text) = session.on_lookup(message) {
                    println!("\n{}", text);
                    prompt()?;
                }
            }
        }
    }

    tracing::info!("Session ended");
    Ok(())
}

fn prompt() -> Result<()> {
    print!("> ");
    std::io::stdout().flush().context("Failed to flush stdout")?;
    Ok(())
}
