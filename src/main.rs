mod api;
mod app;
mod cache;
mod commands;
mod config;
mod event;
mod filter;
mod form;
mod query;
mod ui;

use api::{CachedCharacterClient, CharacterClient};
use cache::{CharacterStore, MemoryStorage, SqliteStorage};
use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
const LOG_ENV: &str = "SPRINGFIELD_LOG";

#[derive(Parser, Debug)]
#[command(name = "springfield")]
#[command(about = "A terminal UI for browsing Simpsons characters, inspired by k9s")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/springfield/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Characters API base URL
  #[arg(short, long)]
  base_url: Option<String>,

  /// Keep the character cache in memory for this session only
  #[arg(long)]
  no_cache: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Stdout belongs to the TUI, so logs go to a file
  let _guard = init_logging()?;

  // Load configuration
  let mut config = config::Config::load(args.config.as_deref())?;

  // Command line wins over file and environment
  if let Some(base_url) = args.base_url {
    config.api.base_url = base_url;
  }
  if args.no_cache {
    config.cache.persist = false;
  }

  let store: Arc<dyn CharacterStore> = if config.cache.persist {
    Arc::new(SqliteStorage::open(config.cache.path.as_deref())?)
  } else {
    Arc::new(MemoryStorage::new())
  };

  let inner = CharacterClient::new(&config.api)
    .map_err(|e| eyre!("Failed to create API client: {}", e))?;
  let client = CachedCharacterClient::new(inner, store);

  // Initialize and run the app
  let mut app = app::App::new(client);
  app.run().await?;

  Ok(())
}

fn init_logging() -> Result<WorkerGuard> {
  let dir = dirs::state_dir()
    .or_else(dirs::data_dir)
    .ok_or_else(|| eyre!("Could not determine data directory"))?
    .join("springfield");
  std::fs::create_dir_all(&dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", dir.display(), e))?;

  let appender = tracing_appender::rolling::never(&dir, "springfield.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);

  let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(writer)
    .with_ansi(false)
    .try_init()
    .map_err(|e| eyre!("Failed to initialize logging: {}", e))?;

  Ok(guard)
}
