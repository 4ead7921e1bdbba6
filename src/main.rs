mod app;
mod cache;
mod commands;
mod config;
mod event;
mod listing;
mod ui;
mod vault;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "f9s")]
#[command(about = "A terminal UI for remote file vaults, inspired by k9s")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/f9s/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Vault base URL, overriding the config file
  #[arg(short, long)]
  url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let config = config::Config::load(args.config.as_deref())?;

  // Override the vault URL if specified on the command line
  let config = if let Some(url) = args.url {
    config::Config {
      vault: config::VaultConfig { url },
      ..config
    }
  } else {
    config
  };

  let _log_guard = init_tracing()?;

  // Initialize and run the app
  let mut app = app::App::new(config)?;
  app.run().await?;

  Ok(())
}

/// Log to a rolling file under the data dir; stdout belongs to the TUI.
fn init_tracing() -> Result<tracing_appender::non_blocking::WorkerGuard> {
  let dir = dirs::data_dir()
    .map(|d| d.join("f9s"))
    .unwrap_or_else(|| PathBuf::from("."));
  std::fs::create_dir_all(&dir)?;

  let appender = tracing_appender::rolling::daily(dir, "f9s.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);

  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    )
    .with_writer(writer)
    .with_ansi(false)
    .init();

  Ok(guard)
}
