use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub vault: VaultConfig,
  #[serde(default)]
  pub cache: CacheConfig,
  /// Where downloads land (defaults to the platform download directory)
  pub downloads_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VaultConfig {
  pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
  /// How many query results to keep before FIFO eviction kicks in
  #[serde(default = "default_capacity")]
  pub capacity: usize,
  /// Whether the cache survives restarts
  #[serde(default = "default_persist")]
  pub persist: bool,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      capacity: default_capacity(),
      persist: default_persist(),
    }
  }
}

fn default_capacity() -> usize {
  10
}

fn default_persist() -> bool {
  true
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./f9s.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/f9s/config.yaml
  /// 4. ~/.config/f9s/config.yaml
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Err(eyre!(
        "No configuration file found. Create one at ~/.config/f9s/config.yaml\n\
                 with at least:\n  vault:\n    url: https://vault.example.com"
      )),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("f9s.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("f9s").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    let config: Config = serde_yaml::from_str(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))?;

    Ok(config)
  }

  /// Get the vault bearer token from environment variables.
  ///
  /// Checks F9S_VAULT_TOKEN first, then VAULT_API_TOKEN as fallback.
  pub fn get_api_token() -> Result<String> {
    std::env::var("F9S_VAULT_TOKEN")
      .or_else(|_| std::env::var("VAULT_API_TOKEN"))
      .map_err(|_| {
        eyre!("Vault token not found. Set F9S_VAULT_TOKEN or VAULT_API_TOKEN environment variable.")
      })
  }

  /// Directory downloads are written to.
  pub fn downloads_dir(&self) -> PathBuf {
    self
      .downloads_dir
      .clone()
      .or_else(dirs::download_dir)
      .unwrap_or_else(|| PathBuf::from("."))
  }
}
