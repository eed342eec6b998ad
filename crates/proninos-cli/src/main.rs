//! `proninos`: command-line administration of the friend registry.
//!
//! Reads `proninos.toml` (or the path given with `--config`), layers
//! `PRONINOS_*` environment variables over it, opens the SQLite store and
//! runs one command. Results are printed to stdout as JSON.
//!
//! # Usage
//!
//! ```text
//! proninos degree add Ingeniero Ingeniera
//! proninos person add Juan Pérez --degree <uuid>
//! proninos friend add --person <uuid>
//! proninos friend search "perez" --active-only
//! ```

mod commands;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use proninos_store_sqlite::SqliteStore;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::commands::Command;

#[derive(Parser)]
#[command(name = "proninos", author, version, about = "Friend and donor registry")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "proninos.toml")]
  config: PathBuf,

  /// SQLite database file; overrides `store_path` from the configuration.
  #[arg(long, value_name = "FILE")]
  store: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

// ─── Settings ─────────────────────────────────────────────────────────────────

/// Shape of the configuration file and `PRONINOS_*` environment.
#[derive(Debug, Deserialize)]
struct Settings {
  #[serde(default = "default_store_path")]
  store_path: PathBuf,
}

fn default_store_path() -> PathBuf { PathBuf::from("proninos.db") }

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Logs go to stderr so stdout stays valid JSON.
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings: Settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("PRONINOS"))
    .build()
    .context("failed to read config file")?
    .try_deserialize()
    .context("failed to deserialise settings")?;

  let store_path = expand_tilde(cli.store.as_deref().unwrap_or(&settings.store_path));

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  commands::run(&store, cli.command).await
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory as _;

  use super::*;

  #[test]
  fn cli_definition_is_consistent() { Cli::command().debug_assert(); }

  #[test]
  fn store_flag_is_optional() {
    let cli = Cli::try_parse_from(["proninos", "degree", "list"]).unwrap();
    assert_eq!(cli.config, PathBuf::from("proninos.toml"));
    assert!(cli.store.is_none());
  }

  #[test]
  fn tilde_is_expanded_against_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(
      expand_tilde(Path::new("~/proninos.db")),
      PathBuf::from(home).join("proninos.db")
    );
    assert_eq!(expand_tilde(Path::new("/tmp/x.db")), PathBuf::from("/tmp/x.db"));
  }
}
