//! gig-server binary.
//!
//! Reads `gig.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the JSON API under `/api`.
//!
//! # Demo data
//!
//! To replace the store's contents with generated freelancers:
//!
//! ```text
//! cargo run -p gig-server -- seed --count 50
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use gig_server::{ServerConfig, seed};
use gig_store_sqlite::SqliteStore;
use rand::{SeedableRng, rngs::StdRng};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Freelancer roster API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "gig.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the API (the default).
  Serve,
  /// Clear the store and fill it with generated demo freelancers.
  Seed {
    /// Number of freelancers to generate.
    #[arg(long, default_value_t = seed::DEFAULT_COUNT)]
    count:    usize,
    /// Fixed RNG seed, for a reproducible roster.
    #[arg(long)]
    rng_seed: Option<u64>,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => serve(store, &server_cfg).await,
    Command::Seed { count, rng_seed } => run_seed(&store, count, rng_seed).await,
  }
}

async fn serve(store: SqliteStore, server_cfg: &ServerConfig) -> anyhow::Result<()> {
  let app = gig_server::app(Arc::new(store), server_cfg).context("invalid cors_origin")?;
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}/api");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

async fn run_seed(store: &SqliteStore, count: usize, rng_seed: Option<u64>) -> anyhow::Result<()> {
  let mut rng = match rng_seed {
    Some(n) => StdRng::seed_from_u64(n),
    None => StdRng::from_os_rng(),
  };
  let records = seed::generate(&mut rng, count, chrono::Utc::now());
  let summary = seed::reseed(store, records).await.context("seeding failed")?;

  let activity = &summary.activity;
  tracing::info!(
    inserted = summary.inserted,
    active = activity.active,
    active_percentage = activity.active_percentage,
    inactive = activity.inactive,
    inactive_percentage = activity.inactive_percentage,
    "seeded freelancers"
  );
  for (country, n) in &summary.top_countries {
    tracing::info!(%country, count = n, "top country");
  }
  for (skill, n) in &summary.top_skills {
    tracing::info!(%skill, count = n, "top skill");
  }

  Ok(())
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
