//! `cram` — command-line flashcard study tool.
//!
//! # Usage
//!
//! ```
//! cram decks
//! cram study <deck-id>
//! cram locations
//! cram --config ~/.config/cram/config.toml study <deck-id>
//! ```

mod commands;
mod sampler;
mod study;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use cram_client::{DeckClient, DeckClientConfig};
use cram_core::proximity::Coordinates;
use cram_store_sqlite::SqliteLocationStore;
use sampler::FixedSampler;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "cram", about = "Flashcard study tool with location tagging")]
struct Args {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the deck backend (default: http://localhost:8080).
  #[arg(long, env = "CRAM_URL")]
  url: Option<String>,

  /// Owner id recorded on decks created from this machine.
  #[arg(long, env = "CRAM_OWNER")]
  owner: Option<String>,

  /// Path to the saved-locations database.
  #[arg(long, env = "CRAM_DB", value_name = "FILE")]
  db: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List all decks.
  Decks,
  /// Show one deck's cards and due times.
  Show { deck_id: String },
  /// Create an empty deck.
  Create { title: String },
  /// Delete a deck.
  Delete { deck_id: String },
  /// Study a deck interactively.
  Study { deck_id: String },
  /// Add a card to a deck (interactive; pre-fills the location tag).
  CardAdd { deck_id: String },
  /// List saved locations, most recent first.
  Locations,
  /// Save a named location.
  LocationAdd {
    name:      String,
    latitude:  f64,
    longitude: f64,
  },
  /// Remove a saved location by id.
  LocationRm { id: uuid::Uuid },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  backend_url: String,
  #[serde(default)]
  owner_id:    String,
  db_path:     Option<PathBuf>,
  /// Fixed coordinate standing in for a GPS fix on desktop machines.
  latitude:    Option<f64>,
  longitude:   Option<f64>,
}

/// Everything the commands need, resolved from flags and the config file.
pub struct App {
  pub client:   DeckClient,
  pub store:    SqliteLocationStore,
  pub sampler:  FixedSampler,
  pub owner_id: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let base_url = args
    .url
    .or_else(|| (!file_cfg.backend_url.is_empty()).then(|| file_cfg.backend_url.clone()))
    .unwrap_or_else(|| "http://localhost:8080".to_string());
  let owner_id = args
    .owner
    .or_else(|| (!file_cfg.owner_id.is_empty()).then(|| file_cfg.owner_id.clone()))
    .unwrap_or_else(|| "local".to_string());
  let db_path = args
    .db
    .or(file_cfg.db_path)
    .unwrap_or_else(|| PathBuf::from("cram.db"));

  let fixed_coords = match (file_cfg.latitude, file_cfg.longitude) {
    (Some(latitude), Some(longitude)) => Some(Coordinates {
      latitude,
      longitude,
    }),
    _ => None,
  };

  let client = DeckClient::new(DeckClientConfig { base_url })
    .context("building deck backend client")?;
  let store = SqliteLocationStore::open(&db_path)
    .await
    .with_context(|| format!("opening location store {}", db_path.display()))?;

  let app = App {
    client,
    store,
    sampler: FixedSampler::new(fixed_coords),
    owner_id,
  };

  match args.command {
    Command::Decks => commands::list_decks(&app).await,
    Command::Show { deck_id } => commands::show_deck(&app, &deck_id).await,
    Command::Create { title } => commands::create_deck(&app, title).await,
    Command::Delete { deck_id } => commands::delete_deck(&app, &deck_id).await,
    Command::Study { deck_id } => study::run(&app, &deck_id).await,
    Command::CardAdd { deck_id } => study::add_card(&app, &deck_id).await,
    Command::Locations => commands::list_locations(&app).await,
    Command::LocationAdd {
      name,
      latitude,
      longitude,
    } => commands::add_location(&app, name, latitude, longitude).await,
    Command::LocationRm { id } => commands::remove_location(&app, id).await,
  }
}
