//! Non-interactive subcommands: deck and location management.

use anyhow::{Context, Result};
use uuid::Uuid;

use cram_core::{
  deck::NewDeck,
  location::NewLocation,
  store::{DeckBackend, LocationStore},
  timestamp,
};

use crate::App;

pub async fn list_decks(app: &App) -> Result<()> {
  let decks = app.client.list().await.context("listing decks")?;
  if decks.is_empty() {
    println!("No decks yet.");
    return Ok(());
  }
  for deck in decks {
    println!("{}  {} ({} cards)", deck.id, deck.title, deck.cards.len());
  }
  Ok(())
}

pub async fn show_deck(app: &App, deck_id: &str) -> Result<()> {
  let deck = app.client.get(deck_id).await.context("fetching deck")?;
  println!("{} — {} cards", deck.title, deck.cards.len());
  for card in &deck.cards {
    let tag = card
      .location_tag
      .as_deref()
      .map(|t| format!("  @{t}"))
      .unwrap_or_default();
    println!(
      "  [{}] {}  (due {}){tag}",
      card.topic,
      card.prompt,
      timestamp::format_wire(card.next_review),
    );
  }
  Ok(())
}

pub async fn create_deck(app: &App, title: String) -> Result<()> {
  let deck = app
    .client
    .create(NewDeck {
      title,
      owner_id: app.owner_id.clone(),
      cards: Vec::new(),
    })
    .await
    .context("creating deck")?;
  println!("Created deck {}", deck.id);
  Ok(())
}

pub async fn delete_deck(app: &App, deck_id: &str) -> Result<()> {
  if app.client.delete(deck_id).await.context("deleting deck")? {
    println!("Deleted {deck_id}");
  } else {
    println!("Backend did not acknowledge deletion of {deck_id}");
  }
  Ok(())
}

pub async fn list_locations(app: &App) -> Result<()> {
  let locations = app.store.recent().await.context("reading locations")?;
  if locations.is_empty() {
    println!("No saved locations.");
    return Ok(());
  }
  for loc in locations {
    println!(
      "{}  {}  ({:.5}, {:.5})  saved {}",
      loc.id,
      loc.name,
      loc.latitude,
      loc.longitude,
      timestamp::format_wire(loc.timestamp),
    );
  }
  Ok(())
}

pub async fn add_location(
  app: &App,
  name: String,
  latitude: f64,
  longitude: f64,
) -> Result<()> {
  let saved = app
    .store
    .insert(NewLocation {
      name,
      latitude,
      longitude,
    })
    .await
    .context("saving location")?;
  println!("Saved {} ({})", saved.name, saved.id);
  Ok(())
}

pub async fn remove_location(app: &App, id: Uuid) -> Result<()> {
  app.store.delete(id).await.context("removing location")?;
  println!("Removed {id}");
  Ok(())
}
