//! [`DeckClient`] — reqwest wrapper around the deck backend's JSON API.

use std::time::Duration;

use reqwest::Client;

use cram_core::{
  deck::{Deck, NewDeck},
  store::DeckBackend,
  wire::{DeckWire, NewDeckWire},
};

use crate::{Error, Result};

/// Connection settings for the deck backend.
#[derive(Debug, Clone)]
pub struct DeckClientConfig {
  /// e.g. `http://localhost:8080`; decks live under `/decks`.
  pub base_url: String,
}

/// Async HTTP client for the deck backend.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct DeckClient {
  client: Client,
  config: DeckClientConfig,
}

impl DeckClient {
  pub fn new(config: DeckClientConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/decks{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn check(
    method: &'static str,
    path: String,
    resp: reqwest::Response,
  ) -> Result<reqwest::Response> {
    if resp.status().is_success() {
      Ok(resp)
    } else {
      Err(Error::Status {
        method,
        path,
        status: resp.status(),
      })
    }
  }
}

impl DeckBackend for DeckClient {
  type Error = Error;

  /// `GET /decks`
  async fn list(&self) -> Result<Vec<Deck>> {
    let resp = self.client.get(self.url("")).send().await?;
    let wires: Vec<DeckWire> =
      Self::check("GET", "/decks".into(), resp)?.json().await?;
    wires
      .into_iter()
      .map(|w| w.into_deck().map_err(Error::Decode))
      .collect()
  }

  /// `GET /decks/{id}`
  async fn get(&self, id: &str) -> Result<Deck> {
    let path = format!("/{id}");
    let resp = self.client.get(self.url(&path)).send().await?;
    let wire: DeckWire = Self::check("GET", path, resp)?.json().await?;
    Ok(wire.into_deck()?)
  }

  /// `POST /decks`
  async fn create(&self, deck: NewDeck) -> Result<Deck> {
    let body = NewDeckWire::from_new_deck(&deck);
    let resp = self
      .client
      .post(self.url(""))
      .json(&body)
      .send()
      .await?;
    let wire: DeckWire =
      Self::check("POST", "/decks".into(), resp)?.json().await?;
    Ok(wire.into_deck()?)
  }

  /// `PUT /decks/{id}` — whole-deck write, last-write-wins.
  async fn update(&self, deck: &Deck) -> Result<Deck> {
    let path = format!("/{}", deck.id);
    let body = DeckWire::from_deck(deck);
    let resp = self
      .client
      .put(self.url(&path))
      .json(&body)
      .send()
      .await?;
    let wire: DeckWire = Self::check("PUT", path, resp)?.json().await?;
    Ok(wire.into_deck()?)
  }

  /// `DELETE /decks/{id}` — 200 or 204 count as removed.
  async fn delete(&self, id: &str) -> Result<bool> {
    let resp = self
      .client
      .delete(self.url(&format!("/{id}")))
      .send()
      .await?;
    Ok(resp.status().is_success())
  }
}
