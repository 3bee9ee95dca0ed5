//! [`StudyRunner`] — drives one study session against a deck backend.
//!
//! All transitions go through `&mut self`, so one grading operation
//! completes before the next begins; the runner is the single owner of its
//! session. Persistence is optimistic: the in-memory state updates first,
//! and the whole-deck write happens on a detached task afterwards. A failed
//! write is reported through [`take_persist_error`](StudyRunner::take_persist_error)
//! and never rolled back. Callers must
//! [`flush_writes`](StudyRunner::flush_writes) before tearing down the
//! runtime, or an in-flight write is cancelled with it.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use tokio::task::JoinHandle;

use cram_core::{
  card::Card,
  deck::Deck,
  scheduler::Difficulty,
  session::{Phase, Session, Summary},
  store::DeckBackend,
};

use crate::{Error, Result};

pub struct StudyRunner<D: DeckBackend> {
  backend:       Arc<D>,
  deck:          Deck,
  session:       Session,
  persist_error: Arc<Mutex<Option<String>>>,
  last_write:    Option<JoinHandle<()>>,
}

impl<D> StudyRunner<D>
where
  D: DeckBackend + 'static,
{
  /// Fetch `deck_id` and start a session over its cards in due order.
  pub async fn load(backend: Arc<D>, deck_id: &str) -> Result<Self> {
    let deck = backend
      .get(deck_id)
      .await
      .map_err(|e| Error::Backend(Box::new(e)))?;
    let session = Session::new(deck.cards.clone());
    Ok(StudyRunner {
      backend,
      deck,
      session,
      persist_error: Arc::new(Mutex::new(None)),
      last_write: None,
    })
  }

  /// Re-fetch the deck and restart the session. On failure the current
  /// session is left untouched, so the user can keep studying and retry.
  pub async fn reload(&mut self) -> Result<()> {
    let deck = self
      .backend
      .get(&self.deck.id)
      .await
      .map_err(|e| Error::Backend(Box::new(e)))?;
    self.session = Session::new(deck.cards.clone());
    self.deck = deck;
    Ok(())
  }

  /// Answer the current card. Returns whether it was correct.
  pub fn select_answer(&mut self, index: usize) -> Result<bool> {
    Ok(self.session.select_answer(index)?)
  }

  /// Grade the current card and kick off the backend write.
  ///
  /// The updated card is substituted into the retained parent deck by its
  /// id and the whole deck is PUT back on a detached task (last-write-wins).
  /// The runner retains the handle of the most recent write so
  /// [`flush_writes`](StudyRunner::flush_writes) can await it.
  pub fn select_difficulty(&mut self, difficulty: Difficulty) -> Result<()> {
    let updated = self.session.select_difficulty(difficulty, Utc::now())?;

    if !self.deck.replace_card(&updated) {
      // The session was built from this deck, so the id must be present.
      tracing::warn!(card = %updated.id, "graded card missing from parent deck");
    }

    let backend = Arc::clone(&self.backend);
    let deck = self.deck.clone();
    let slot = Arc::clone(&self.persist_error);
    self.last_write = Some(tokio::spawn(async move {
      if let Err(e) = backend.update(&deck).await {
        tracing::warn!(deck = %deck.id, error = %e, "deck write failed; keeping local state");
        *slot.lock().expect("persist error slot") = Some(e.to_string());
      }
    }));
    Ok(())
  }

  /// Wait for the most recent backend write to finish.
  ///
  /// Every write carries the full deck, so the latest one subsumes any
  /// earlier write still in flight. Call this before dropping the runtime;
  /// a failure that lands during the wait is readable from
  /// [`take_persist_error`](StudyRunner::take_persist_error) afterwards.
  pub async fn flush_writes(&mut self) {
    if let Some(handle) = self.last_write.take() {
      let _ = handle.await;
    }
  }

  /// Advance past the graded card.
  pub fn next_card(&mut self) -> Result<()> {
    Ok(self.session.next_card()?)
  }

  /// Start the deck over with counters zeroed and ordering preserved.
  pub fn reset(&mut self) {
    self.session.reset();
  }

  // ── Views ─────────────────────────────────────────────────────────────────

  pub fn phase(&self) -> Phase {
    self.session.phase()
  }

  pub fn current_card(&self) -> Option<&Card> {
    self.session.current_card()
  }

  pub fn session(&self) -> &Session {
    &self.session
  }

  pub fn deck(&self) -> &Deck {
    &self.deck
  }

  pub fn summary(&self) -> Summary {
    self.session.summary()
  }

  /// The message from the most recent failed backend write, if any.
  /// Clears on read.
  pub fn take_persist_error(&self) -> Option<String> {
    self.persist_error.lock().expect("persist error slot").take()
  }
}
