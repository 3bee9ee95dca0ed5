//! Engine tests against mock collaborators.

use std::{
  collections::HashMap,
  convert::Infallible,
  sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
  },
  time::Duration,
};

use chrono::{DateTime, TimeZone, Utc};
use thiserror::Error;
use uuid::Uuid;

use cram_core::{
  card::{Card, CardKind},
  deck::{Deck, NewDeck},
  location::{NewLocation, SavedLocation},
  proximity::Coordinates,
  scheduler::Difficulty,
  session::Phase,
  store::{DeckBackend, LocationSampler, LocationStore, SampleError},
};

use super::*;

// ─── Mock deck backend ───────────────────────────────────────────────────────

#[derive(Debug, Error)]
#[error("mock backend failure")]
struct MockError;

#[derive(Default)]
struct MockBackend {
  decks:         Mutex<HashMap<String, Deck>>,
  fail_updates:  AtomicBool,
  /// When set, each update stalls for a minute of (test) time first.
  delay_updates: AtomicBool,
  update_count:  AtomicUsize,
}

impl MockBackend {
  fn with_deck(deck: Deck) -> Self {
    let backend = Self::default();
    backend
      .decks
      .lock()
      .unwrap()
      .insert(deck.id.clone(), deck);
    backend
  }

  fn stored(&self, id: &str) -> Deck {
    self.decks.lock().unwrap().get(id).cloned().unwrap()
  }
}

impl DeckBackend for MockBackend {
  type Error = MockError;

  async fn list(&self) -> Result<Vec<Deck>, MockError> {
    Ok(self.decks.lock().unwrap().values().cloned().collect())
  }

  async fn get(&self, id: &str) -> Result<Deck, MockError> {
    self.decks.lock().unwrap().get(id).cloned().ok_or(MockError)
  }

  async fn create(&self, deck: NewDeck) -> Result<Deck, MockError> {
    let created = Deck {
      id:       Uuid::new_v4().to_string(),
      title:    deck.title,
      owner_id: deck.owner_id,
      cards:    deck.cards,
    };
    self
      .decks
      .lock()
      .unwrap()
      .insert(created.id.clone(), created.clone());
    Ok(created)
  }

  async fn update(&self, deck: &Deck) -> Result<Deck, MockError> {
    if self.delay_updates.load(Ordering::SeqCst) {
      tokio::time::sleep(Duration::from_secs(60)).await;
    }
    if self.fail_updates.load(Ordering::SeqCst) {
      return Err(MockError);
    }
    self.update_count.fetch_add(1, Ordering::SeqCst);
    self
      .decks
      .lock()
      .unwrap()
      .insert(deck.id.clone(), deck.clone());
    Ok(deck.clone())
  }

  async fn delete(&self, id: &str) -> Result<bool, MockError> {
    Ok(self.decks.lock().unwrap().remove(id).is_some())
  }
}

// ─── Mock location store and sampler ─────────────────────────────────────────

/// Returns its entries verbatim, so tests control the recency order.
struct MemoryLocationStore {
  entries: Mutex<Vec<SavedLocation>>,
}

impl MemoryLocationStore {
  fn with(entries: Vec<SavedLocation>) -> Self {
    MemoryLocationStore {
      entries: Mutex::new(entries),
    }
  }
}

impl LocationStore for MemoryLocationStore {
  type Error = Infallible;

  async fn insert(
    &self,
    location: NewLocation,
  ) -> Result<SavedLocation, Infallible> {
    let saved = SavedLocation {
      id:        Uuid::new_v4(),
      name:      location.name,
      latitude:  location.latitude,
      longitude: location.longitude,
      timestamp: Utc::now(),
    };
    self.entries.lock().unwrap().insert(0, saved.clone());
    Ok(saved)
  }

  async fn recent(&self) -> Result<Vec<SavedLocation>, Infallible> {
    Ok(self.entries.lock().unwrap().clone())
  }

  async fn delete(&self, id: Uuid) -> Result<(), Infallible> {
    self.entries.lock().unwrap().retain(|l| l.id != id);
    Ok(())
  }
}

struct StaticSampler {
  permission: bool,
  coords:     Option<Coordinates>,
}

impl LocationSampler for StaticSampler {
  fn has_permission(&self) -> bool {
    self.permission
  }

  fn request_permission(&self) {}

  async fn sample(&self) -> Result<Coordinates, SampleError> {
    if !self.permission {
      return Err(SampleError::PermissionDenied);
    }
    self.coords.ok_or(SampleError::NoFix)
  }
}

// ─── Fixtures ────────────────────────────────────────────────────────────────

fn t0() -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
}

fn card(prompt: &str, due: DateTime<Utc>) -> Card {
  Card {
    id:            Uuid::new_v4(),
    topic:         "geo".into(),
    kind:          CardKind::MultipleChoice,
    prompt:        prompt.into(),
    correct_index: 0,
    options:       vec!["right".into(), "wrong".into()],
    location_tag:  None,
    next_review:   due,
  }
}

fn deck(cards: Vec<Card>) -> Deck {
  Deck {
    id: "deck-1".into(),
    title: "Geography".into(),
    owner_id: "user-1".into(),
    cards,
  }
}

const HOME: Coordinates = Coordinates {
  latitude:  -23.5505,
  longitude: -46.6333,
};

fn saved(name: &str, latitude: f64, longitude: f64) -> SavedLocation {
  SavedLocation {
    id: Uuid::new_v4(),
    name: name.into(),
    latitude,
    longitude,
    timestamp: Utc::now(),
  }
}

// ─── StudyRunner ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn runner_loads_the_deck_in_due_order() {
  use chrono::Duration as D;
  let backend = Arc::new(MockBackend::with_deck(deck(vec![
    card("first", t0()),
    card("third", t0() + D::hours(5)),
    card("second", t0() + D::hours(1)),
  ])));

  let runner = StudyRunner::load(backend, "deck-1").await.unwrap();
  let prompts: Vec<_> = runner
    .session()
    .cards()
    .iter()
    .map(|c| c.prompt.as_str())
    .collect();
  assert_eq!(prompts, ["first", "second", "third"]);
  assert_eq!(runner.phase(), Phase::Presenting);
}

#[tokio::test]
async fn loading_a_missing_deck_is_a_backend_error() {
  let backend = Arc::new(MockBackend::default());
  let result = StudyRunner::load(backend, "nope").await;
  assert!(matches!(result, Err(Error::Backend(_))));
}

#[tokio::test]
async fn grading_writes_the_whole_deck_back() {
  let backend = Arc::new(MockBackend::with_deck(deck(vec![card("q", t0())])));
  let mut runner =
    StudyRunner::load(Arc::clone(&backend), "deck-1").await.unwrap();
  let card_id = runner.current_card().unwrap().id;

  runner.select_answer(0).unwrap();
  runner.select_difficulty(Difficulty::Easy).unwrap();
  runner.flush_writes().await;

  assert_eq!(backend.update_count.load(Ordering::SeqCst), 1);
  let stored = backend.stored("deck-1");
  let graded = stored.cards.iter().find(|c| c.id == card_id).unwrap();
  assert_eq!(
    graded.next_review,
    runner.current_card().unwrap().next_review,
  );
  assert!(runner.take_persist_error().is_none());
}

#[tokio::test]
async fn failed_write_reports_but_keeps_local_state() {
  let backend = Arc::new(MockBackend::with_deck(deck(vec![card("q", t0())])));
  backend.fail_updates.store(true, Ordering::SeqCst);
  let mut runner =
    StudyRunner::load(Arc::clone(&backend), "deck-1").await.unwrap();

  runner.select_answer(0).unwrap();
  let before = Utc::now();
  runner.select_difficulty(Difficulty::Easy).unwrap();
  runner.flush_writes().await;

  // Local state advanced optimistically and stays advanced.
  assert!(runner.current_card().unwrap().next_review > before);
  assert_eq!(runner.phase(), Phase::Revealed);

  // The failure is surfaced once, then cleared.
  assert!(runner.take_persist_error().is_some());
  assert!(runner.take_persist_error().is_none());

  // The backend copy never changed.
  let stored = backend.stored("deck-1");
  assert_eq!(stored.cards[0].next_review, t0());
}

#[tokio::test]
async fn duplicate_prompts_update_the_right_card() {
  use chrono::Duration as D;
  let a = card("same prompt", t0());
  let b = card("same prompt", t0() + D::hours(1));
  let (a_id, b_id) = (a.id, b.id);
  let backend = Arc::new(MockBackend::with_deck(deck(vec![a, b])));
  let mut runner =
    StudyRunner::load(Arc::clone(&backend), "deck-1").await.unwrap();

  // The card due first is `a`; grade it.
  assert_eq!(runner.current_card().unwrap().id, a_id);
  runner.select_answer(0).unwrap();
  runner.select_difficulty(Difficulty::Easy).unwrap();
  runner.flush_writes().await;

  let stored = backend.stored("deck-1");
  let stored_a = stored.cards.iter().find(|c| c.id == a_id).unwrap();
  let stored_b = stored.cards.iter().find(|c| c.id == b_id).unwrap();
  assert!(stored_a.next_review > t0() + D::hours(90));
  assert_eq!(stored_b.next_review, t0() + D::hours(1));
}

#[tokio::test(start_paused = true)]
async fn flush_waits_out_a_slow_final_write() {
  let backend = Arc::new(MockBackend::with_deck(deck(vec![card("q", t0())])));
  backend.delay_updates.store(true, Ordering::SeqCst);
  let mut runner =
    StudyRunner::load(Arc::clone(&backend), "deck-1").await.unwrap();

  runner.select_answer(0).unwrap();
  runner.select_difficulty(Difficulty::Easy).unwrap();
  runner.next_card().unwrap();
  assert_eq!(runner.phase(), Phase::Completed);

  // The write is still in flight here; returning now would lose it.
  assert_eq!(backend.update_count.load(Ordering::SeqCst), 0);
  runner.flush_writes().await;
  assert_eq!(backend.update_count.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn flush_surfaces_a_failed_final_write() {
  let backend = Arc::new(MockBackend::with_deck(deck(vec![card("q", t0())])));
  backend.delay_updates.store(true, Ordering::SeqCst);
  backend.fail_updates.store(true, Ordering::SeqCst);
  let mut runner =
    StudyRunner::load(Arc::clone(&backend), "deck-1").await.unwrap();

  runner.select_answer(0).unwrap();
  runner.select_difficulty(Difficulty::Easy).unwrap();
  runner.next_card().unwrap();

  runner.flush_writes().await;
  assert!(runner.take_persist_error().is_some());
}

#[tokio::test]
async fn reload_failure_keeps_the_session() {
  let backend = Arc::new(MockBackend::with_deck(deck(vec![card("q", t0())])));
  let mut runner =
    StudyRunner::load(Arc::clone(&backend), "deck-1").await.unwrap();

  backend.decks.lock().unwrap().clear();
  assert!(runner.reload().await.is_err());

  // Still presenting the previously loaded card.
  assert_eq!(runner.phase(), Phase::Presenting);
  assert_eq!(runner.current_card().unwrap().prompt, "q");
}

// ─── NearbyWatcher ───────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn watcher_publishes_the_first_match_in_recency_order() {
  // Both candidates are within 10 m; the first by recency order wins even
  // though the second is closer.
  let store = Arc::new(MemoryLocationStore::with(vec![
    saved("far-ish", HOME.latitude + 8e-5, HOME.longitude),
    saved("close", HOME.latitude + 4e-5, HOME.longitude),
  ]));
  let sampler = Arc::new(StaticSampler {
    permission: true,
    coords:     Some(HOME),
  });

  let watcher =
    NearbyWatcher::start(sampler, store, Duration::from_secs(600));
  let mut rx = watcher.subscribe();
  rx.changed().await.unwrap();
  assert_eq!(rx.borrow().as_deref(), Some("far-ish"));
  assert_eq!(watcher.current().as_deref(), Some("far-ish"));

  watcher.stop().await;
}

#[tokio::test(start_paused = true)]
async fn watcher_publishes_none_without_permission() {
  let store = Arc::new(MemoryLocationStore::with(vec![saved(
    "here",
    HOME.latitude,
    HOME.longitude,
  )]));
  let sampler = Arc::new(StaticSampler {
    permission: false,
    coords:     Some(HOME),
  });

  let watcher =
    NearbyWatcher::start(sampler, store, Duration::from_secs(600));
  let mut rx = watcher.subscribe();
  rx.changed().await.unwrap();
  assert_eq!(*rx.borrow(), None);

  watcher.stop().await;
}

#[tokio::test(start_paused = true)]
async fn watcher_publishes_none_when_no_fix_is_available() {
  let store = Arc::new(MemoryLocationStore::with(vec![saved(
    "here",
    HOME.latitude,
    HOME.longitude,
  )]));
  let sampler = Arc::new(StaticSampler {
    permission: true,
    coords:     None,
  });

  let watcher =
    NearbyWatcher::start(sampler, store, Duration::from_secs(600));
  let mut rx = watcher.subscribe();
  rx.changed().await.unwrap();
  assert_eq!(*rx.borrow(), None);

  watcher.stop().await;
}

#[tokio::test(start_paused = true)]
async fn stop_cancels_the_watcher_promptly() {
  let store = Arc::new(MemoryLocationStore::with(vec![]));
  let sampler = Arc::new(StaticSampler {
    permission: true,
    coords:     Some(HOME),
  });

  let watcher =
    NearbyWatcher::start(sampler, store, Duration::from_secs(600));
  // No waiting for a tick: cancellation wins the select immediately.
  watcher.stop().await;
}

// ─── suggest_location_tag ────────────────────────────────────────────────────

#[tokio::test]
async fn suggests_a_tag_when_near_a_saved_location() {
  let store = MemoryLocationStore::with(vec![saved(
    "Library",
    HOME.latitude + 4e-5,
    HOME.longitude,
  )]);
  let sampler = StaticSampler {
    permission: true,
    coords:     Some(HOME),
  };
  assert_eq!(
    suggest_location_tag(&sampler, &store).await.as_deref(),
    Some("Library"),
  );
}

#[tokio::test]
async fn suggests_nothing_when_everything_is_far() {
  let store = MemoryLocationStore::with(vec![saved(
    "Library",
    HOME.latitude + 2e-3,
    HOME.longitude,
  )]);
  let sampler = StaticSampler {
    permission: true,
    coords:     Some(HOME),
  };
  assert_eq!(suggest_location_tag(&sampler, &store).await, None);
}

#[tokio::test]
async fn suggests_nothing_without_permission() {
  let store = MemoryLocationStore::with(vec![saved(
    "Library",
    HOME.latitude,
    HOME.longitude,
  )]);
  let sampler = StaticSampler {
    permission: false,
    coords:     Some(HOME),
  };
  assert_eq!(suggest_location_tag(&sampler, &store).await, None);
}
