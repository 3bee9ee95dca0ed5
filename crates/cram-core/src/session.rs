//! The study-session state machine.
//!
//! A [`Session`] is a tagged-phase value mutated only through the transition
//! methods below; an invalid-phase call is an `Err`, never a panic and never
//! a partially-applied mutation. Sessions are transient — they are rebuilt
//! from the parent deck for every run-through and never persisted.
//!
//! Phases: `Presenting → Revealed → {Presenting | Completed}`, with an empty
//! deck pinned in `NoCards` and `reset` returning any phase to the front.

use chrono::{DateTime, Utc};

use crate::{
  Error, Result,
  card::Card,
  scheduler::{self, Difficulty},
};

/// Where a session currently is in its run-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  /// The deck was empty on load. Terminal.
  NoCards,
  /// A card is shown, awaiting an answer.
  Presenting,
  /// The answer is revealed, awaiting a difficulty rating and `next_card`.
  Revealed,
  /// Every card has been graded; the summary is available.
  Completed,
}

/// One run-through of a deck, from load to summary.
#[derive(Debug, Clone)]
pub struct Session {
  cards:           Vec<Card>,
  current_index:   usize,
  selected_answer: Option<usize>,
  correct_count:   usize,
  wrong_answer:    bool,
  phase:           Phase,
}

/// The figures shown when a session completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
  pub correct: usize,
  pub total:   usize,
  /// `round(correct * 100 / total)`; 0 for an empty session.
  pub percent: u32,
}

impl Session {
  /// Start a session over `cards`, sorted into canonical due order.
  pub fn new(mut cards: Vec<Card>) -> Self {
    scheduler::reorder(&mut cards);
    let phase = if cards.is_empty() {
      Phase::NoCards
    } else {
      Phase::Presenting
    };
    Session {
      cards,
      current_index: 0,
      selected_answer: None,
      correct_count: 0,
      wrong_answer: false,
      phase,
    }
  }

  // ── Transitions ───────────────────────────────────────────────────────────

  /// Answer the current card. Valid only while `Presenting`.
  ///
  /// Returns whether the answer was correct. Moves to `Revealed`; the caller
  /// is expected to prompt for a difficulty rating next.
  pub fn select_answer(&mut self, index: usize) -> Result<bool> {
    if self.phase != Phase::Presenting {
      return Err(Error::NotPresenting);
    }
    let card = &self.cards[self.current_index];
    if index >= card.options.len() {
      return Err(Error::AnswerOutOfRange {
        index,
        options: card.options.len(),
      });
    }

    let correct = card.is_correct(index);
    self.selected_answer = Some(index);
    if correct {
      self.correct_count += 1;
    } else {
      self.wrong_answer = true;
    }
    self.phase = Phase::Revealed;
    Ok(correct)
  }

  /// Grade the current card. Valid only while `Revealed`.
  ///
  /// Computes the new due time from `now` (halved if the answer was wrong),
  /// re-sorts the working set, and follows the graded card to its new
  /// position so it stays "current" until [`next_card`](Self::next_card).
  /// Returns a clone of the updated card for the caller to persist.
  pub fn select_difficulty(
    &mut self,
    difficulty: Difficulty,
    now: DateTime<Utc>,
  ) -> Result<Card> {
    if self.phase != Phase::Revealed {
      return Err(Error::NotRevealed);
    }

    let was_incorrect = std::mem::take(&mut self.wrong_answer);
    let next_review =
      scheduler::compute_next_review(now, difficulty, was_incorrect);

    let card_id = self.cards[self.current_index].id;
    self.cards[self.current_index].next_review = next_review;
    scheduler::reorder(&mut self.cards);

    // Re-locate the graded card by identity; the id was assigned at decode
    // time so this cannot fail, but stay defensive about the index.
    self.current_index = self
      .cards
      .iter()
      .position(|c| c.id == card_id)
      .unwrap_or(self.current_index.min(self.cards.len() - 1));

    Ok(self.cards[self.current_index].clone())
  }

  /// Advance past the graded card. Valid only while `Revealed`.
  ///
  /// Moves to `Presenting` on the next card, or to `Completed` when the
  /// graded card was the last one.
  pub fn next_card(&mut self) -> Result<()> {
    if self.phase != Phase::Revealed {
      return Err(Error::NotRevealed);
    }
    let next = self.current_index + 1;
    if next < self.cards.len() {
      self.current_index = next;
      self.selected_answer = None;
      self.phase = Phase::Presenting;
    } else {
      self.phase = Phase::Completed;
    }
    Ok(())
  }

  /// Return to the front of the deck with counters zeroed. The current
  /// ordering is preserved — no re-sort happens here.
  pub fn reset(&mut self) {
    self.current_index = 0;
    self.selected_answer = None;
    self.correct_count = 0;
    self.wrong_answer = false;
    self.phase = if self.cards.is_empty() {
      Phase::NoCards
    } else {
      Phase::Presenting
    };
  }

  // ── Views ─────────────────────────────────────────────────────────────────

  pub fn phase(&self) -> Phase {
    self.phase
  }

  /// The card being presented or graded. `None` once completed or when the
  /// deck was empty.
  pub fn current_card(&self) -> Option<&Card> {
    match self.phase {
      Phase::Presenting | Phase::Revealed => {
        self.cards.get(self.current_index)
      }
      Phase::NoCards | Phase::Completed => None,
    }
  }

  pub fn current_index(&self) -> usize {
    self.current_index
  }

  pub fn selected_answer(&self) -> Option<usize> {
    self.selected_answer
  }

  pub fn correct_count(&self) -> usize {
    self.correct_count
  }

  pub fn total(&self) -> usize {
    self.cards.len()
  }

  /// The working set in its current canonical order.
  pub fn cards(&self) -> &[Card] {
    &self.cards
  }

  pub fn summary(&self) -> Summary {
    let total = self.cards.len();
    let percent = if total == 0 {
      0
    } else {
      ((self.correct_count as f64) * 100.0 / (total as f64)).round() as u32
    };
    Summary {
      correct: self.correct_count,
      total,
      percent,
    }
  }
}
