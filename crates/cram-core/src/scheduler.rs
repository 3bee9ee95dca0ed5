//! The review scheduler: interval computation and canonical deck ordering.
//!
//! This is a fixed-table scheme, not a general spaced-repetition algorithm:
//! each difficulty self-rating maps to a base interval in hours, and a wrong
//! answer halves it. The new due time is computed from the wall clock at the
//! moment of grading, not from the card's previous due time, so a late
//! review shortens the effective gap. Preserved deliberately.

use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};

use crate::card::Card;

/// The self-rating given after a card is revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
  Impossible,
  Hard,
  Medium,
  Easy,
}

impl Difficulty {
  /// Base review interval in hours.
  pub fn base_hours(self) -> i64 {
    match self {
      Difficulty::Easy => 96,
      Difficulty::Medium => 72,
      Difficulty::Hard => 48,
      Difficulty::Impossible => 24,
    }
  }

  pub const ALL: [Difficulty; 4] = [
    Difficulty::Impossible,
    Difficulty::Hard,
    Difficulty::Medium,
    Difficulty::Easy,
  ];
}

impl std::fmt::Display for Difficulty {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let label = match self {
      Difficulty::Impossible => "impossible",
      Difficulty::Hard => "hard",
      Difficulty::Medium => "medium",
      Difficulty::Easy => "easy",
    };
    f.write_str(label)
  }
}

impl FromStr for Difficulty {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "impossible" => Ok(Difficulty::Impossible),
      "hard" => Ok(Difficulty::Hard),
      "medium" => Ok(Difficulty::Medium),
      "easy" => Ok(Difficulty::Easy),
      other => Err(format!("unknown difficulty: {other:?}")),
    }
  }
}

/// The due time for a card graded at `now` with the given self-rating.
///
/// A wrong answer halves the interval regardless of the rating chosen
/// afterwards. All base intervals are even, so the halved interval is still
/// a whole number of hours.
pub fn compute_next_review(
  now: DateTime<Utc>,
  difficulty: Difficulty,
  was_incorrect: bool,
) -> DateTime<Utc> {
  let mut hours = difficulty.base_hours();
  if was_incorrect {
    hours /= 2;
  }
  now + Duration::hours(hours)
}

/// Sort `cards` ascending by due time.
///
/// The sort is stable: cards sharing a due time keep the relative order they
/// held before this call, so repeated reschedules of other cards never
/// shuffle ties. Idempotent by the same property.
pub fn reorder(cards: &mut [Card]) {
  cards.sort_by_key(|card| card.next_review);
}
