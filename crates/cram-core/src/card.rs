//! Card — the unit of study.
//!
//! A card's identity (`id`) is synthetic: it is assigned when the card is
//! decoded off the wire and never serialized. Re-sorting the working set and
//! substituting an updated card back into its parent deck both match on this
//! id, so two cards with identical prompt text stay distinct.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{Error, Result};

/// The presentation style of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
  MultipleChoice,
  TrueFalse,
  ShortAnswer,
}

impl CardKind {
  /// The string the deck backend stores for this kind.
  pub fn backend_value(self) -> &'static str {
    match self {
      CardKind::MultipleChoice => "multipleChoice",
      CardKind::TrueFalse => "trueFalse",
      CardKind::ShortAnswer => "shortAnswer",
    }
  }

  /// Decode a backend kind string. Unknown kinds are an error — unlike a
  /// malformed due date there is no safe default to present a card as.
  pub fn from_backend(value: &str) -> Result<Self> {
    match value {
      "multipleChoice" => Ok(CardKind::MultipleChoice),
      "trueFalse" => Ok(CardKind::TrueFalse),
      "shortAnswer" => Ok(CardKind::ShortAnswer),
      other => Err(Error::UnknownCardKind(other.to_owned())),
    }
  }
}

/// A single flashcard.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
  /// Synthetic identity, assigned at decode time. Not persisted.
  pub id:            Uuid,
  pub topic:         String,
  pub kind:          CardKind,
  pub prompt:        String,
  /// Index into `options` of the correct answer.
  pub correct_index: usize,
  pub options:       Vec<String>,
  /// Name of the saved location this card was created near, if any.
  pub location_tag:  Option<String>,
  /// Due time: the card is eligible for review again after this instant.
  pub next_review:   DateTime<Utc>,
}

impl Card {
  /// Whether `answer` picks the correct option.
  pub fn is_correct(&self, answer: usize) -> bool {
    answer == self.correct_index
  }
}
