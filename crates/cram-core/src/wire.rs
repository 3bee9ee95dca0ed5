//! Wire DTOs for the deck backend.
//!
//! The backend speaks camelCase JSON and knows nothing about synthetic card
//! ids — those are assigned here, at decode time. Two decode policies apply:
//! a malformed `nextReview` degrades to "now" (the card becomes due rather
//! than the deck failing to load), while an unknown `kind` or an
//! out-of-range `correctIndex` is a hard decode error. A blank `locationTag`
//! means "no tag".

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  card::{Card, CardKind},
  deck::{Deck, NewDeck},
  timestamp,
};

/// A deck as it travels over the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckWire {
  pub id:       String,
  pub title:    String,
  pub owner_id: String,
  pub cards:    Vec<CardWire>,
}

/// A deck creation body — the backend assigns the id.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDeckWire {
  pub title:    String,
  pub owner_id: String,
  pub cards:    Vec<CardWire>,
}

/// A card as it travels over the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardWire {
  pub topic:         String,
  /// Raw kind string; validated on decode.
  pub kind:          String,
  pub prompt:        String,
  pub correct_index: usize,
  pub options:       Vec<String>,
  /// Blank means untagged.
  #[serde(default)]
  pub location_tag:  String,
  pub next_review:   String,
}

impl CardWire {
  /// Decode into a domain card, assigning a fresh synthetic id.
  pub fn into_card(self) -> Result<Card> {
    if self.correct_index >= self.options.len() {
      return Err(Error::CorrectIndexOutOfRange {
        index:   self.correct_index,
        options: self.options.len(),
      });
    }
    Ok(Card {
      id:            Uuid::new_v4(),
      kind:          CardKind::from_backend(&self.kind)?,
      topic:         self.topic,
      prompt:        self.prompt,
      correct_index: self.correct_index,
      options:       self.options,
      location_tag:  (!self.location_tag.trim().is_empty())
        .then_some(self.location_tag),
      next_review:   timestamp::parse_wire(&self.next_review),
    })
  }

  pub fn from_card(card: &Card) -> Self {
    CardWire {
      topic:         card.topic.clone(),
      kind:          card.kind.backend_value().to_owned(),
      prompt:        card.prompt.clone(),
      correct_index: card.correct_index,
      options:       card.options.clone(),
      location_tag:  card.location_tag.clone().unwrap_or_default(),
      next_review:   timestamp::format_wire(card.next_review),
    }
  }
}

impl DeckWire {
  pub fn into_deck(self) -> Result<Deck> {
    Ok(Deck {
      id:       self.id,
      title:    self.title,
      owner_id: self.owner_id,
      cards:    self
        .cards
        .into_iter()
        .map(CardWire::into_card)
        .collect::<Result<_>>()?,
    })
  }

  pub fn from_deck(deck: &Deck) -> Self {
    DeckWire {
      id:       deck.id.clone(),
      title:    deck.title.clone(),
      owner_id: deck.owner_id.clone(),
      cards:    deck.cards.iter().map(CardWire::from_card).collect(),
    }
  }
}

impl NewDeckWire {
  pub fn from_new_deck(deck: &NewDeck) -> Self {
    NewDeckWire {
      title:    deck.title.clone(),
      owner_id: deck.owner_id.clone(),
      cards:    deck.cards.iter().map(CardWire::from_card).collect(),
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};

  use super::*;
  use crate::Error;

  fn wire_card() -> CardWire {
    CardWire {
      topic:         "capitals".into(),
      kind:          "multipleChoice".into(),
      prompt:        "Capital of Brazil?".into(),
      correct_index: 2,
      options:       vec!["Rio".into(), "São Paulo".into(), "Brasília".into()],
      location_tag:  "Library".into(),
      next_review:   "2024-06-01T09:30:00.250Z".into(),
    }
  }

  #[test]
  fn decodes_a_full_card() {
    let card = wire_card().into_card().unwrap();
    assert_eq!(card.kind, CardKind::MultipleChoice);
    assert_eq!(card.correct_index, 2);
    assert_eq!(card.location_tag.as_deref(), Some("Library"));
    assert_eq!(
      card.next_review,
      Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap()
        + chrono::Duration::milliseconds(250),
    );
  }

  #[test]
  fn each_decode_assigns_a_distinct_id() {
    let a = wire_card().into_card().unwrap();
    let b = wire_card().into_card().unwrap();
    assert_ne!(a.id, b.id);
  }

  #[test]
  fn blank_location_tag_decodes_to_none_and_encodes_back_blank() {
    let mut wire = wire_card();
    wire.location_tag = "".into();
    let card = wire.into_card().unwrap();
    assert_eq!(card.location_tag, None);
    assert_eq!(CardWire::from_card(&card).location_tag, "");
  }

  #[test]
  fn malformed_due_date_falls_back_to_now() {
    let mut wire = wire_card();
    wire.next_review = "not a timestamp".into();
    let before = Utc::now();
    let card = wire.into_card().unwrap();
    assert!(card.next_review >= before && card.next_review <= Utc::now());
  }

  #[test]
  fn unknown_kind_fails_the_decode() {
    let mut wire = wire_card();
    wire.kind = "essay".into();
    assert!(matches!(
      wire.into_card(),
      Err(Error::UnknownCardKind(_))
    ));
  }

  #[test]
  fn out_of_range_correct_index_fails_the_decode() {
    let mut wire = wire_card();
    wire.correct_index = wire.options.len();
    assert!(matches!(
      wire.into_card(),
      Err(Error::CorrectIndexOutOfRange { index: 3, options: 3 })
    ));
  }

  #[test]
  fn json_field_names_are_camel_case() {
    let json = serde_json::to_value(wire_card()).unwrap();
    assert!(json.get("correctIndex").is_some());
    assert!(json.get("locationTag").is_some());
    assert!(json.get("nextReview").is_some());

    let deck = DeckWire {
      id:       "d1".into(),
      title:    "Geography".into(),
      owner_id: "u1".into(),
      cards:    vec![wire_card()],
    };
    let json = serde_json::to_value(&deck).unwrap();
    assert!(json.get("ownerId").is_some());
  }

  #[test]
  fn deck_round_trips_through_the_wire() {
    let deck = DeckWire {
      id:       "d1".into(),
      title:    "Geography".into(),
      owner_id: "u1".into(),
      cards:    vec![wire_card()],
    }
    .into_deck()
    .unwrap();

    let encoded = DeckWire::from_deck(&deck);
    assert_eq!(encoded.cards[0].next_review, "2024-06-01T09:30:00.250Z");
    assert_eq!(encoded.cards[0].kind, "multipleChoice");
    let again = encoded.into_deck().unwrap();
    assert_eq!(again.title, deck.title);
    assert_eq!(again.cards[0].prompt, deck.cards[0].prompt);
  }
}
