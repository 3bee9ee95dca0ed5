//! Deck — an ordered, exclusively-owned collection of cards.

use crate::card::Card;

/// A deck as held by the backend. Cards are owned exclusively by their deck;
/// no card is shared between decks.
#[derive(Debug, Clone, PartialEq)]
pub struct Deck {
  /// Backend-assigned identifier.
  pub id:       String,
  pub title:    String,
  pub owner_id: String,
  pub cards:    Vec<Card>,
}

impl Deck {
  /// Substitute `updated` for the card with the same id. Returns `false`
  /// (and leaves the deck untouched) when no card matches.
  pub fn replace_card(&mut self, updated: &Card) -> bool {
    match self.cards.iter_mut().find(|c| c.id == updated.id) {
      Some(slot) => {
        *slot = updated.clone();
        true
      }
      None => false,
    }
  }
}

/// The shape of a deck before the backend has assigned it an id.
#[derive(Debug, Clone)]
pub struct NewDeck {
  pub title:    String,
  pub owner_id: String,
  pub cards:    Vec<Card>,
}
