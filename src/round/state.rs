//! Persisted round state.
//!
//! `RoundState` is what the round save holds: one [`CardState`] per card,
//! keyed by [`CardId`]. It is always captured from the live cards, never
//! edited in place, so the record cannot drift from the grid it describes.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::core::{CardId, GridPosition, ImageId};

/// Saved state of one card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardState {
    pub id: CardId,
    pub image: ImageId,
    pub position: GridPosition,
    pub is_matched: bool,
}

impl From<&Card> for CardState {
    fn from(card: &Card) -> Self {
        Self {
            id: card.id(),
            image: card.image(),
            position: card.position(),
            is_matched: card.is_matched(),
        }
    }
}

/// Saved state of a whole round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    pub rows: u8,
    pub cols: u8,
    pub cards: Vec<CardState>,
}

impl RoundState {
    /// Capture the live cards of a `rows` x `cols` round.
    #[must_use]
    pub fn capture(rows: u8, cols: u8, cards: &[Card]) -> Self {
        Self {
            rows,
            cols,
            cards: cards.iter().map(CardState::from).collect(),
        }
    }

    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardState> {
        self.cards.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn matched_count(&self) -> usize {
        self.cards.iter().filter(|c| c.is_matched).count()
    }

    /// Check that the record describes a round that can be resumed.
    ///
    /// Rejects records whose ids are not exactly `0..rows*cols`, whose
    /// positions repeat or fall outside the grid, whose images do not come
    /// in pairs, whose pairs are half-matched, or where every pair is
    /// already found.
    pub fn validate(&self) -> Result<(), String> {
        let expected = self.rows as usize * self.cols as usize;
        if expected == 0 {
            return Err(format!("empty {}x{} grid", self.rows, self.cols));
        }
        if self.cards.len() != expected {
            return Err(format!(
                "{} cards saved for a {}x{} grid",
                self.cards.len(),
                self.rows,
                self.cols
            ));
        }

        let mut ids = FxHashSet::default();
        let mut positions = FxHashSet::default();
        let mut pairs: FxHashMap<ImageId, (usize, usize)> = FxHashMap::default();

        for card in &self.cards {
            if card.id.index() >= expected || !ids.insert(card.id) {
                return Err(format!("unexpected or duplicate id {}", card.id));
            }
            if !card.position.within(self.rows, self.cols) || !positions.insert(card.position) {
                return Err(format!("{} has invalid position {}", card.id, card.position));
            }
            let (count, matched) = pairs.entry(card.image).or_default();
            *count += 1;
            if card.is_matched {
                *matched += 1;
            }
        }

        for (image, (count, matched)) in &pairs {
            if *count != 2 {
                return Err(format!("{} appears {} times", image, count));
            }
            if *matched == 1 {
                return Err(format!("only one card of {} is matched", image));
            }
        }

        if self.matched_count() == self.cards.len() {
            return Err("every pair is already matched".to_owned());
        }

        Ok(())
    }

    /// Rebuild live cards, ordered by id.
    #[must_use]
    pub fn to_cards(&self) -> Vec<Card> {
        let mut cards: Vec<Card> = self
            .cards
            .iter()
            .map(|state| {
                if state.is_matched {
                    Card::matched(state.id, state.image, state.position)
                } else {
                    Card::new(state.id, state.image, state.position)
                }
            })
            .collect();
        cards.sort_by_key(Card::id);
        cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(id: u32, image: u32, is_matched: bool) -> CardState {
        CardState {
            id: CardId::new(id),
            image: ImageId::new(image),
            position: GridPosition::from_slot(id as usize, 2),
            is_matched,
        }
    }

    fn valid() -> RoundState {
        RoundState {
            rows: 2,
            cols: 2,
            cards: vec![state(0, 1, true), state(1, 2, false), state(2, 1, true), state(3, 2, false)],
        }
    }

    #[test]
    fn test_valid_round() {
        assert_eq!(valid().validate(), Ok(()));
        assert_eq!(valid().matched_count(), 2);
        assert_eq!(valid().get(CardId::new(2)), Some(&state(2, 1, true)));
        assert_eq!(valid().get(CardId::new(9)), None);
    }

    #[test]
    fn test_rejects_wrong_card_count() {
        let mut round = valid();
        round.cards.pop();
        assert!(round.validate().is_err());
    }

    #[test]
    fn test_rejects_duplicate_id() {
        let mut round = valid();
        round.cards[3].id = CardId::new(1);
        assert!(round.validate().unwrap_err().contains("duplicate id"));
    }

    #[test]
    fn test_rejects_duplicate_position() {
        let mut round = valid();
        round.cards[3].position = round.cards[0].position;
        assert!(round.validate().unwrap_err().contains("invalid position"));
    }

    #[test]
    fn test_rejects_position_outside_grid() {
        let mut round = valid();
        round.cards[3].position = GridPosition::new(5, 0);
        assert!(round.validate().is_err());
    }

    #[test]
    fn test_rejects_unpaired_image() {
        let mut round = valid();
        round.cards[3].image = ImageId::new(3);
        assert!(round.validate().is_err());
    }

    #[test]
    fn test_rejects_half_matched_pair() {
        let mut round = valid();
        round.cards[2].is_matched = false;
        assert!(round.validate().unwrap_err().contains("only one card"));
    }

    #[test]
    fn test_rejects_finished_round() {
        let mut round = valid();
        for card in &mut round.cards {
            card.is_matched = true;
        }
        assert!(round.validate().is_err());
    }

    #[test]
    fn test_capture_and_rebuild() {
        let round = valid();
        let cards = round.to_cards();

        assert_eq!(cards.len(), 4);
        assert!(cards[0].is_matched() && cards[0].is_face_up());
        assert!(!cards[1].is_matched() && !cards[1].is_face_up());

        assert_eq!(RoundState::capture(2, 2, &cards), round);
    }

    #[test]
    fn test_rebuild_orders_by_id() {
        let mut round = valid();
        round.cards.reverse();

        let ids: Vec<_> = round.to_cards().iter().map(Card::id).collect();
        assert_eq!(ids, (0..4).map(CardId::new).collect::<Vec<_>>());
    }
}
