//! Card instances - runtime card state.
//!
//! A `Card` is one face-down tile on the grid. It knows its image, its slot,
//! and two flags the round controller drives: `matched` (the pair is found)
//! and `being_compared` (the card is revealed and waiting on a comparison,
//! which locks it against further input).
//!
//! `face_up` is presentation state only. Hosts mirror it with a flip
//! animation; no game rule reads it.

use serde::{Deserialize, Serialize};

use crate::core::{CardId, GridPosition, ImageId};

/// What happened when a card was activated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The card flipped face-up and was reported as selected.
    Selected,
    /// Ignored: the card is waiting on a comparison.
    Locked,
    /// Ignored: the card's pair is already found.
    AlreadyMatched,
    /// Ignored: the round is resolving a comparison or is over.
    Busy,
}

impl ClickOutcome {
    #[must_use]
    pub const fn is_selected(self) -> bool {
        matches!(self, Self::Selected)
    }
}

/// A card on the grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    id: CardId,
    image: ImageId,
    position: GridPosition,
    matched: bool,
    being_compared: bool,
    face_up: bool,
}

impl Card {
    /// Create a face-down, unmatched card.
    #[must_use]
    pub fn new(id: CardId, image: ImageId, position: GridPosition) -> Self {
        Self {
            id,
            image,
            position,
            matched: false,
            being_compared: false,
            face_up: false,
        }
    }

    /// Create a card whose pair was already found (restored from a save).
    #[must_use]
    pub fn matched(id: CardId, image: ImageId, position: GridPosition) -> Self {
        Self {
            matched: true,
            face_up: true,
            ..Self::new(id, image, position)
        }
    }

    #[must_use]
    pub fn id(&self) -> CardId {
        self.id
    }

    #[must_use]
    pub fn image(&self) -> ImageId {
        self.image
    }

    pub fn set_image(&mut self, image: ImageId) {
        self.image = image;
    }

    #[must_use]
    pub fn position(&self) -> GridPosition {
        self.position
    }

    #[must_use]
    pub fn is_matched(&self) -> bool {
        self.matched
    }

    #[must_use]
    pub fn is_being_compared(&self) -> bool {
        self.being_compared
    }

    #[must_use]
    pub fn is_face_up(&self) -> bool {
        self.face_up
    }

    /// Do two cards show the same image?
    #[must_use]
    pub fn pairs_with(&self, other: &Card) -> bool {
        self.id != other.id && self.image == other.image
    }

    /// Toggle the face-up flag. Matched cards stay face-up.
    pub fn flip(&mut self) {
        if self.matched {
            return;
        }
        self.face_up = !self.face_up;
    }

    /// Guarded activation.
    ///
    /// A card waiting on a comparison ignores input. Otherwise an unmatched
    /// card locks itself, flips, and reports `Selected`; the caller forwards
    /// the selection to the round controller.
    pub fn click(&mut self) -> ClickOutcome {
        if self.being_compared {
            return ClickOutcome::Locked;
        }
        if self.matched {
            return ClickOutcome::AlreadyMatched;
        }

        self.being_compared = true;
        self.flip();
        ClickOutcome::Selected
    }

    pub(crate) fn set_matched(&mut self) {
        self.matched = true;
        self.face_up = true;
    }

    /// Lock the card face-up for a comparison.
    pub(crate) fn reveal(&mut self) {
        self.being_compared = true;
        self.face_up = true;
    }

    pub(crate) fn unlock(&mut self) {
        self.being_compared = false;
    }

    /// Turn an unmatched card face-down again, whatever its current side.
    pub(crate) fn hide(&mut self) {
        if !self.matched {
            self.face_up = false;
        }
    }
}
