//! Game event types.
//!
//! Five things happen during a round that other components care about. The
//! round controller fires them; score keeping, audio, animation and UI text
//! listen. Listeners register per [`EventKind`] and receive the full
//! [`GameEvent`].

use serde::{Deserialize, Serialize};

use crate::core::CardId;

/// The kind of an event, used as the subscription key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    CardSelected,
    CardCompared,
    GameOver,
    GameLoaded,
    GameStarted,
}

impl EventKind {
    /// Every event kind, in declaration order.
    pub const ALL: [EventKind; 5] = [
        EventKind::CardSelected,
        EventKind::CardCompared,
        EventKind::GameOver,
        EventKind::GameLoaded,
        EventKind::GameStarted,
    ];

    /// Human-readable name (for logging).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            EventKind::CardSelected => "CardSelected",
            EventKind::CardCompared => "CardCompared",
            EventKind::GameOver => "GameOver",
            EventKind::GameLoaded => "GameLoaded",
            EventKind::GameStarted => "GameStarted",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A game event with its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A card was activated and flipped face-up.
    CardSelected(CardId),
    /// A pair of revealed cards was resolved.
    CardCompared { is_match: bool },
    /// Every pair on the grid has been found.
    GameOver,
    /// A saved round was restored.
    GameLoaded,
    /// A fresh round was dealt.
    GameStarted,
}

impl GameEvent {
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            GameEvent::CardSelected(_) => EventKind::CardSelected,
            GameEvent::CardCompared { .. } => EventKind::CardCompared,
            GameEvent::GameOver => EventKind::GameOver,
            GameEvent::GameLoaded => EventKind::GameLoaded,
            GameEvent::GameStarted => EventKind::GameStarted,
        }
    }

    /// The selected card, for `CardSelected` events.
    #[must_use]
    pub const fn card(&self) -> Option<CardId> {
        match self {
            GameEvent::CardSelected(id) => Some(*id),
            _ => None,
        }
    }

    /// The comparison result, for `CardCompared` events.
    #[must_use]
    pub const fn is_match(&self) -> Option<bool> {
        match self {
            GameEvent::CardCompared { is_match } => Some(*is_match),
            _ => None,
        }
    }
}
