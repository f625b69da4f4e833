//! # memory-match
//!
//! Game core for a memory (concentration) card game: a grid of face-down
//! cards is revealed two at a time, matching pairs stay up and score, and
//! mismatches turn back after a short delay.
//!
//! Rendering, animation, audio and layout belong to the host. The host
//! forwards clicks and frame time, and listens to the event hub.
//!
//! ## Design Principles
//!
//! 1. **Injected, not global**: the event hub and the save store are built
//!    by the caller and handed to each controller.
//!
//! 2. **Stable identity**: every card has a [`CardId`] assigned at deal time
//!    and kept through save/load. Nothing is looked up by image or position.
//!
//! 3. **Game clock**: the comparison delay runs on time the host feeds in,
//!    and a new round invalidates any comparison still pending.
//!
//! ## Modules
//!
//! - `core`: Card and image ids, grid positions, RNG, settings, errors
//! - `cards`: The card and its click guard
//! - `events`: Event hub and subscriptions
//! - `round`: Dealing, selection, comparison, round save
//! - `score`: Score, combo streak, high score
//! - `persistence`: Storage backends and save records
//! - `session`: Everything wired together

pub mod core;
pub mod cards;
pub mod events;
pub mod round;
pub mod score;
pub mod persistence;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    CardId, ImageId, GridPosition,
    GameRng,
    GameSettings, ScoringRules,
    GameError, Result,
};

pub use crate::cards::{Card, ClickOutcome};

pub use crate::events::{EventHub, EventKind, GameEvent, ListenerId, Subscription};

pub use crate::round::{
    CardState, RoundState,
    Comparison, ComparisonTicket, ComparisonTimer,
    LoadOutcome, RoundController, RoundPhase,
};

pub use crate::score::{ScoreController, ScoreState, ScoreUpdate, ScoreUpdateReason};

pub use crate::persistence::{FileStorage, MemoryStorage, PersistenceError, SaveStore, Storage};

pub use crate::session::Session;
