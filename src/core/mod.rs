//! Core types: card and image ids, grid positions, RNG, settings, errors.
//!
//! Everything here is independent of the round and scoring logic built on
//! top of it.

pub mod entity;
pub mod rng;
pub mod config;
pub mod error;

pub use entity::{CardId, GridPosition, ImageId};
pub use rng::GameRng;
pub use config::{GameSettings, ScoringRules};
pub use error::{GameError, Result};
