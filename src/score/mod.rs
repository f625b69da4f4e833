//! Scoring: points, match streaks, and the high score.

mod controller;
mod state;

pub use controller::{ScoreController, ScoreUpdate, ScoreUpdateReason};
pub use state::ScoreState;
