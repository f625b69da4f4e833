//! Round flow: dealing, selection, the delayed comparison, and the round save.
//!
//! ## Key Components
//!
//! - [`RoundController`]: Selection state machine and round lifecycle
//! - [`ComparisonTimer`]: Generation-tagged one-shot timer for comparisons
//! - [`RoundState`]: The persisted round record
//! - [`deal`]: Builds a shuffled grid from settings

mod controller;
mod deal;
mod state;
mod timer;

pub use controller::{Comparison, LoadOutcome, RoundController, RoundPhase};
pub use deal::deal;
pub use state::{CardState, RoundState};
pub use timer::{ComparisonTicket, ComparisonTimer};
