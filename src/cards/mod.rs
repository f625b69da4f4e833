//! Cards on the grid.
//!
//! ## Key Types
//!
//! - `Card`: Runtime card state (image, slot, matched/compared flags)
//! - `ClickOutcome`: Result of activating a card

pub mod instance;

pub use instance::{Card, ClickOutcome};
