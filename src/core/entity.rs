//! Card and image identification.
//!
//! Every card dealt into a round has a unique `CardId`, assigned in slot order
//! when the grid is dealt and carried through save/load. Matching is decided by
//! `ImageId`, never by card identity: two cards form a pair when their image
//! handles are equal.
//!
//! ## Usage
//!
//! ```
//! use memory_match::core::{CardId, GridPosition, ImageId};
//!
//! let card = CardId::new(5);
//! let pos = GridPosition::from_slot(5, 4);
//!
//! assert_eq!(card.index(), 5);
//! assert_eq!(pos, GridPosition::new(1, 1));
//! assert_eq!(pos.xy(), (1, 1));
//! assert_ne!(ImageId::new(1), ImageId::new(2));
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a card within a round.
///
/// Ids are dense: a grid of `n` cards uses `CardId(0)..CardId(n)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Slot index of this card in the dealt grid.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for CardId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Opaque image handle.
///
/// The engine never interprets these; the host maps them to sprites.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ImageId(pub u32);

impl ImageId {
    /// Create a new image ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for ImageId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Image({})", self.0)
    }
}

/// A card's slot in the grid.
///
/// Serialized as `{ "x": col, "y": row }` to match the save format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    #[serde(rename = "x")]
    pub col: u8,
    #[serde(rename = "y")]
    pub row: u8,
}

impl GridPosition {
    #[must_use]
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Position of slot `index` in a grid `cols` wide (row-major).
    #[must_use]
    pub const fn from_slot(index: usize, cols: u8) -> Self {
        let cols = cols as usize;
        Self {
            row: (index / cols) as u8,
            col: (index % cols) as u8,
        }
    }

    /// Row-major slot index in a grid `cols` wide.
    #[must_use]
    pub const fn slot(self, cols: u8) -> usize {
        self.row as usize * cols as usize + self.col as usize
    }

    /// `(x, y)` pair, with `x` the column.
    #[must_use]
    pub const fn xy(self) -> (u8, u8) {
        (self.col, self.row)
    }

    /// Is this position inside a `rows` x `cols` grid?
    #[must_use]
    pub const fn within(self, rows: u8, cols: u8) -> bool {
        self.row < rows && self.col < cols
    }
}

impl std::fmt::Display for GridPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}
