//! Round configuration.
//!
//! Hosts describe a round with [`GameSettings`]: grid size, the pool of card
//! images to deal from, and the scoring constants. Settings are read-only to
//! the engine; a round validates them once, before any card is dealt.
//!
//! Settings can be built in code or loaded from JSON. Missing fields fall
//! back to the defaults of a 4x4 grid scored 10 per match and 2 per miss:
//!
//! ```
//! use memory_match::core::GameSettings;
//!
//! let settings = GameSettings::from_json(r#"{ "rows": 2, "cols": 3, "available_images": [1, 2, 3] }"#).unwrap();
//! assert_eq!(settings.pair_count(), 3);
//! assert_eq!(settings.match_score, 10);
//! assert!(settings.validate().is_ok());
//! ```

use std::path::Path;
use std::time::Duration;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::entity::ImageId;
use super::error::{GameError, Result};

/// Points awarded and deducted by the score controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRules {
    /// Base points for a match, multiplied by the combo multiplier.
    pub match_score: u32,
    /// Points lost on a mismatch. The score never drops below zero.
    pub mismatch_penalty: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            match_score: GameSettings::DEFAULT_MATCH_SCORE,
            mismatch_penalty: GameSettings::DEFAULT_MISMATCH_PENALTY,
        }
    }
}

/// Complete per-round configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Number of rows in the grid.
    pub rows: u8,

    /// Number of columns in the grid.
    pub cols: u8,

    /// Images to deal from. Must hold at least `rows * cols / 2` distinct ids.
    pub available_images: Vec<ImageId>,

    /// Base points per match.
    pub match_score: u32,

    /// Points lost per mismatch.
    pub mismatch_penalty: u32,

    /// How long both cards stay revealed before a comparison resolves.
    pub compare_delay_ms: u64,

    /// Fixed deal seed. `None` deals from OS entropy.
    pub seed: Option<u64>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            rows: 4,
            cols: 4,
            available_images: Vec::new(),
            match_score: Self::DEFAULT_MATCH_SCORE,
            mismatch_penalty: Self::DEFAULT_MISMATCH_PENALTY,
            compare_delay_ms: Self::DEFAULT_COMPARE_DELAY_MS,
            seed: None,
        }
    }
}

impl GameSettings {
    pub const DEFAULT_MATCH_SCORE: u32 = 10;
    pub const DEFAULT_MISMATCH_PENALTY: u32 = 2;
    pub const DEFAULT_COMPARE_DELAY_MS: u64 = 500;

    /// Create settings for a `rows` x `cols` grid with default scoring.
    pub fn new(rows: u8, cols: u8) -> Self {
        Self {
            rows,
            cols,
            ..Self::default()
        }
    }

    /// Set the image pool (builder pattern).
    #[must_use]
    pub fn with_images(mut self, images: impl IntoIterator<Item = ImageId>) -> Self {
        self.available_images = images.into_iter().collect();
        self
    }

    /// Set the base match score (builder pattern).
    #[must_use]
    pub fn with_match_score(mut self, points: u32) -> Self {
        self.match_score = points;
        self
    }

    /// Set the mismatch penalty (builder pattern).
    #[must_use]
    pub fn with_mismatch_penalty(mut self, points: u32) -> Self {
        self.mismatch_penalty = points;
        self
    }

    /// Set the reveal delay before a comparison resolves (builder pattern).
    #[must_use]
    pub fn with_compare_delay(mut self, delay: Duration) -> Self {
        self.compare_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Fix the deal seed (builder pattern).
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parse settings from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| GameError::InvalidConfig(e.to_string()))
    }

    /// Load settings from a JSON file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| GameError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        let settings = Self::from_json(&content)?;
        log::info!("Loaded game settings from {}", path.display());
        Ok(settings)
    }

    /// Total number of cards on the grid.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Number of pairs dealt per round.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.card_count() / 2
    }

    /// Scoring constants for the score controller.
    #[must_use]
    pub fn scoring(&self) -> ScoringRules {
        ScoringRules {
            match_score: self.match_score,
            mismatch_penalty: self.mismatch_penalty,
        }
    }

    #[must_use]
    pub fn compare_delay(&self) -> Duration {
        Duration::from_millis(self.compare_delay_ms)
    }

    /// The image pool with duplicates removed, first occurrence kept.
    #[must_use]
    pub fn distinct_images(&self) -> Vec<ImageId> {
        let mut seen = FxHashSet::default();
        self.available_images
            .iter()
            .copied()
            .filter(|image| seen.insert(*image))
            .collect()
    }

    /// Check that a round can be dealt from these settings.
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(GameError::InvalidConfig(format!(
                "grid must have at least one row and column, got {}x{}",
                self.rows, self.cols
            )));
        }

        if self.card_count() % 2 != 0 {
            return Err(GameError::InvalidConfig(format!(
                "a {}x{} grid has an odd number of cards",
                self.rows, self.cols
            )));
        }

        let distinct = self.distinct_images().len();
        if distinct < self.pair_count() {
            return Err(GameError::InvalidConfig(format!(
                "need {} distinct images for a {}x{} grid, got {}",
                self.pair_count(),
                self.rows,
                self.cols,
                distinct
            )));
        }

        Ok(())
    }
}
