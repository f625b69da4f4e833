//! Typed save records on top of a [`Storage`] backend.
//!
//! | Key         | Record        | Lifetime                                       |
//! |-------------|---------------|------------------------------------------------|
//! | `RoundData` | [`RoundState`] | written after each comparison, deleted on new game and game over |
//! | `ScoreData` | [`ScoreState`] | written on game start and after each comparison, deleted on game over |
//! | `HighScore` | integer       | written when beaten, never deleted             |

use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::{PersistenceError, Result};
use super::storage::Storage;
use crate::round::RoundState;
use crate::score::ScoreState;

/// Typed access to the game's save records.
///
/// Cloning shares the underlying storage.
#[derive(Clone)]
pub struct SaveStore {
    storage: Rc<dyn Storage>,
}

impl SaveStore {
    pub const ROUND_KEY: &'static str = "RoundData";
    pub const SCORE_KEY: &'static str = "ScoreData";
    pub const HIGH_SCORE_KEY: &'static str = "HighScore";

    pub fn new(storage: Rc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// The backend this store writes to.
    #[must_use]
    pub fn storage(&self) -> &Rc<dyn Storage> {
        &self.storage
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(json) = self.storage.read(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|source| PersistenceError::Corrupt {
                key: key.to_owned(),
                source,
            })
    }

    fn save<T: Serialize>(&self, key: &str, record: &T) -> Result<()> {
        let json = serde_json::to_string(record).map_err(|source| PersistenceError::Encode {
            key: key.to_owned(),
            source,
        })?;
        self.storage.write(key, &json)
    }

    // === Round ===

    pub fn load_round(&self) -> Result<Option<RoundState>> {
        self.load(Self::ROUND_KEY)
    }

    pub fn save_round(&self, round: &RoundState) -> Result<()> {
        self.save(Self::ROUND_KEY, round)?;
        log::debug!("Round saved ({} cards, {} matched)", round.cards.len(), round.matched_count());
        Ok(())
    }

    pub fn clear_round(&self) -> Result<()> {
        self.storage.remove(Self::ROUND_KEY)
    }

    /// Is there a round to continue? Storage errors count as "no".
    #[must_use]
    pub fn has_round(&self) -> bool {
        match self.storage.contains(Self::ROUND_KEY) {
            Ok(present) => present,
            Err(e) => {
                log::warn!("Could not check for a saved round: {}", e);
                false
            }
        }
    }

    // === Score ===

    pub fn load_score(&self) -> Result<Option<ScoreState>> {
        self.load(Self::SCORE_KEY)
    }

    pub fn save_score(&self, score: &ScoreState) -> Result<()> {
        self.save(Self::SCORE_KEY, score)
    }

    pub fn clear_score(&self) -> Result<()> {
        self.storage.remove(Self::SCORE_KEY)
    }

    // === High score ===

    /// The persisted high score, 0 if none has been set.
    pub fn load_high_score(&self) -> Result<u32> {
        Ok(self.load(Self::HIGH_SCORE_KEY)?.unwrap_or(0))
    }

    pub fn save_high_score(&self, high_score: u32) -> Result<()> {
        self.save(Self::HIGH_SCORE_KEY, &high_score)?;
        log::info!("High score saved: {}", high_score);
        Ok(())
    }
}

impl std::fmt::Debug for SaveStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaveStore").finish_non_exhaustive()
    }
}
