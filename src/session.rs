//! A complete game session.
//!
//! `Session` wires one [`EventHub`], one [`SaveStore`], a [`ScoreController`]
//! and a [`RoundController`] together the way a host's menu drives them:
//! "new game" deals a fresh round, "continue" is offered only while a round
//! save exists, and the host forwards clicks and frame time.
//!
//! ```
//! use std::rc::Rc;
//! use std::time::Duration;
//! use memory_match::{GameSettings, ImageId, MemoryStorage, Session};
//!
//! let settings = GameSettings::new(2, 2)
//!     .with_images([ImageId::new(1), ImageId::new(2)])
//!     .with_seed(7);
//! let mut session = Session::new(settings, Rc::new(MemoryStorage::new())).unwrap();
//! assert!(!session.has_saved_game());
//!
//! session.new_game().unwrap();
//! let first = session.round().cards()[0].clone();
//! let pair = session
//!     .round()
//!     .cards()
//!     .iter()
//!     .find(|c| first.pairs_with(c))
//!     .map(|c| c.id())
//!     .unwrap();
//!
//! session.click(first.id()).unwrap();
//! session.click(pair).unwrap();
//! let result = session.update(Duration::from_millis(500)).unwrap().unwrap();
//!
//! assert!(result.is_match);
//! assert_eq!(session.score().score(), 10);
//! assert!(session.has_saved_game());
//! ```

use std::rc::Rc;
use std::time::Duration;

use crate::cards::ClickOutcome;
use crate::core::{CardId, GameSettings, Result};
use crate::events::EventHub;
use crate::persistence::{SaveStore, Storage};
use crate::round::{Comparison, LoadOutcome, RoundController};
use crate::score::ScoreController;

/// Round and score controllers sharing one hub and one store.
#[derive(Debug)]
pub struct Session {
    hub: EventHub,
    store: SaveStore,
    score: ScoreController,
    round: RoundController,
}

impl Session {
    /// Build a session on `storage`.
    ///
    /// Fails if `settings` cannot be dealt. No round is dealt yet; call
    /// [`new_game`](Self::new_game) or [`continue_game`](Self::continue_game).
    pub fn new(settings: GameSettings, storage: Rc<dyn Storage>) -> Result<Self> {
        settings.validate()?;

        let hub = EventHub::new();
        let store = SaveStore::new(storage);
        let score = ScoreController::attach(&hub, store.clone(), settings.scoring());
        let round = RoundController::new(settings, hub.clone(), store.clone());

        Ok(Self {
            hub,
            store,
            score,
            round,
        })
    }

    /// Is there a round to continue?
    #[must_use]
    pub fn has_saved_game(&self) -> bool {
        self.store.has_round()
    }

    /// Deal a new round. The score resets with it.
    pub fn new_game(&mut self) -> Result<()> {
        self.round.restart()
    }

    /// Resume the saved round and its score, or deal a new round if the
    /// save is missing or unusable.
    pub fn continue_game(&mut self) -> Result<LoadOutcome> {
        self.round.load_game()
    }

    /// Forward a card activation from the host.
    pub fn click(&mut self, card: CardId) -> Result<ClickOutcome> {
        self.round.click_card(card)
    }

    /// Advance game time by one frame.
    pub fn update(&mut self, dt: Duration) -> Result<Option<Comparison>> {
        self.round.advance(dt)
    }

    /// The hub, for hosts that attach their own listeners (audio, effects).
    #[must_use]
    pub fn hub(&self) -> &EventHub {
        &self.hub
    }

    #[must_use]
    pub fn round(&self) -> &RoundController {
        &self.round
    }

    pub fn round_mut(&mut self) -> &mut RoundController {
        &mut self.round
    }

    #[must_use]
    pub fn score(&self) -> &ScoreController {
        &self.score
    }

    #[must_use]
    pub fn store(&self) -> &SaveStore {
        &self.store
    }
}
