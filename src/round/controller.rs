//! Round controller.
//!
//! Owns the grid of cards and runs a round from deal to game over:
//!
//! ```text
//!   Idle --select--> OneSelected --select other--> Comparing --delay--> Idle
//!    ^                   |                              |
//!    +---select same-----+                              +--last pair--> GameOver
//! ```
//!
//! Selection locks a card (`being_compared`) until its comparison resolves.
//! While two cards are pending, every other click is rejected, so at most
//! one comparison is ever in flight. Resolution runs after the configured
//! delay; see [`ComparisonTimer`].
//!
//! Events go out through the injected [`EventHub`]; the round save is kept
//! in the injected [`SaveStore`].

use std::time::Duration;

use crate::cards::{Card, ClickOutcome};
use crate::core::{CardId, GameError, GameRng, GameSettings, Result};
use crate::events::EventHub;
use crate::persistence::SaveStore;

use super::deal::deal;
use super::state::RoundState;
use super::timer::{ComparisonTicket, ComparisonTimer};

/// Where the round is in its selection cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundPhase {
    /// No card selected.
    Idle,
    /// One card revealed, waiting for a second.
    OneSelected,
    /// Two cards revealed, waiting for the comparison delay.
    Comparing,
    /// Every pair found.
    GameOver,
}

/// Result of a resolved comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Comparison {
    pub first: CardId,
    pub second: CardId,
    pub is_match: bool,
    /// This match completed the grid.
    pub game_over: bool,
}

/// Result of [`RoundController::load_game`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The saved round was restored.
    Restored,
    /// No usable save; a new round was dealt instead.
    StartedFresh { reason: String },
}

/// Runs one round at a time.
#[derive(Debug)]
pub struct RoundController {
    hub: EventHub,
    store: SaveStore,
    settings: GameSettings,
    rng: GameRng,
    rows: u8,
    cols: u8,
    cards: Vec<Card>,
    first_selected: Option<CardId>,
    second_selected: Option<CardId>,
    timer: ComparisonTimer,
    game_over: bool,
}

impl RoundController {
    /// Create a controller with an empty grid.
    ///
    /// Nothing is dealt until [`initialize_game`](Self::initialize_game) or
    /// [`load_game`](Self::load_game) is called.
    pub fn new(settings: GameSettings, hub: EventHub, store: SaveStore) -> Self {
        let rng = settings.seed.map_or_else(GameRng::from_entropy, GameRng::new);
        Self {
            hub,
            store,
            rows: settings.rows,
            cols: settings.cols,
            settings,
            rng,
            cards: Vec::new(),
            first_selected: None,
            second_selected: None,
            timer: ComparisonTimer::new(),
            game_over: false,
        }
    }

    // === Lifecycle ===

    /// Deal a new round from `settings`.
    ///
    /// Fails with [`GameError::InvalidConfig`] before touching the current
    /// round or the save if the settings cannot be dealt. Otherwise deletes
    /// the round save, drops any pending comparison, deals, and fires
    /// `GameStarted`.
    pub fn initialize_game(&mut self, settings: GameSettings) -> Result<()> {
        if let Some(seed) = settings.seed {
            self.rng = GameRng::new(seed);
        }
        let cards = deal(&settings, &mut self.rng)?;

        self.store.clear_round()?;
        self.reset(settings.rows, settings.cols, cards);
        self.settings = settings;

        log::info!(
            "New round: {}x{} grid, {} pairs",
            self.rows,
            self.cols,
            self.cards.len() / 2
        );
        self.hub.game_started();
        Ok(())
    }

    /// Deal a new round with the current settings.
    pub fn restart(&mut self) -> Result<()> {
        self.initialize_game(self.settings.clone())
    }

    /// Resume the saved round.
    ///
    /// A missing, unreadable or inconsistent save is not an error: it is
    /// logged, deleted, and a new round is dealt. Selection always starts
    /// empty.
    pub fn load_game(&mut self) -> Result<LoadOutcome> {
        let reason = match self.store.load_round() {
            Ok(Some(saved)) => match saved.validate() {
                Ok(()) => {
                    let cards = saved.to_cards();
                    self.reset(saved.rows, saved.cols, cards);
                    log::info!(
                        "Round restored: {}x{} grid, {} of {} cards matched",
                        self.rows,
                        self.cols,
                        self.matched_count(),
                        self.cards.len()
                    );
                    self.hub.game_loaded();
                    return Ok(LoadOutcome::Restored);
                }
                Err(reason) => format!("inconsistent save: {reason}"),
            },
            Ok(None) => "no saved round".to_owned(),
            Err(e) => e.to_string(),
        };

        log::warn!("Load failed ({}), starting a new round", reason);
        if let Err(e) = self.store.clear_round() {
            log::warn!("Could not delete the unusable round save: {}", e);
        }
        self.restart()?;
        Ok(LoadOutcome::StartedFresh { reason })
    }

    fn reset(&mut self, rows: u8, cols: u8, cards: Vec<Card>) {
        if self.timer.cancel() {
            log::debug!("Pending comparison dropped by round reset");
        }
        self.rows = rows;
        self.cols = cols;
        self.cards = cards;
        self.first_selected = None;
        self.second_selected = None;
        self.game_over = false;
    }

    // === Selection ===

    /// Activate a card (the host's input entry point).
    ///
    /// Rejected with [`ClickOutcome::Busy`] while a comparison is pending or
    /// the round is over. Otherwise the card's own guard decides; a selected
    /// card fires `CardSelected` and enters the selection state machine.
    pub fn click_card(&mut self, id: CardId) -> Result<ClickOutcome> {
        let busy = matches!(self.phase(), RoundPhase::Comparing | RoundPhase::GameOver);
        let card = self.card_mut(id)?;
        if busy {
            return Ok(ClickOutcome::Busy);
        }

        let outcome = card.click();
        if outcome.is_selected() {
            self.hub.card_selected(id);
            self.card_selected(id)?;
        } else {
            log::trace!("{} ignored click: {:?}", id, outcome);
        }
        Ok(outcome)
    }

    /// Feed a selection into the state machine.
    ///
    /// - nothing selected: `id` becomes the first selection
    /// - `id` is the first selection: deselect it (and turn it back down)
    /// - otherwise: `id` becomes the second selection and the comparison is
    ///   scheduled
    ///
    /// Ignored for matched cards and while a comparison is pending.
    pub fn card_selected(&mut self, id: CardId) -> Result<()> {
        if self.card(id)?.is_matched() {
            return Ok(());
        }

        match (self.first_selected, self.second_selected) {
            (_, Some(_)) => {
                log::debug!("{} selected while a comparison is pending, ignored", id);
            }
            (None, None) => {
                self.card_mut(id)?.reveal();
                self.first_selected = Some(id);
                log::debug!("{} selected first", id);
            }
            (Some(first), None) if first == id => {
                let card = self.card_mut(id)?;
                card.unlock();
                card.hide();
                self.first_selected = None;
                log::debug!("{} deselected", id);
            }
            (Some(first), None) => {
                self.card_mut(id)?.reveal();
                self.second_selected = Some(id);
                let delay = self.settings.compare_delay();
                let ticket = self.timer.schedule(first, id, delay);
                log::debug!("Comparing {} and {} in {:?}", ticket.first, ticket.second, delay);
            }
        }
        Ok(())
    }

    // === Resolution ===

    /// Let `dt` of game time pass, resolving the pending comparison once
    /// its delay has elapsed.
    pub fn advance(&mut self, dt: Duration) -> Result<Option<Comparison>> {
        match self.timer.advance(dt) {
            Some(ticket) => self.finish(ticket).map(Some),
            None => Ok(None),
        }
    }

    /// The pending comparison, for hosts that run their own timer.
    #[must_use]
    pub fn pending_comparison(&self) -> Option<ComparisonTicket> {
        self.timer.pending()
    }

    /// Resolve a comparison handed back by a host timer.
    ///
    /// Stale tickets (the round was reset, or the comparison already
    /// resolved) are ignored and return `None`.
    pub fn resolve(&mut self, ticket: ComparisonTicket) -> Result<Option<Comparison>> {
        if !self.timer.claim(ticket) {
            log::debug!("Stale comparison ticket for {} and {} ignored", ticket.first, ticket.second);
            return Ok(None);
        }
        self.finish(ticket).map(Some)
    }

    fn finish(&mut self, ticket: ComparisonTicket) -> Result<Comparison> {
        let (first, second) = (ticket.first, ticket.second);
        let is_match = self.card(first)?.pairs_with(self.card(second)?);

        for id in [first, second] {
            let card = self.card_mut(id)?;
            if is_match {
                card.set_matched();
            } else {
                card.hide();
            }
            card.unlock();
        }
        self.first_selected = None;
        self.second_selected = None;

        log::debug!(
            "{} and {}: {}",
            first,
            second,
            if is_match { "match" } else { "mismatch" }
        );
        self.hub.card_compared(is_match);

        let game_over = is_match && self.is_complete();
        if game_over {
            self.game_over = true;
            log::info!("All {} pairs found, game over", self.cards.len() / 2);
            self.hub.game_over();
            self.store.clear_round()?;
        } else {
            self.store.save_round(&self.round_state())?;
        }

        Ok(Comparison {
            first,
            second,
            is_match,
            game_over,
        })
    }

    // === Queries ===

    #[must_use]
    pub fn phase(&self) -> RoundPhase {
        if self.game_over {
            RoundPhase::GameOver
        } else if self.second_selected.is_some() {
            RoundPhase::Comparing
        } else if self.first_selected.is_some() {
            RoundPhase::OneSelected
        } else {
            RoundPhase::Idle
        }
    }

    /// The current selection slots.
    #[must_use]
    pub fn selection(&self) -> (Option<CardId>, Option<CardId>) {
        (self.first_selected, self.second_selected)
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, id: CardId) -> Result<&Card> {
        self.cards
            .get(id.index())
            .filter(|c| c.id() == id)
            .ok_or(GameError::UnknownCard(id))
    }

    fn card_mut(&mut self, id: CardId) -> Result<&mut Card> {
        self.cards
            .get_mut(id.index())
            .filter(|c| c.id() == id)
            .ok_or(GameError::UnknownCard(id))
    }

    #[must_use]
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Grid size of the current round as `(rows, cols)`.
    #[must_use]
    pub fn grid_size(&self) -> (u8, u8) {
        (self.rows, self.cols)
    }

    #[must_use]
    pub fn matched_count(&self) -> usize {
        self.cards.iter().filter(|c| c.is_matched()).count()
    }

    /// Has every card been matched?
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.cards.is_empty() && self.cards.iter().all(Card::is_matched)
    }

    #[must_use]
    pub fn has_pending_comparison(&self) -> bool {
        self.timer.is_pending()
    }

    /// Snapshot of the live cards, as the round save stores them.
    #[must_use]
    pub fn round_state(&self) -> RoundState {
        RoundState::capture(self.rows, self.cols, &self.cards)
    }
}
