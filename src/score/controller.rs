//! Score controller.
//!
//! Listens to the round's events and keeps the score, the match streak and
//! the high score:
//!
//! | Event                | Effect                                                  |
//! |----------------------|---------------------------------------------------------|
//! | `CardCompared(true)` | extend streak, add `match_score * combo`, save score    |
//! | `CardCompared(false)`| break streak, subtract penalty (floor 0), save score    |
//! | `GameOver`           | save high score if beaten, delete score record          |
//! | `GameStarted`        | reset, save score                                       |
//! | `GameLoaded`         | restore the score record, or reset if there is none     |
//!
//! Save failures are logged and the in-memory score carries on; a listener
//! has nobody to return an error to.

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::ScoringRules;
use crate::events::{EventHub, EventKind, GameEvent, Subscription};
use crate::persistence::SaveStore;

use super::state::ScoreState;

/// Why the score changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreUpdateReason {
    Matched { points: u32 },
    /// `lost` is what the penalty actually removed; 0 when the score was
    /// already at zero.
    Mismatched { lost: u32 },
    Reset,
    Restored,
    NewHighScore { previous: u32 },
}

/// Notification sent to [`ScoreController::on_change`] observers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreUpdate {
    pub state: ScoreState,
    pub high_score: u32,
    pub reason: ScoreUpdateReason,
}

type Observer = Box<dyn FnMut(&ScoreUpdate)>;

#[derive(Debug)]
struct ScoreBook {
    state: ScoreState,
    high_score: u32,
    rules: ScoringRules,
    store: SaveStore,
}

impl ScoreBook {
    fn handle(&mut self, event: &GameEvent) -> Option<ScoreUpdate> {
        let reason = match *event {
            GameEvent::CardCompared { is_match: true } => {
                let points = self.state.apply_match(self.rules);
                self.save_score();
                ScoreUpdateReason::Matched { points }
            }
            GameEvent::CardCompared { is_match: false } => {
                let lost = self.state.apply_mismatch(self.rules);
                self.save_score();
                ScoreUpdateReason::Mismatched { lost }
            }
            GameEvent::GameOver => {
                let beaten = self.check_high_score();
                if let Err(e) = self.store.clear_score() {
                    log::warn!("Could not delete the score record: {}", e);
                }
                log::info!("Final score {} (high score {})", self.state.score, self.high_score);
                match beaten {
                    Some(previous) => ScoreUpdateReason::NewHighScore { previous },
                    None => return None,
                }
            }
            GameEvent::GameStarted => {
                self.state.reset();
                self.save_score();
                ScoreUpdateReason::Reset
            }
            GameEvent::GameLoaded => {
                self.state = match self.store.load_score() {
                    Ok(Some(saved)) => saved.normalized(),
                    Ok(None) => ScoreState::default(),
                    Err(e) => {
                        log::warn!("Could not restore the score, starting from zero: {}", e);
                        ScoreState::default()
                    }
                };
                log::debug!("Score restored: {:?}", self.state);
                ScoreUpdateReason::Restored
            }
            GameEvent::CardSelected(_) => return None,
        };

        Some(ScoreUpdate {
            state: self.state,
            high_score: self.high_score,
            reason,
        })
    }

    /// Record the current score as the high score if it beats it. Returns
    /// the previous high score when it was beaten.
    fn check_high_score(&mut self) -> Option<u32> {
        if self.state.score <= self.high_score {
            return None;
        }
        let previous = std::mem::replace(&mut self.high_score, self.state.score);
        if let Err(e) = self.store.save_high_score(self.high_score) {
            log::warn!("Could not save the high score: {}", e);
        }
        Some(previous)
    }

    fn save_score(&self) {
        if let Err(e) = self.store.save_score(&self.state) {
            log::warn!("Could not save the score: {}", e);
        }
    }
}

/// Keeps score for the rounds announced on an [`EventHub`].
///
/// Dropping the controller unsubscribes it.
pub struct ScoreController {
    book: Rc<RefCell<ScoreBook>>,
    observers: Rc<RefCell<Vec<Observer>>>,
    _subscriptions: Vec<Subscription>,
}

impl ScoreController {
    const EVENTS: [EventKind; 4] = [
        EventKind::CardCompared,
        EventKind::GameOver,
        EventKind::GameStarted,
        EventKind::GameLoaded,
    ];

    /// Subscribe a new controller to `hub`.
    ///
    /// The high score is read from `store` once, here; the running score
    /// starts at zero until `GameStarted` or `GameLoaded` arrives.
    pub fn attach(hub: &EventHub, store: SaveStore, rules: ScoringRules) -> Self {
        let high_score = store.load_high_score().unwrap_or_else(|e| {
            log::warn!("Could not read the high score, using 0: {}", e);
            0
        });

        let book = Rc::new(RefCell::new(ScoreBook {
            state: ScoreState::default(),
            high_score,
            rules,
            store,
        }));
        let observers: Rc<RefCell<Vec<Observer>>> = Rc::default();

        let subscriptions = Self::EVENTS
            .iter()
            .map(|&kind| {
                let book = Rc::clone(&book);
                let observers = Rc::clone(&observers);
                hub.subscribe(kind, move |event| {
                    // The book borrow ends before observers run, so they may
                    // query the controller.
                    let update = book.borrow_mut().handle(event);
                    if let Some(update) = update {
                        notify(&observers, &update);
                    }
                })
            })
            .collect();

        Self {
            book,
            observers,
            _subscriptions: subscriptions,
        }
    }

    /// Register a score-changed observer (the host's score display).
    pub fn on_change<F>(&self, observer: F)
    where
        F: FnMut(&ScoreUpdate) + 'static,
    {
        match self.observers.try_borrow_mut() {
            Ok(mut observers) => observers.push(Box::new(observer)),
            Err(_) => log::warn!("Score observer registered during a notification, ignored"),
        }
    }

    #[must_use]
    pub fn state(&self) -> ScoreState {
        self.book.borrow().state
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.book.borrow().state.score
    }

    #[must_use]
    pub fn high_score(&self) -> u32 {
        self.book.borrow().high_score
    }

    #[must_use]
    pub fn rules(&self) -> ScoringRules {
        self.book.borrow().rules
    }
}

fn notify(observers: &RefCell<Vec<Observer>>, update: &ScoreUpdate) {
    match observers.try_borrow_mut() {
        Ok(mut observers) => {
            for observer in observers.iter_mut() {
                observer(update);
            }
        }
        Err(_) => log::warn!("Nested score notification skipped: {:?}", update.reason),
    }
}

impl std::fmt::Debug for ScoreController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = f.debug_struct("ScoreController");
        match self.book.try_borrow() {
            Ok(book) => out.field("book", &*book),
            Err(_) => out.field("book", &"<updating>"),
        };
        match self.observers.try_borrow() {
            Ok(observers) => out.field("observers", &observers.len()),
            Err(_) => out.field("observers", &"<notifying>"),
        };
        out.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStorage, Storage};

    struct Fixture {
        hub: EventHub,
        storage: Rc<MemoryStorage>,
        score: ScoreController,
        updates: Rc<RefCell<Vec<ScoreUpdate>>>,
    }

    fn fixture() -> Fixture {
        let hub = EventHub::new();
        let storage = Rc::new(MemoryStorage::new());
        let score = ScoreController::attach(&hub, SaveStore::new(storage.clone()), ScoringRules::default());
        let updates = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&updates);
        score.on_change(move |u| sink.borrow_mut().push(*u));
        Fixture {
            hub,
            storage,
            score,
            updates,
        }
    }

    fn saved_score(storage: &Rc<MemoryStorage>) -> Option<ScoreState> {
        SaveStore::new(storage.clone()).load_score().unwrap()
    }

    #[test]
    fn test_attach_subscribes() {
        let f = fixture();
        for kind in ScoreController::EVENTS {
            assert_eq!(f.hub.listener_count(kind), 1);
        }
        assert_eq!(f.hub.listener_count(EventKind::CardSelected), 0);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let f = fixture();
        drop(f.score);
        for kind in ScoreController::EVENTS {
            assert_eq!(f.hub.listener_count(kind), 0);
        }
    }

    #[test]
    fn test_match_and_mismatch_scoring() {
        let f = fixture();
        f.hub.game_started();

        f.hub.card_compared(true);
        f.hub.card_compared(true);
        assert_eq!(f.score.score(), 30);
        assert_eq!(f.score.state().combo_multiplier, 2);

        f.hub.card_compared(false);
        assert_eq!(f.score.score(), 28);
        assert_eq!(f.score.state().consecutive_matches, 0);

        assert_eq!(saved_score(&f.storage), Some(f.score.state()));

        let reasons: Vec<_> = f.updates.borrow().iter().map(|u| u.reason).collect();
        assert_eq!(
            reasons,
            vec![
                ScoreUpdateReason::Reset,
                ScoreUpdateReason::Matched { points: 10 },
                ScoreUpdateReason::Matched { points: 20 },
                ScoreUpdateReason::Mismatched { lost: 2 },
            ]
        );
    }

    #[test]
    fn test_mismatch_at_zero_loses_nothing() {
        let f = fixture();
        f.hub.card_compared(false);

        assert_eq!(f.score.score(), 0);
        assert_eq!(
            f.updates.borrow().last().map(|u| u.reason),
            Some(ScoreUpdateReason::Mismatched { lost: 0 })
        );
    }

    #[test]
    fn test_game_over_sets_high_score() {
        let f = fixture();
        f.hub.game_started();
        f.hub.card_compared(true);
        f.hub.game_over();

        assert_eq!(f.score.high_score(), 10);
        assert_eq!(f.score.score(), 10);
        assert_eq!(SaveStore::new(f.storage.clone()).load_high_score().unwrap(), 10);
        assert_eq!(saved_score(&f.storage), None);
        assert_eq!(
            f.updates.borrow().last().map(|u| u.reason),
            Some(ScoreUpdateReason::NewHighScore { previous: 0 })
        );
    }

    #[test]
    fn test_game_over_keeps_higher_high_score() {
        let f = fixture();
        f.storage.write(SaveStore::HIGH_SCORE_KEY, "50").unwrap();
        let score = ScoreController::attach(&f.hub, SaveStore::new(f.storage.clone()), ScoringRules::default());
        drop(f.score);

        f.hub.game_started();
        f.hub.card_compared(true);
        f.hub.game_over();

        assert_eq!(score.high_score(), 50);
        assert_eq!(f.storage.read(SaveStore::HIGH_SCORE_KEY).unwrap().as_deref(), Some("50"));
        assert!(!f.storage.contains(SaveStore::SCORE_KEY).unwrap());
    }

    #[test]
    fn test_game_started_resets() {
        let f = fixture();
        f.hub.card_compared(true);
        f.hub.game_started();

        assert_eq!(f.score.state(), ScoreState::default());
        assert_eq!(saved_score(&f.storage), Some(ScoreState::default()));
    }

    #[test]
    fn test_game_loaded_restores_record() {
        let f = fixture();
        f.storage
            .write(
                SaveStore::SCORE_KEY,
                r#"{"score":42,"consecutiveMatches":3,"comboMultiplier":7}"#,
            )
            .unwrap();

        f.hub.game_loaded();

        let state = f.score.state();
        assert_eq!(state.score, 42);
        assert_eq!(state.consecutive_matches, 3);
        assert_eq!(state.combo_multiplier, 2);
        assert_eq!(f.updates.borrow().last().map(|u| u.reason), Some(ScoreUpdateReason::Restored));
    }

    #[test]
    fn test_game_loaded_without_record() {
        let f = fixture();
        f.hub.card_compared(true);
        f.storage.remove(SaveStore::SCORE_KEY).unwrap();
        assert_eq!(f.score.score(), 10);

        f.hub.game_loaded();

        assert_eq!(f.score.state(), ScoreState::default());
        assert_eq!(f.updates.borrow().last().map(|u| u.reason), Some(ScoreUpdateReason::Restored));
    }

    #[test]
    fn test_game_loaded_corrupt_record() {
        let f = fixture();
        f.hub.card_compared(true);
        f.storage.write(SaveStore::SCORE_KEY, "not json").unwrap();

        f.hub.game_loaded();

        assert_eq!(f.score.state(), ScoreState::default());
    }

    #[test]
    fn test_debug_inside_observer() {
        let f = fixture();
        let score = Rc::new(f.score);
        let printed = Rc::new(RefCell::new(String::new()));

        let (weak, sink) = (Rc::downgrade(&score), Rc::clone(&printed));
        score.on_change(move |_| {
            if let Some(score) = weak.upgrade() {
                *sink.borrow_mut() = format!("{:?}", score);
            }
        });

        f.hub.card_compared(true);

        let printed = printed.borrow();
        assert!(printed.contains("score: 10"));
        assert!(printed.contains("<notifying>"));
        assert!(format!("{:?}", score).contains("observers: 2"));
    }

    #[test]
    fn test_observer_can_query_controller() {
        let f = fixture();
        let score = Rc::new(f.score);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let (weak, sink) = (Rc::downgrade(&score), Rc::clone(&seen));
        score.on_change(move |_| {
            if let Some(score) = weak.upgrade() {
                sink.borrow_mut().push(score.score());
            }
        });

        f.hub.card_compared(true);
        assert_eq!(*seen.borrow(), vec![10]);
    }
}
