//! Event hub.
//!
//! The hub is an explicitly constructed publish/subscribe point. Components
//! receive a clone of it at construction instead of reaching for a global.
//! Every subscription returns a [`Subscription`] handle; dropping the handle
//! unregisters the listener, so a component that owns its handles can never
//! be called after it is torn down.
//!
//! The hub is single-threaded: the game loop drives it from one logical
//! thread, so listeners are `FnMut` closures behind `Rc<RefCell<..>>`.
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use memory_match::events::{EventHub, EventKind, GameEvent};
//!
//! let hub = EventHub::new();
//! let matches = Rc::new(Cell::new(0));
//!
//! let counter = Rc::clone(&matches);
//! let sub = hub.subscribe(EventKind::CardCompared, move |event| {
//!     if event.is_match() == Some(true) {
//!         counter.set(counter.get() + 1);
//!     }
//! });
//!
//! hub.card_compared(true);
//! hub.card_compared(false);
//! assert_eq!(matches.get(), 1);
//!
//! drop(sub);
//! hub.card_compared(true);
//! assert_eq!(matches.get(), 1);
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::event::{EventKind, GameEvent};
use crate::core::CardId;

type Listener = Rc<RefCell<dyn FnMut(&GameEvent)>>;

/// Identifier of a registered listener, unique per hub.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Entry {
    id: ListenerId,
    listener: Listener,
}

#[derive(Default)]
struct HubInner {
    next_id: u64,
    listeners: FxHashMap<EventKind, Vec<Entry>>,
}

impl HubInner {
    fn contains(&self, kind: EventKind, id: ListenerId) -> bool {
        self.listeners
            .get(&kind)
            .is_some_and(|entries| entries.iter().any(|e| e.id == id))
    }
}

/// Publish/subscribe point for [`GameEvent`]s.
///
/// Cloning a hub yields another handle to the same listener table.
#[derive(Clone, Default)]
pub struct EventHub {
    inner: Rc<RefCell<HubInner>>,
}

impl EventHub {
    /// Create an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for one event kind.
    ///
    /// The listener stays registered until the returned handle is dropped
    /// or [`Subscription::unsubscribe`] is called.
    #[must_use = "dropping the subscription unregisters the listener"]
    pub fn subscribe<F>(&self, kind: EventKind, listener: F) -> Subscription
    where
        F: FnMut(&GameEvent) + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = ListenerId(inner.next_id);
        inner.next_id += 1;

        let listener: Listener = Rc::new(RefCell::new(listener));
        inner
            .listeners
            .entry(kind)
            .or_default()
            .push(Entry { id, listener });

        log::trace!("Listener {:?} subscribed to {}", id, kind);

        Subscription {
            hub: Rc::downgrade(&self.inner),
            kind,
            id,
        }
    }

    /// Broadcast an event to every listener of its kind.
    ///
    /// Listeners run in subscription order. Listeners may subscribe or
    /// unsubscribe while the event is being delivered; a listener removed
    /// mid-dispatch is not called. A listener that fires an event which
    /// reaches itself is skipped for the nested delivery.
    pub fn fire(&self, event: &GameEvent) {
        let kind = event.kind();
        let snapshot: SmallVec<[(ListenerId, Listener); 4]> = {
            let inner = self.inner.borrow();
            match inner.listeners.get(&kind) {
                Some(entries) => entries
                    .iter()
                    .map(|e| (e.id, Rc::clone(&e.listener)))
                    .collect(),
                None => return,
            }
        };

        for (id, listener) in snapshot {
            if !self.inner.borrow().contains(kind, id) {
                continue;
            }
            match listener.try_borrow_mut() {
                Ok(mut callback) => (&mut *callback)(event),
                Err(_) => log::warn!("Listener {:?} re-entered by nested {} event, skipped", id, kind),
            }
        }
    }

    pub fn card_selected(&self, card: CardId) {
        self.fire(&GameEvent::CardSelected(card));
    }

    pub fn card_compared(&self, is_match: bool) {
        self.fire(&GameEvent::CardCompared { is_match });
    }

    pub fn game_over(&self) {
        self.fire(&GameEvent::GameOver);
    }

    pub fn game_loaded(&self) {
        self.fire(&GameEvent::GameLoaded);
    }

    pub fn game_started(&self) {
        self.fire(&GameEvent::GameStarted);
    }

    /// Number of listeners registered for a kind.
    #[must_use]
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.inner
            .borrow()
            .listeners
            .get(&kind)
            .map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for EventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        let mut map = f.debug_map();
        for kind in EventKind::ALL {
            let count = inner.listeners.get(&kind).map_or(0, Vec::len);
            map.entry(&kind, &count);
        }
        map.finish()
    }
}

fn remove_listener(hub: &Rc<RefCell<HubInner>>, kind: EventKind, id: ListenerId) -> bool {
    // The removed entry is dropped after the borrow ends: its closure may own
    // other subscriptions whose drop re-enters the hub.
    let removed = {
        let mut inner = hub.borrow_mut();
        inner.listeners.get_mut(&kind).and_then(|entries| {
            entries
                .iter()
                .position(|e| e.id == id)
                .map(|pos| entries.remove(pos))
        })
    };
    removed.is_some()
}

/// Handle to a registered listener. Unregisters on drop.
#[must_use = "dropping the subscription unregisters the listener"]
pub struct Subscription {
    hub: Weak<RefCell<HubInner>>,
    kind: EventKind,
    id: ListenerId,
}

impl Subscription {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    #[must_use]
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Is the listener still registered with a live hub?
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.hub
            .upgrade()
            .is_some_and(|hub| hub.borrow().contains(self.kind, self.id))
    }

    /// Unregister now instead of on drop.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            if remove_listener(&hub, self.kind, self.id) {
                log::trace!("Listener {:?} unsubscribed from {}", self.id, self.kind);
            }
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .finish()
    }
}
