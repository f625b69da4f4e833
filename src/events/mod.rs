//! Event broadcasting between the round controller and its listeners.
//!
//! ## Key Components
//!
//! - [`EventKind`]: Subscription key, one per event
//! - [`GameEvent`]: An event with its payload
//! - [`EventHub`]: Injected publish/subscribe point
//! - [`Subscription`]: Listener handle that unregisters on drop

mod event;
mod hub;

pub use event::{EventKind, GameEvent};
pub use hub::{EventHub, ListenerId, Subscription};
