//! The delayed comparison.
//!
//! When a second card is selected, both stay revealed for a short delay
//! before the pair is resolved. The delay is a one-shot timer that runs on
//! the game's own clock: the host either feeds frame time through
//! [`ComparisonTimer::advance`], or runs its own timer and hands the
//! [`ComparisonTicket`] back when it fires.
//!
//! Every schedule or cancel bumps the timer's generation. A ticket from an
//! earlier generation is stale and never resolves, so a comparison that was
//! pending when a new round started cannot touch the new round's cards.

use std::time::Duration;

use crate::core::CardId;

/// The two cards of a scheduled comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComparisonTicket {
    pub first: CardId,
    pub second: CardId,
    generation: u64,
}

impl ComparisonTicket {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Clone, Debug)]
struct Scheduled {
    ticket: ComparisonTicket,
    remaining: Duration,
}

/// One-shot timer for the pending comparison.
#[derive(Clone, Debug, Default)]
pub struct ComparisonTimer {
    generation: u64,
    scheduled: Option<Scheduled>,
}

impl ComparisonTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a comparison, replacing any pending one.
    pub fn schedule(&mut self, first: CardId, second: CardId, delay: Duration) -> ComparisonTicket {
        self.generation += 1;
        let ticket = ComparisonTicket {
            first,
            second,
            generation: self.generation,
        };
        self.scheduled = Some(Scheduled {
            ticket,
            remaining: delay,
        });
        ticket
    }

    /// Drop the pending comparison. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.generation += 1;
        self.scheduled.take().is_some()
    }

    /// Let `dt` of game time pass. Returns the ticket if it expired.
    pub fn advance(&mut self, dt: Duration) -> Option<ComparisonTicket> {
        let scheduled = self.scheduled.as_mut()?;
        scheduled.remaining = scheduled.remaining.saturating_sub(dt);
        if scheduled.remaining.is_zero() {
            self.scheduled.take().map(|s| s.ticket)
        } else {
            None
        }
    }

    /// Claim a ticket delivered by a host timer.
    ///
    /// Succeeds only for the currently pending comparison; the timer is
    /// cleared so the same comparison cannot resolve twice.
    pub fn claim(&mut self, ticket: ComparisonTicket) -> bool {
        match &self.scheduled {
            Some(s) if s.ticket == ticket => {
                self.scheduled = None;
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.scheduled.is_some()
    }

    /// Time left before the pending comparison resolves.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.scheduled.as_ref().map(|s| s.remaining)
    }

    #[must_use]
    pub fn pending(&self) -> Option<ComparisonTicket> {
        self.scheduled.as_ref().map(|s| s.ticket)
    }
}
