//! Per-connection subscription manager.
//!
//! Tracks which booking IDs a WebSocket client is subscribed to and
//! provides server-side event filtering.

use std::collections::HashSet;

use crate::domain::BookingId;

/// Manages the set of booking subscriptions for a single WebSocket connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Subscribed booking IDs. If `subscribe_all` is true, this set is ignored.
    booking_ids: HashSet<BookingId>,
    /// Whether the client subscribes to all bookings (wildcard `"*"`).
    subscribe_all: bool,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds booking IDs to the subscription set. `"*"` enables the wildcard.
    pub fn subscribe(&mut self, ids: &[BookingId], wildcard: bool) {
        if wildcard {
            self.subscribe_all = true;
        }
        for id in ids {
            self.booking_ids.insert(*id);
        }
    }

    /// Removes booking IDs from the subscription set.
    pub fn unsubscribe(&mut self, ids: &[BookingId]) {
        for id in ids {
            self.booking_ids.remove(id);
        }
    }

    /// Returns `true` if the given booking ID matches the subscription filter.
    #[must_use]
    pub fn matches(&self, booking_id: BookingId) -> bool {
        self.subscribe_all || self.booking_ids.contains(&booking_id)
    }

    /// Returns the number of explicitly subscribed booking IDs.
    #[must_use]
    pub fn count(&self) -> usize {
        self.booking_ids.len()
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}
