//! Booking storage: the [`BookingStore`] seam and its implementations.
//!
//! The store owns the slot-uniqueness invariant. The availability check
//! is advisory (it drives the user-facing "horário indisponível" error
//! before any write); [`BookingStore::insert_pending`] re-validates the
//! slot atomically so that two concurrent checkouts for the same window
//! admit exactly one booking.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Booking, BookingId, Court, TimeSlot};
use crate::error::GatewayError;

/// Result of an availability query.
///
/// A store failure is reported through the `Result` error, never as
/// `Booked` — "could not verify" and "definitely booked" are different
/// answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotAvailability {
    /// No conflicting reservation exists.
    Free,
    /// A non-cancelled reservation overlaps the window.
    Booked,
}

/// Persistence seam for bookings and courts.
#[async_trait]
pub trait BookingStore: Send + Sync + std::fmt::Debug {
    /// Checks whether a court slot is free of conflicting reservations.
    ///
    /// Cancelled bookings never conflict.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::AvailabilityUnverified`] if the query
    /// itself fails.
    async fn slot_availability(
        &self,
        court_id: Uuid,
        slot: &TimeSlot,
    ) -> Result<SlotAvailability, GatewayError>;

    /// Inserts a pending booking, enforcing slot uniqueness atomically.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::SlotUnavailable`] if a conflicting
    /// reservation exists (or won the race), or
    /// [`GatewayError::PersistenceError`] on store failure.
    async fn insert_pending(&self, booking: Booking) -> Result<BookingId, GatewayError>;

    /// Fetches a booking by ID.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::BookingNotFound`] if no such booking exists.
    async fn get(&self, id: BookingId) -> Result<Booking, GatewayError>;

    /// Lists bookings for a customer, most recent date first.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on store failure.
    async fn list_for_customer(&self, customer_email: &str)
    -> Result<Vec<Booking>, GatewayError>;

    /// Records the processor intent reference on a still-pending booking.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::BookingNotFound`] if no such booking exists.
    async fn record_payment_intent(
        &self,
        id: BookingId,
        payment_intent_id: &str,
    ) -> Result<(), GatewayError>;

    /// Marks a booking paid and confirmed, storing the intent reference.
    /// The confirmation write — last step of a successful checkout.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::BookingNotFound`] or
    /// [`GatewayError::InvalidTransition`] for non-pending bookings.
    async fn mark_paid(
        &self,
        id: BookingId,
        payment_intent_id: &str,
    ) -> Result<Booking, GatewayError>;

    /// Marks the payment attempt definitively failed; the booking stays
    /// pending.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::BookingNotFound`] if no such booking exists.
    async fn mark_payment_failed(&self, id: BookingId) -> Result<(), GatewayError>;

    /// Cancels a pending booking with an optional reason.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::BookingNotFound`] or
    /// [`GatewayError::InvalidTransition`] for non-pending bookings.
    async fn cancel(
        &self,
        id: BookingId,
        reason: Option<String>,
    ) -> Result<Booking, GatewayError>;

    /// Cancels pending bookings created before `cutoff`, returning the
    /// cancelled IDs. Used by the pending-booking reaper.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on store failure.
    async fn cancel_stale_pending(
        &self,
        cutoff: DateTime<Utc>,
        reason: &str,
    ) -> Result<Vec<BookingId>, GatewayError>;

    /// Registers or replaces a court.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on store failure.
    async fn upsert_court(&self, court: Court) -> Result<(), GatewayError>;

    /// Fetches a court by ID.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::CourtNotFound`] if no such court exists.
    async fn get_court(&self, id: Uuid) -> Result<Court, GatewayError>;

    /// Lists all registered courts.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on store failure.
    async fn list_courts(&self) -> Result<Vec<Court>, GatewayError>;
}

pub use memory::InMemoryBookingStore;
pub use postgres::PostgresBookingStore;
