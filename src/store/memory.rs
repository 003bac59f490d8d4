//! In-memory booking store for development and tests.
//!
//! Bookings and courts live in `RwLock<HashMap<...>>` maps. The slot
//! uniqueness invariant is enforced by re-checking conflicts under the
//! same write lock that performs the insert, so the check-then-act race
//! of the availability check cannot admit two overlapping bookings.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{BookingStore, SlotAvailability};
use crate::domain::{Booking, BookingId, BookingStatus, Court, TimeSlot};
use crate::error::GatewayError;

/// In-memory [`BookingStore`] implementation.
#[derive(Debug, Default)]
pub struct InMemoryBookingStore {
    bookings: RwLock<HashMap<BookingId, Booking>>,
    courts: RwLock<HashMap<Uuid, Court>>,
}

impl InMemoryBookingStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn conflicts(bookings: &HashMap<BookingId, Booking>, court_id: Uuid, slot: &TimeSlot) -> bool {
        bookings.values().any(|b| {
            b.court_id == court_id
                && b.status != BookingStatus::Cancelled
                && b.slot.overlaps(slot)
        })
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn slot_availability(
        &self,
        court_id: Uuid,
        slot: &TimeSlot,
    ) -> Result<SlotAvailability, GatewayError> {
        let bookings = self.bookings.read().await;
        if Self::conflicts(&bookings, court_id, slot) {
            Ok(SlotAvailability::Booked)
        } else {
            Ok(SlotAvailability::Free)
        }
    }

    async fn insert_pending(&self, booking: Booking) -> Result<BookingId, GatewayError> {
        let mut bookings = self.bookings.write().await;
        // Re-check under the write lock: the advisory availability check
        // ran without it.
        if Self::conflicts(&bookings, booking.court_id, &booking.slot) {
            return Err(GatewayError::SlotUnavailable);
        }
        let id = booking.id;
        bookings.insert(id, booking);
        Ok(id)
    }

    async fn get(&self, id: BookingId) -> Result<Booking, GatewayError> {
        let bookings = self.bookings.read().await;
        bookings
            .get(&id)
            .cloned()
            .ok_or(GatewayError::BookingNotFound(*id.as_uuid()))
    }

    async fn list_for_customer(
        &self,
        customer_email: &str,
    ) -> Result<Vec<Booking>, GatewayError> {
        let bookings = self.bookings.read().await;
        let mut result: Vec<Booking> = bookings
            .values()
            .filter(|b| b.customer_email == customer_email)
            .cloned()
            .collect();
        result.sort_by(|a, b| {
            (b.slot.date, b.slot.start_time).cmp(&(a.slot.date, a.slot.start_time))
        });
        Ok(result)
    }

    async fn record_payment_intent(
        &self,
        id: BookingId,
        payment_intent_id: &str,
    ) -> Result<(), GatewayError> {
        let mut bookings = self.bookings.write().await;
        let booking = bookings
            .get_mut(&id)
            .ok_or(GatewayError::BookingNotFound(*id.as_uuid()))?;
        booking.record_payment_intent(payment_intent_id);
        Ok(())
    }

    async fn mark_paid(
        &self,
        id: BookingId,
        payment_intent_id: &str,
    ) -> Result<Booking, GatewayError> {
        let mut bookings = self.bookings.write().await;
        let booking = bookings
            .get_mut(&id)
            .ok_or(GatewayError::BookingNotFound(*id.as_uuid()))?;
        booking.mark_paid(payment_intent_id)?;
        Ok(booking.clone())
    }

    async fn mark_payment_failed(&self, id: BookingId) -> Result<(), GatewayError> {
        let mut bookings = self.bookings.write().await;
        let booking = bookings
            .get_mut(&id)
            .ok_or(GatewayError::BookingNotFound(*id.as_uuid()))?;
        booking.mark_payment_failed();
        Ok(())
    }

    async fn cancel(
        &self,
        id: BookingId,
        reason: Option<String>,
    ) -> Result<Booking, GatewayError> {
        let mut bookings = self.bookings.write().await;
        let booking = bookings
            .get_mut(&id)
            .ok_or(GatewayError::BookingNotFound(*id.as_uuid()))?;
        booking.cancel(reason)?;
        Ok(booking.clone())
    }

    async fn cancel_stale_pending(
        &self,
        cutoff: DateTime<Utc>,
        reason: &str,
    ) -> Result<Vec<BookingId>, GatewayError> {
        let mut bookings = self.bookings.write().await;
        let mut cancelled = Vec::new();
        for booking in bookings.values_mut() {
            if booking.status == BookingStatus::Pending && booking.created_at < cutoff {
                // Transition cannot fail: status was just checked.
                if booking.cancel(Some(reason.to_string())).is_ok() {
                    cancelled.push(booking.id);
                }
            }
        }
        Ok(cancelled)
    }

    async fn upsert_court(&self, court: Court) -> Result<(), GatewayError> {
        let mut courts = self.courts.write().await;
        courts.insert(court.id, court);
        Ok(())
    }

    async fn get_court(&self, id: Uuid) -> Result<Court, GatewayError> {
        let courts = self.courts.read().await;
        courts
            .get(&id)
            .cloned()
            .ok_or(GatewayError::CourtNotFound(id))
    }

    async fn list_courts(&self) -> Result<Vec<Court>, GatewayError> {
        let courts = self.courts.read().await;
        let mut result: Vec<Court> = courts.values().cloned().collect();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::booking::tests::sample_booking;
    use std::sync::Arc;

    #[tokio::test]
    async fn insert_and_get() {
        let store = InMemoryBookingStore::new();
        let booking = sample_booking();
        let id = booking.id;

        let result = store.insert_pending(booking).await;
        assert_eq!(result.ok(), Some(id));

        let fetched = store.get(id).await;
        assert!(fetched.is_ok());
    }

    #[tokio::test]
    async fn get_nonexistent_returns_error() {
        let store = InMemoryBookingStore::new();
        let result = store.get(BookingId::new()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn overlapping_insert_rejected() {
        let store = InMemoryBookingStore::new();
        let first = sample_booking();
        let court_id = first.court_id;

        let mut second = sample_booking();
        second.court_id = court_id; // same court, same 18:00–20:00 window

        assert!(store.insert_pending(first).await.is_ok());
        let result = store.insert_pending(second).await;
        assert!(matches!(result, Err(GatewayError::SlotUnavailable)));
    }

    #[tokio::test]
    async fn cancelled_booking_frees_the_slot() {
        let store = InMemoryBookingStore::new();
        let first = sample_booking();
        let court_id = first.court_id;
        let id = first.id;

        let mut second = sample_booking();
        second.court_id = court_id;

        assert!(store.insert_pending(first).await.is_ok());
        assert!(store.cancel(id, None).await.is_ok());

        let availability = store
            .slot_availability(court_id, &second.slot)
            .await;
        assert_eq!(availability.ok(), Some(SlotAvailability::Free));
        assert!(store.insert_pending(second).await.is_ok());
    }

    #[tokio::test]
    async fn concurrent_double_booking_admits_exactly_one() {
        let store = Arc::new(InMemoryBookingStore::new());
        let first = sample_booking();
        let court_id = first.court_id;
        let mut second = sample_booking();
        second.court_id = court_id;

        let s1 = Arc::clone(&store);
        let s2 = Arc::clone(&store);
        let (r1, r2) = tokio::join!(
            tokio::spawn(async move { s1.insert_pending(first).await }),
            tokio::spawn(async move { s2.insert_pending(second).await }),
        );

        let (Ok(r1), Ok(r2)) = (r1, r2) else {
            panic!("tasks should not panic");
        };
        let winners = usize::from(r1.is_ok()) + usize::from(r2.is_ok());
        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn mark_paid_persists_intent() {
        let store = InMemoryBookingStore::new();
        let booking = sample_booking();
        let id = booking.id;
        assert!(store.insert_pending(booking).await.is_ok());

        let confirmed = store.mark_paid(id, "pi_123").await;
        let Ok(confirmed) = confirmed else {
            panic!("mark_paid should succeed");
        };
        assert_eq!(confirmed.status, BookingStatus::Confirmed);
        assert_eq!(confirmed.payment_intent_id.as_deref(), Some("pi_123"));
    }

    #[tokio::test]
    async fn stale_pending_bookings_are_reaped() {
        let store = InMemoryBookingStore::new();
        let mut stale = sample_booking();
        stale.created_at = Utc::now() - chrono::Duration::minutes(45);
        let stale_id = stale.id;

        let mut fresh = sample_booking();
        // Different window so both inserts succeed.
        fresh.slot.date = fresh
            .slot
            .date
            .succ_opt()
            .unwrap_or(fresh.slot.date);
        let fresh_id = fresh.id;

        assert!(store.insert_pending(stale).await.is_ok());
        assert!(store.insert_pending(fresh).await.is_ok());

        let cutoff = Utc::now() - chrono::Duration::minutes(30);
        let reaped = store
            .cancel_stale_pending(cutoff, "janela de pagamento expirada")
            .await;
        let Ok(reaped) = reaped else {
            panic!("reap should succeed");
        };
        assert_eq!(reaped, vec![stale_id]);

        let Ok(fresh) = store.get(fresh_id).await else {
            panic!("fresh booking should remain");
        };
        assert_eq!(fresh.status, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn confirmed_bookings_survive_the_reaper() {
        let store = InMemoryBookingStore::new();
        let mut booking = sample_booking();
        booking.created_at = Utc::now() - chrono::Duration::minutes(45);
        let id = booking.id;
        assert!(store.insert_pending(booking).await.is_ok());
        assert!(store.mark_paid(id, "pi_123").await.is_ok());

        let cutoff = Utc::now() - chrono::Duration::minutes(30);
        let Ok(reaped) = store.cancel_stale_pending(cutoff, "expired").await else {
            panic!("reap should succeed");
        };
        assert!(reaped.is_empty());
    }

    #[tokio::test]
    async fn court_upsert_and_list() {
        let store = InMemoryBookingStore::new();
        let court = Court {
            id: Uuid::new_v4(),
            name: "Arena Norte".to_string(),
            price_per_hour: rust_decimal::Decimal::ONE_HUNDRED,
        };
        assert!(store.upsert_court(court.clone()).await.is_ok());

        let Ok(fetched) = store.get_court(court.id).await else {
            panic!("court should exist");
        };
        assert_eq!(fetched.name, "Arena Norte");

        let Ok(all) = store.list_courts().await else {
            panic!("list should succeed");
        };
        assert_eq!(all.len(), 1);
    }
}
