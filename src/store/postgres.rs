//! PostgreSQL implementation of the booking store.
//!
//! The slot-uniqueness invariant is enforced by an exclusion constraint
//! on (court_id, date, time range) over non-cancelled bookings (see
//! `migrations/`); a constraint violation surfaces to the caller as
//! [`GatewayError::SlotUnavailable`], so a lost check-then-act race is
//! indistinguishable from an ordinary conflict.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::{BookingStore, SlotAvailability};
use crate::domain::{
    Booking, BookingId, BookingStatus, Court, PaymentStatus, PriceBreakdown, TimeSlot,
};
use crate::error::GatewayError;

/// PostgreSQL exclusion-violation SQLSTATE.
const EXCLUSION_VIOLATION: &str = "23P01";

/// PostgreSQL-backed [`BookingStore`] using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresBookingStore {
    pool: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    court_id: Uuid,
    customer_email: String,
    customer_name: Option<String>,
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
    subtotal: Decimal,
    service_fee: Decimal,
    discount: Decimal,
    total: Decimal,
    coupon_code: Option<String>,
    payment_method: String,
    status: String,
    payment_status: String,
    payment_intent_id: Option<String>,
    created_at: DateTime<Utc>,
    cancelled_at: Option<DateTime<Utc>>,
    cancellation_reason: Option<String>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = GatewayError;

    fn try_from(row: BookingRow) -> Result<Self, GatewayError> {
        Ok(Self {
            id: BookingId::from_uuid(row.id),
            court_id: row.court_id,
            customer_email: row.customer_email,
            customer_name: row.customer_name,
            slot: TimeSlot {
                date: row.date,
                start_time: row.start_time,
                end_time: row.end_time,
            },
            price: PriceBreakdown {
                subtotal: row.subtotal,
                service_fee: row.service_fee,
                discount: row.discount,
                total: row.total,
            },
            coupon_code: row.coupon_code,
            payment_method_label: row.payment_method,
            status: booking_status_from_str(&row.status)?,
            payment_status: payment_status_from_str(&row.payment_status)?,
            payment_intent_id: row.payment_intent_id,
            created_at: row.created_at,
            cancelled_at: row.cancelled_at,
            cancellation_reason: row.cancellation_reason,
        })
    }
}

const fn booking_status_str(status: BookingStatus) -> &'static str {
    match status {
        BookingStatus::Pending => "pending",
        BookingStatus::Confirmed => "confirmed",
        BookingStatus::Cancelled => "cancelled",
    }
}

fn booking_status_from_str(s: &str) -> Result<BookingStatus, GatewayError> {
    match s {
        "pending" => Ok(BookingStatus::Pending),
        "confirmed" => Ok(BookingStatus::Confirmed),
        "cancelled" => Ok(BookingStatus::Cancelled),
        other => Err(GatewayError::PersistenceError(format!(
            "unknown booking status: {other}"
        ))),
    }
}

fn payment_status_from_str(s: &str) -> Result<PaymentStatus, GatewayError> {
    match s {
        "pending" => Ok(PaymentStatus::Pending),
        "succeeded" => Ok(PaymentStatus::Succeeded),
        "failed" => Ok(PaymentStatus::Failed),
        other => Err(GatewayError::PersistenceError(format!(
            "unknown payment status: {other}"
        ))),
    }
}

const SELECT_BOOKING: &str = "SELECT id, court_id, customer_email, customer_name, date, \
     start_time, end_time, subtotal, service_fee, discount, total, coupon_code, \
     payment_method, status, payment_status, payment_intent_id, created_at, \
     cancelled_at, cancellation_reason FROM bookings";

impl PostgresBookingStore {
    /// Creates a new store with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn persistence(e: sqlx::Error) -> GatewayError {
        GatewayError::PersistenceError(e.to_string())
    }

    fn is_exclusion_violation(e: &sqlx::Error) -> bool {
        matches!(
            e,
            sqlx::Error::Database(db) if db.code().as_deref() == Some(EXCLUSION_VIOLATION)
        )
    }
}

#[async_trait]
impl BookingStore for PostgresBookingStore {
    async fn slot_availability(
        &self,
        court_id: Uuid,
        slot: &TimeSlot,
    ) -> Result<SlotAvailability, GatewayError> {
        let occupied = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM bookings \
             WHERE court_id = $1 AND date = $2 AND status <> 'cancelled' \
             AND start_time < $4 AND end_time > $3)",
        )
        .bind(court_id)
        .bind(slot.date)
        .bind(slot.start_time)
        .bind(slot.end_time)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| GatewayError::AvailabilityUnverified(e.to_string()))?;

        Ok(if occupied {
            SlotAvailability::Booked
        } else {
            SlotAvailability::Free
        })
    }

    async fn insert_pending(&self, booking: Booking) -> Result<BookingId, GatewayError> {
        let id = booking.id;
        sqlx::query(
            "INSERT INTO bookings (id, court_id, customer_email, customer_name, date, \
             start_time, end_time, subtotal, service_fee, discount, total, coupon_code, \
             payment_method, status, payment_status, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)",
        )
        .bind(*id.as_uuid())
        .bind(booking.court_id)
        .bind(&booking.customer_email)
        .bind(&booking.customer_name)
        .bind(booking.slot.date)
        .bind(booking.slot.start_time)
        .bind(booking.slot.end_time)
        .bind(booking.price.subtotal)
        .bind(booking.price.service_fee)
        .bind(booking.price.discount)
        .bind(booking.price.total)
        .bind(&booking.coupon_code)
        .bind(&booking.payment_method_label)
        .bind(booking_status_str(booking.status))
        .bind("pending")
        .bind(booking.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if Self::is_exclusion_violation(&e) {
                GatewayError::SlotUnavailable
            } else {
                Self::persistence(e)
            }
        })?;

        Ok(id)
    }

    async fn get(&self, id: BookingId) -> Result<Booking, GatewayError> {
        let row = sqlx::query_as::<_, BookingRow>(&format!("{SELECT_BOOKING} WHERE id = $1"))
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::persistence)?
            .ok_or(GatewayError::BookingNotFound(*id.as_uuid()))?;

        row.try_into()
    }

    async fn list_for_customer(
        &self,
        customer_email: &str,
    ) -> Result<Vec<Booking>, GatewayError> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "{SELECT_BOOKING} WHERE customer_email = $1 ORDER BY date DESC, start_time DESC"
        ))
        .bind(customer_email)
        .fetch_all(&self.pool)
        .await
        .map_err(Self::persistence)?;

        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn record_payment_intent(
        &self,
        id: BookingId,
        payment_intent_id: &str,
    ) -> Result<(), GatewayError> {
        let result = sqlx::query("UPDATE bookings SET payment_intent_id = $2 WHERE id = $1")
            .bind(*id.as_uuid())
            .bind(payment_intent_id)
            .execute(&self.pool)
            .await
            .map_err(Self::persistence)?;

        if result.rows_affected() == 0 {
            return Err(GatewayError::BookingNotFound(*id.as_uuid()));
        }
        Ok(())
    }

    async fn mark_paid(
        &self,
        id: BookingId,
        payment_intent_id: &str,
    ) -> Result<Booking, GatewayError> {
        let row = sqlx::query_as::<_, BookingRow>(
            "UPDATE bookings SET status = 'confirmed', payment_status = 'succeeded', \
             payment_intent_id = $2 \
             WHERE id = $1 AND status = 'pending' \
             RETURNING id, court_id, customer_email, customer_name, date, start_time, \
             end_time, subtotal, service_fee, discount, total, coupon_code, payment_method, \
             status, payment_status, payment_intent_id, created_at, cancelled_at, \
             cancellation_reason",
        )
        .bind(*id.as_uuid())
        .bind(payment_intent_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::persistence)?;

        match row {
            Some(row) => row.try_into(),
            // Distinguish a missing booking from an illegal transition.
            None => match self.get(id).await {
                Ok(existing) => Err(GatewayError::InvalidTransition(format!(
                    "cannot mark booking {id} paid from {:?}",
                    existing.status
                ))),
                Err(e) => Err(e),
            },
        }
    }

    async fn mark_payment_failed(&self, id: BookingId) -> Result<(), GatewayError> {
        let result = sqlx::query("UPDATE bookings SET payment_status = 'failed' WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(Self::persistence)?;

        if result.rows_affected() == 0 {
            return Err(GatewayError::BookingNotFound(*id.as_uuid()));
        }
        Ok(())
    }

    async fn cancel(
        &self,
        id: BookingId,
        reason: Option<String>,
    ) -> Result<Booking, GatewayError> {
        let row = sqlx::query_as::<_, BookingRow>(
            "UPDATE bookings SET status = 'cancelled', cancelled_at = now(), \
             cancellation_reason = $2 \
             WHERE id = $1 AND status = 'pending' \
             RETURNING id, court_id, customer_email, customer_name, date, start_time, \
             end_time, subtotal, service_fee, discount, total, coupon_code, payment_method, \
             status, payment_status, payment_intent_id, created_at, cancelled_at, \
             cancellation_reason",
        )
        .bind(*id.as_uuid())
        .bind(&reason)
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::persistence)?;

        match row {
            Some(row) => row.try_into(),
            None => match self.get(id).await {
                Ok(existing) => Err(GatewayError::InvalidTransition(format!(
                    "cannot cancel booking {id} from {:?}",
                    existing.status
                ))),
                Err(e) => Err(e),
            },
        }
    }

    async fn cancel_stale_pending(
        &self,
        cutoff: DateTime<Utc>,
        reason: &str,
    ) -> Result<Vec<BookingId>, GatewayError> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "UPDATE bookings SET status = 'cancelled', cancelled_at = now(), \
             cancellation_reason = $2 \
             WHERE status = 'pending' AND created_at < $1 \
             RETURNING id",
        )
        .bind(cutoff)
        .bind(reason)
        .fetch_all(&self.pool)
        .await
        .map_err(Self::persistence)?;

        Ok(ids.into_iter().map(BookingId::from_uuid).collect())
    }

    async fn upsert_court(&self, court: Court) -> Result<(), GatewayError> {
        sqlx::query(
            "INSERT INTO courts (id, name, price_per_hour) VALUES ($1, $2, $3) \
             ON CONFLICT (id) DO UPDATE SET name = $2, price_per_hour = $3",
        )
        .bind(court.id)
        .bind(&court.name)
        .bind(court.price_per_hour)
        .execute(&self.pool)
        .await
        .map_err(Self::persistence)?;

        Ok(())
    }

    async fn get_court(&self, id: Uuid) -> Result<Court, GatewayError> {
        let row = sqlx::query_as::<_, (Uuid, String, Decimal)>(
            "SELECT id, name, price_per_hour FROM courts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::persistence)?
        .ok_or(GatewayError::CourtNotFound(id))?;

        Ok(Court {
            id: row.0,
            name: row.1,
            price_per_hour: row.2,
        })
    }

    async fn list_courts(&self) -> Result<Vec<Court>, GatewayError> {
        let rows = sqlx::query_as::<_, (Uuid, String, Decimal)>(
            "SELECT id, name, price_per_hour FROM courts ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Self::persistence)?;

        Ok(rows
            .into_iter()
            .map(|(id, name, price_per_hour)| Court {
                id,
                name,
                price_per_hour,
            })
            .collect())
    }
}
