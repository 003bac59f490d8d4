//! Type-safe booking identifier.
//!
//! [`BookingId`] is a newtype wrapper around [`uuid::Uuid`] (v4) providing
//! type safety so that booking identifiers cannot be confused with court
//! or payment-intent identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a booking.
///
/// Wraps a UUID v4. Generated once when the pending booking is created
/// and immutable thereafter. Used as the store key, event discriminator,
/// and WebSocket subscription target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(transparent)]
#[schema(value_type = String)]
pub struct BookingId(uuid::Uuid);

impl BookingId {
    /// Creates a new random `BookingId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Creates a `BookingId` from an existing [`uuid::Uuid`].
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner [`uuid::Uuid`].
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<uuid::Uuid> for BookingId {
    fn from(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}

impl From<BookingId> for uuid::Uuid {
    fn from(id: BookingId) -> Self {
        id.0
    }
}
