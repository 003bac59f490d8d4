//! Court catalog DTOs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Court;

/// Request body for `POST /courts`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCourtRequest {
    /// Explicit court ID; a random one is generated when omitted.
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub id: Option<uuid::Uuid>,
    /// Display name.
    pub name: String,
    /// Hourly price in BRL.
    #[schema(value_type = String, example = "100.00")]
    pub price_per_hour: Decimal,
}

/// A court as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CourtDto {
    /// Court identifier.
    #[schema(value_type = String)]
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Hourly price, string-encoded decimal BRL.
    pub price_per_hour: String,
}

impl From<Court> for CourtDto {
    fn from(c: Court) -> Self {
        Self {
            id: c.id,
            name: c.name,
            price_per_hour: c.price_per_hour.to_string(),
        }
    }
}
