//! Data Transfer Objects for REST request/response serialization.
//!
//! Money crosses the API as string-encoded decimals to avoid floating
//! point drift in clients.

pub mod booking_dto;
pub mod checkout_dto;
pub mod common_dto;
pub mod court_dto;
pub mod payment_dto;

pub use booking_dto::*;
pub use checkout_dto::*;
pub use common_dto::*;
pub use court_dto::*;
pub use payment_dto::*;
