//! Business logic services.
//!
//! [`checkout::CheckoutService`] orchestrates the checkout flow from
//! availability check to confirmation, and [`reaper`] hosts the
//! background task that cancels abandoned pending bookings.

pub mod checkout;
pub mod reaper;

pub use checkout::{CheckoutOutcome, CheckoutRequest, CheckoutService};
