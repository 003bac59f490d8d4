//! REST endpoint handlers organized by resource.

pub mod booking;
pub mod checkout;
pub mod court;
pub mod payment;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(checkout::routes())
        .merge(booking::routes())
        .merge(payment::routes())
        .merge(court::routes())
}
