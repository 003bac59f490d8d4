//! Shared application state for HTTP handlers and WebSocket connections.

use std::sync::Arc;

use crate::domain::EventBus;
use crate::service::CheckoutService;
use crate::store::BookingStore;

/// State shared across all requests via axum's `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Checkout and booking orchestration service.
    pub checkout: Arc<CheckoutService>,
    /// Booking and court store, used directly for reads.
    pub store: Arc<dyn BookingStore>,
    /// Broadcast bus for booking events.
    pub event_bus: EventBus,
}

impl AppState {
    /// Creates the shared state.
    #[must_use]
    pub fn new(
        checkout: Arc<CheckoutService>,
        store: Arc<dyn BookingStore>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            checkout,
            store,
            event_bus,
        }
    }
}
