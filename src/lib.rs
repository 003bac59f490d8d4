//! # quadra-gateway
//!
//! REST API and WebSocket gateway for sports-court booking checkout.
//!
//! This crate orchestrates the booking/payment flow of a court booking
//! platform: availability check, pending reservation, payment-method
//! dispatch (card, platform wallet, PIX), intent creation against an
//! external payment processor, and payment confirmation. Card collection
//! itself is delegated to the processor's hosted UI — this service is a
//! coordination layer.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── CheckoutService (service/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── BookingStore (store/, in-memory or PostgreSQL)
//!     └── PaymentProcessor (payment/, external HTTP functions)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod payment;
pub mod service;
pub mod store;
pub mod ws;
