//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` streams booking events in real time.
//! The PIX confirmation screen subscribes to its booking and waits for
//! `booking_confirmed` instead of polling.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
