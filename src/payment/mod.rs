//! Payment layer: processor client and settlement confirmation seam.
//!
//! [`processor::PaymentProcessor`] wraps the external payment processor's
//! HTTP functions (intent creation, PIX, status, refund).
//! [`confirmer::PaymentConfirmer`] models the hosted payment sheet and
//! the platform wallet as awaitable operations returning an explicit
//! outcome variant instead of callbacks.

pub mod confirmer;
pub mod intent;
pub mod processor;

pub use confirmer::{HttpPaymentConfirmer, PaymentConfirmer, PaymentOutcome, WalletMetadata};
pub use intent::{PaymentIntent, PixPayment, PixStatus, Refund};
pub use processor::{CreateIntentRequest, HttpPaymentProcessor, PaymentProcessor};
