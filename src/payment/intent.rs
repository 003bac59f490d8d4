//! Processor-side payment objects as seen by the gateway.
//!
//! These are references to state owned by the external processor; the
//! gateway persists only the intent identifier against the booking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A charge intent created by the processor for card and wallet flows.
///
/// The client secret authorizes client-side confirmation and is passed
/// through to the caller; it is never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    /// Opaque token authorizing confirmation of this intent.
    pub client_secret: String,
    /// Processor-side intent identifier.
    pub payment_intent_id: String,
}

/// An asynchronous PIX bank-transfer payment reference.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PixPayment {
    /// Processor-side intent identifier.
    pub payment_intent_id: String,
    /// Copy-and-paste PIX payload.
    pub pix_code: String,
    /// QR code image, base64-encoded PNG.
    pub qr_code_base64: String,
    /// When the PIX code stops being payable (15 minutes after issue).
    pub expires_at: DateTime<Utc>,
}

/// Settlement status of a PIX payment, polled by the confirmation screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PixStatus {
    /// Awaiting the bank transfer.
    Pending,
    /// Transfer received; the processor settled the charge.
    Paid,
    /// The payment window elapsed without a transfer.
    Expired,
}

/// A refund issued against a settled payment intent.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Refund {
    /// Processor-side refund identifier.
    pub refund_id: String,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn intent_deserializes_processor_payload() {
        let json = r#"{"clientSecret":"pi_123_secret_abc","paymentIntentId":"pi_123"}"#;
        let parsed: Result<PaymentIntent, _> = serde_json::from_str(json);
        let Ok(intent) = parsed else {
            panic!("processor payload should parse");
        };
        assert_eq!(intent.payment_intent_id, "pi_123");
        assert_eq!(intent.client_secret, "pi_123_secret_abc");
    }

    #[test]
    fn pix_status_uses_snake_case() {
        let parsed: Result<PixStatus, _> = serde_json::from_str(r#""expired""#);
        assert_eq!(parsed.ok(), Some(PixStatus::Expired));
    }
}
