//! Payment processor client.
//!
//! [`PaymentProcessor`] is the seam in front of the external processor's
//! HTTP functions; [`HttpPaymentProcessor`] is the production
//! implementation. Amounts cross this boundary already converted to
//! integer minor units (centavos), currency fixed at BRL. Non-success
//! responses are propagated as [`GatewayError::ProcessorError`] with the
//! processor's own message; there are no retries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::intent::{PaymentIntent, PixPayment, PixStatus, Refund};
use crate::domain::BookingId;
use crate::error::GatewayError;

/// Parameters for creating a charge intent or PIX payment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntentRequest {
    /// Amount in minor units (centavos).
    pub amount: i64,
    /// ISO currency code, always `"brl"`.
    pub currency: String,
    /// Court the charge is for.
    pub court_id: uuid::Uuid,
    /// Booking the charge is for.
    pub booking_id: BookingId,
    /// Customer email for the processor's receipt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    /// Payer name, required for PIX.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
}

impl CreateIntentRequest {
    /// Builds a BRL intent request for the given booking and amount.
    #[must_use]
    pub fn brl(
        amount_minor: i64,
        court_id: uuid::Uuid,
        booking_id: BookingId,
        customer_email: Option<String>,
        customer_name: Option<String>,
    ) -> Self {
        Self {
            amount: amount_minor,
            currency: "brl".to_string(),
            court_id,
            booking_id,
            customer_email,
            customer_name,
        }
    }
}

/// Client for the external payment processor's backend functions.
#[async_trait]
pub trait PaymentProcessor: Send + Sync + std::fmt::Debug {
    /// Creates a charge intent for card and wallet settlement.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ProcessorError`] on any non-success
    /// processor response.
    async fn create_intent(&self, req: &CreateIntentRequest) -> Result<PaymentIntent, GatewayError>;

    /// Creates a PIX payment reference with a QR code and expiry.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ProcessorError`] on any non-success
    /// processor response.
    async fn create_pix(&self, req: &CreateIntentRequest) -> Result<PixPayment, GatewayError>;

    /// Polls the settlement status of a PIX payment.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ProcessorError`] on any non-success
    /// processor response.
    async fn pix_status(&self, payment_intent_id: &str) -> Result<PixStatus, GatewayError>;

    /// Refunds a settled intent, optionally partially.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ProcessorError`] on any non-success
    /// processor response.
    async fn refund(
        &self,
        payment_intent_id: &str,
        amount_minor: Option<i64>,
    ) -> Result<Refund, GatewayError>;
}

/// Production [`PaymentProcessor`] speaking JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpPaymentProcessor {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PixStatusResponse {
    status: PixStatus,
}

#[derive(Debug, Deserialize)]
struct ProcessorErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefundRequest<'a> {
    payment_intent_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    amount: Option<i64>,
}

impl HttpPaymentProcessor {
    /// Creates a client for the processor functions at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Internal`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(base_url: &str, timeout: std::time::Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Internal(format!("http client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn post_json<B: Serialize + ?Sized, T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, GatewayError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| GatewayError::ProcessorError(e.to_string()))?;

        Self::decode(response).await
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, GatewayError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| GatewayError::ProcessorError(e.to_string()))?;

        Self::decode(response).await
    }

    async fn decode<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<T, GatewayError> {
        let status = response.status();
        if !status.is_success() {
            // Prefer the processor's own message over the bare status.
            let message = response
                .json::<ProcessorErrorBody>()
                .await
                .ok()
                .and_then(|b| b.error.or(b.message))
                .unwrap_or_else(|| format!("processor returned {status}"));
            return Err(GatewayError::ProcessorError(message));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| GatewayError::ProcessorError(format!("malformed response: {e}")))
    }
}

#[async_trait]
impl PaymentProcessor for HttpPaymentProcessor {
    async fn create_intent(&self, req: &CreateIntentRequest) -> Result<PaymentIntent, GatewayError> {
        tracing::debug!(booking_id = %req.booking_id, amount = req.amount, "creating payment intent");
        self.post_json("/payments/create-intent", req).await
    }

    async fn create_pix(&self, req: &CreateIntentRequest) -> Result<PixPayment, GatewayError> {
        tracing::debug!(booking_id = %req.booking_id, amount = req.amount, "creating pix payment");
        self.post_json("/payments/create-pix", req).await
    }

    async fn pix_status(&self, payment_intent_id: &str) -> Result<PixStatus, GatewayError> {
        let body: PixStatusResponse = self
            .get_json(&format!("/payments/pix-status/{payment_intent_id}"))
            .await?;
        Ok(body.status)
    }

    async fn refund(
        &self,
        payment_intent_id: &str,
        amount_minor: Option<i64>,
    ) -> Result<Refund, GatewayError> {
        tracing::info!(payment_intent_id, "requesting refund");
        self.post_json(
            "/payments/refund",
            &RefundRequest {
                payment_intent_id,
                amount: amount_minor,
            },
        )
        .await
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn brl_request_serializes_camel_case() {
        let req = CreateIntentRequest::brl(
            22_000,
            uuid::Uuid::new_v4(),
            BookingId::new(),
            Some("ana@example.com".to_string()),
            None,
        );
        assert_eq!(req.currency, "brl");

        let json = serde_json::to_string(&req).unwrap_or_default();
        assert!(json.contains("\"amount\":22000"));
        assert!(json.contains("customerEmail"));
        assert!(json.contains("bookingId"));
        // Absent name is omitted entirely.
        assert!(!json.contains("customerName"));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let Ok(processor) =
            HttpPaymentProcessor::new("http://localhost:4242/", std::time::Duration::from_secs(5))
        else {
            panic!("client should build");
        };
        assert_eq!(processor.base_url, "http://localhost:4242");
    }
}
