//! Settlement confirmation seam for card and wallet payments.
//!
//! The original client confirmed payments through SDK callbacks and
//! compared error-code strings to detect user cancellation. Here the
//! hosted payment sheet and the platform wallet are modeled as one
//! awaitable operation returning [`PaymentOutcome`]: completed,
//! cancelled by the user, or failed with the processor's message.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::PaymentMethod;
use crate::error::GatewayError;

/// Result of awaiting a payment confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// The processor captured the charge.
    Completed,
    /// The customer dismissed the sheet. A no-op, not an error.
    Cancelled,
    /// The charge failed; carries the processor's message verbatim.
    Failed(String),
}

/// Merchant metadata sent with platform wallet confirmations.
///
/// Country and currency are fixed for this product: Brazilian courts,
/// charged in BRL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletMetadata {
    /// Merchant display name on the wallet sheet.
    pub merchant_name: String,
    /// Two-letter country code, always `"BR"`.
    pub country_code: String,
    /// ISO currency code, always `"BRL"`.
    pub currency_code: String,
    /// Single cart line shown on the sheet, e.g. the court name.
    pub cart_label: String,
    /// Total in minor units (centavos).
    pub total_minor: i64,
}

impl WalletMetadata {
    /// Builds BR/BRL wallet metadata for a single cart line.
    #[must_use]
    pub fn brl(merchant_name: &str, cart_label: &str, total_minor: i64) -> Self {
        Self {
            merchant_name: merchant_name.to_string(),
            country_code: "BR".to_string(),
            currency_code: "BRL".to_string(),
            cart_label: cart_label.to_string(),
            total_minor,
        }
    }
}

/// Awaitable confirmation of a created payment intent.
#[async_trait]
pub trait PaymentConfirmer: Send + Sync + std::fmt::Debug {
    /// Presents the hosted payment sheet for a card payment and awaits
    /// the customer's completion, cancellation, or failure.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ProcessorError`] only when the confirmation
    /// channel itself breaks; settlement failures are reported through
    /// [`PaymentOutcome::Failed`].
    async fn present_payment_sheet(
        &self,
        client_secret: &str,
    ) -> Result<PaymentOutcome, GatewayError>;

    /// Confirms via the platform wallet (Apple Pay / Google Pay) with
    /// merchant metadata.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ProcessorError`] only when the confirmation
    /// channel itself breaks.
    async fn confirm_platform_pay(
        &self,
        client_secret: &str,
        wallet: &PaymentMethod,
        metadata: &WalletMetadata,
    ) -> Result<PaymentOutcome, GatewayError>;
}

/// Production confirmer: relays confirmation through the processor's
/// `/payments/confirm` function and maps its status string to a
/// [`PaymentOutcome`]. The processor reports user cancellation with
/// status `"canceled"`.
#[derive(Debug, Clone)]
pub struct HttpPaymentConfirmer {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfirmRequest<'a> {
    client_secret: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    wallet: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<&'a WalletMetadata>,
}

#[derive(Debug, Deserialize)]
struct ConfirmResponse {
    status: String,
    #[serde(default)]
    error: Option<String>,
}

impl HttpPaymentConfirmer {
    /// Creates a confirmer against the processor functions at `base_url`.
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

    async fn confirm(&self, req: &ConfirmRequest<'_>) -> Result<PaymentOutcome, GatewayError> {
        let url = format!("{}/payments/confirm", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(req)
            .send()
            .await
            .map_err(|e| GatewayError::ProcessorError(e.to_string()))?;

        let body: ConfirmResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::ProcessorError(format!("malformed response: {e}")))?;

        Ok(match body.status.as_str() {
            "succeeded" => PaymentOutcome::Completed,
            "canceled" | "cancelled" => PaymentOutcome::Cancelled,
            other => PaymentOutcome::Failed(
                body.error
                    .unwrap_or_else(|| format!("payment ended with status {other}")),
            ),
        })
    }
}

#[async_trait]
impl PaymentConfirmer for HttpPaymentConfirmer {
    async fn present_payment_sheet(
        &self,
        client_secret: &str,
    ) -> Result<PaymentOutcome, GatewayError> {
        self.confirm(&ConfirmRequest {
            client_secret,
            wallet: None,
            metadata: None,
        })
        .await
    }

    async fn confirm_platform_pay(
        &self,
        client_secret: &str,
        wallet: &PaymentMethod,
        metadata: &WalletMetadata,
    ) -> Result<PaymentOutcome, GatewayError> {
        let wallet_name = match wallet {
            PaymentMethod::ApplePay => "apple_pay",
            PaymentMethod::GooglePay => "google_pay",
            PaymentMethod::Card { .. } | PaymentMethod::Pix => {
                return Err(GatewayError::Internal(
                    "platform pay confirmation requires a wallet method".to_string(),
                ));
            }
        };
        self.confirm(&ConfirmRequest {
            client_secret,
            wallet: Some(wallet_name),
            metadata: Some(metadata),
        })
        .await
    }
}
