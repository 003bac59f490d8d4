//! Payment method selected for a checkout attempt.
//!
//! Replaces the original client's string-tagged card objects with a
//! variant type that the dispatcher matches exhaustively. Card data here
//! is display-only (brand, last four digits); raw card details never
//! reach this service — collection is delegated to the processor's
//! hosted UI.

use serde::{Deserialize, Serialize};

/// How the customer chose to pay, fixed for one checkout attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Credit or debit card via the processor's hosted payment sheet.
    Card {
        /// Card brand for display (e.g. `"visa"`, `"mastercard"`).
        brand: String,
        /// Last four digits for display.
        last4: String,
    },
    /// Apple Pay via the platform wallet sheet.
    ApplePay,
    /// Google Pay via the platform wallet sheet.
    GooglePay,
    /// PIX instant bank transfer, settled asynchronously via QR code.
    Pix,
}

impl PaymentMethod {
    /// Human-readable label stored on the booking for display.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Card { brand, last4 } if !last4.is_empty() => {
                format!("{brand} •••• {last4}")
            }
            Self::Card { brand, .. } => brand.clone(),
            Self::ApplePay => "Apple Pay".to_string(),
            Self::GooglePay => "Google Pay".to_string(),
            Self::Pix => "PIX".to_string(),
        }
    }

    /// Returns `true` for the platform wallet variants.
    #[must_use]
    pub const fn is_wallet(&self) -> bool {
        matches!(self, Self::ApplePay | Self::GooglePay)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn card_label_includes_last4() {
        let method = PaymentMethod::Card {
            brand: "visa".to_string(),
            last4: "4242".to_string(),
        };
        assert_eq!(method.label(), "visa •••• 4242");
    }

    #[test]
    fn wallet_labels() {
        assert_eq!(PaymentMethod::ApplePay.label(), "Apple Pay");
        assert_eq!(PaymentMethod::GooglePay.label(), "Google Pay");
        assert!(PaymentMethod::ApplePay.is_wallet());
        assert!(!PaymentMethod::Pix.is_wallet());
    }

    #[test]
    fn serde_uses_snake_case_tag() {
        let json = serde_json::to_string(&PaymentMethod::Pix).ok();
        assert_eq!(json.as_deref(), Some(r#"{"method":"pix"}"#));

        let parsed: Result<PaymentMethod, _> =
            serde_json::from_str(r#"{"method":"card","brand":"elo","last4":"1234"}"#);
        let Ok(parsed) = parsed else {
            panic!("card variant should parse");
        };
        assert_eq!(
            parsed,
            PaymentMethod::Card {
                brand: "elo".to_string(),
                last4: "1234".to_string(),
            }
        );
    }

    #[test]
    fn apple_pay_round_trip() {
        let json = serde_json::to_string(&PaymentMethod::ApplePay).ok();
        assert_eq!(json.as_deref(), Some(r#"{"method":"apple_pay"}"#));
    }
}
