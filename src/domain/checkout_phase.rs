//! Checkout state machine phases.
//!
//! One checkout attempt advances linearly through these phases; the
//! progress message for each phase is what the client shows while the
//! corresponding step is awaited.

use serde::Serialize;

/// Phase of a single checkout attempt.
///
/// ```text
/// idle → checking_availability → creating_booking → creating_payment_intent
///      → {confirming_card | confirming_wallet | awaiting_pix}
///      → {confirmed | failed | cancelled}
/// ```
///
/// `Cancelled` returns the attempt to idle without altering the booking;
/// `Confirmed` is reached only after the confirmation write succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutPhase {
    /// No checkout in progress.
    Idle,
    /// Querying the store for conflicting reservations.
    CheckingAvailability,
    /// Writing the pending booking row.
    CreatingBooking,
    /// Requesting a charge intent from the payment processor.
    CreatingPaymentIntent,
    /// Awaiting the hosted payment sheet.
    ConfirmingCard,
    /// Awaiting the platform wallet sheet.
    ConfirmingWallet,
    /// PIX reference issued; settlement continues out of band.
    AwaitingPix,
    /// Booking confirmed and marked paid.
    Confirmed,
    /// A step failed; the booking (if created) stays pending.
    Failed,
    /// The customer dismissed the payment sheet.
    Cancelled,
}

impl CheckoutPhase {
    /// User-facing progress message for this phase, if any.
    #[must_use]
    pub const fn status_message(&self) -> Option<&'static str> {
        match self {
            Self::CheckingAvailability => Some("Verificando disponibilidade…"),
            Self::CreatingBooking => Some("Criando reserva…"),
            Self::CreatingPaymentIntent | Self::ConfirmingCard | Self::ConfirmingWallet => {
                Some("Processando pagamento…")
            }
            Self::AwaitingPix => Some("Aguardando pagamento PIX…"),
            Self::Idle | Self::Confirmed | Self::Failed | Self::Cancelled => None,
        }
    }

    /// Returns `true` if `next` is a legal successor of this phase.
    #[must_use]
    pub fn can_transition_to(&self, next: Self) -> bool {
        // Failure is reachable from every in-flight phase.
        if matches!(
            self,
            Self::CheckingAvailability
                | Self::CreatingBooking
                | Self::CreatingPaymentIntent
                | Self::ConfirmingCard
                | Self::ConfirmingWallet
        ) && next == Self::Failed
        {
            return true;
        }

        matches!(
            (*self, next),
            (Self::Idle, Self::CheckingAvailability)
                | (Self::CheckingAvailability, Self::CreatingBooking)
                | (Self::CreatingBooking, Self::CreatingPaymentIntent)
                | (
                    Self::CreatingPaymentIntent,
                    Self::ConfirmingCard | Self::ConfirmingWallet | Self::AwaitingPix,
                )
                | (
                    Self::ConfirmingCard | Self::ConfirmingWallet,
                    Self::Confirmed | Self::Cancelled,
                )
                | (Self::Cancelled, Self::Idle)
        )
    }

    /// Returns `true` once the attempt can no longer advance.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Confirmed | Self::Failed | Self::Cancelled | Self::AwaitingPix
        )
    }
}
