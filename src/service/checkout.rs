//! Checkout orchestration.
//!
//! One checkout attempt runs the sequence: validate the selected payment
//! method, price the slot, check availability, write a pending booking,
//! create the charge on the processor, await settlement, and mark the
//! booking paid. The pending booking is written BEFORE any processor
//! call so that a crash mid-payment leaves a reapable pending record
//! rather than an untracked charge.
//!
//! Settlement is method-specific: cards confirm through the hosted
//! payment sheet, wallets through the platform pay sheet, and PIX
//! returns immediately with a QR code — its confirmation arrives later
//! via status polling or the event stream.

use std::future::Future;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{
    Booking, BookingEvent, BookingId, BookingStatus, CheckoutPhase, EventBus, PaymentMethod,
    PaymentStatus, PriceBreakdown, TimeSlot,
};
use crate::error::GatewayError;
use crate::payment::{
    CreateIntentRequest, PaymentConfirmer, PaymentOutcome, PaymentProcessor, PixStatus, Refund,
    WalletMetadata,
};
use crate::store::{BookingStore, SlotAvailability};

/// Merchant name shown on platform wallet sheets.
const MERCHANT_NAME: &str = "Quadra";

/// Advances the checkout phase, logging the user-facing progress message.
fn advance(phase: &mut CheckoutPhase, next: CheckoutPhase) {
    debug_assert!(phase.can_transition_to(next), "{phase:?} -> {next:?}");
    if let Some(message) = next.status_message() {
        tracing::debug!(phase = ?next, "{message}");
    }
    *phase = next;
}

/// Parameters of one checkout attempt.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    /// Court to reserve.
    pub court_id: Uuid,
    /// Customer email, forwarded to the processor for the receipt.
    pub customer_email: String,
    /// Customer display name, required by the processor for PIX.
    pub customer_name: Option<String>,
    /// Reservation date.
    pub date: NaiveDate,
    /// Reservation start time.
    pub start_time: NaiveTime,
    /// Whole-hour duration.
    pub duration_hours: u32,
    /// Selected payment method. `None` is rejected before any side
    /// effect with [`GatewayError::PaymentMethodRequired`].
    pub payment_method: Option<PaymentMethod>,
    /// Coupon code applied, display-only.
    pub coupon_code: Option<String>,
    /// Discount amount already resolved from the coupon, in BRL.
    pub discount: Decimal,
}

/// How a checkout attempt ended (errors aside).
#[derive(Debug, Clone)]
pub enum CheckoutOutcome {
    /// Payment settled; the booking is confirmed.
    Confirmed {
        /// The confirmed booking.
        booking: Booking,
    },
    /// A PIX code was issued; settlement happens out of band.
    AwaitingPix {
        /// The still-pending booking.
        booking: Booking,
        /// PIX payment reference with QR code and expiry.
        pix: crate::payment::PixPayment,
    },
    /// The customer dismissed the payment sheet. Not an error; the
    /// booking stays pending until retried, cancelled, or reaped.
    Cancelled {
        /// ID of the still-pending booking.
        booking_id: BookingId,
    },
}

/// Orchestrates checkout, booking management, and payment operations.
#[derive(Debug, Clone)]
pub struct CheckoutService {
    store: Arc<dyn BookingStore>,
    processor: Arc<dyn PaymentProcessor>,
    confirmer: Arc<dyn PaymentConfirmer>,
    event_bus: EventBus,
    pix_expiry_mins: i64,
}

impl CheckoutService {
    /// Creates the service over its store, processor, and confirmer seams.
    #[must_use]
    pub fn new(
        store: Arc<dyn BookingStore>,
        processor: Arc<dyn PaymentProcessor>,
        confirmer: Arc<dyn PaymentConfirmer>,
        event_bus: EventBus,
        pix_expiry_mins: i64,
    ) -> Self {
        Self {
            store,
            processor,
            confirmer,
            event_bus,
            pix_expiry_mins,
        }
    }

    /// Runs one checkout attempt end to end.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::PaymentMethodRequired`] when no method was
    ///   selected; nothing has been written or charged.
    /// - [`GatewayError::SlotUnavailable`] when the window conflicts
    ///   with an existing booking.
    /// - [`GatewayError::AvailabilityUnverified`] when the availability
    ///   check itself failed; the client may retry.
    /// - [`GatewayError::PaymentFailed`] when settlement definitively
    ///   failed; the booking stays pending with `payment_status: failed`.
    /// - [`GatewayError::ProcessorError`] when a processor call failed
    ///   before settlement started.
    pub async fn checkout(&self, req: CheckoutRequest) -> Result<CheckoutOutcome, GatewayError> {
        // No side effects before a payment method is selected.
        let method = req
            .payment_method
            .clone()
            .ok_or(GatewayError::PaymentMethodRequired)?;

        let mut phase = CheckoutPhase::Idle;

        let court = self.store.get_court(req.court_id).await?;
        let slot = TimeSlot::from_duration(req.date, req.start_time, req.duration_hours)?;
        let price = PriceBreakdown::compute(court.price_per_hour, slot.duration_hours(), req.discount)?;

        advance(&mut phase, CheckoutPhase::CheckingAvailability);
        if self.store.slot_availability(court.id, &slot).await? == SlotAvailability::Booked {
            return Err(GatewayError::SlotUnavailable);
        }

        advance(&mut phase, CheckoutPhase::CreatingBooking);
        let booking = Booking::pending(
            court.id,
            req.customer_email.clone(),
            req.customer_name.clone(),
            slot,
            price,
            req.coupon_code.clone(),
            method.label(),
        );
        let booking_id = self.store.insert_pending(booking.clone()).await?;
        tracing::info!(%booking_id, court = %court.name, slot = %slot, "pending booking created");
        self.event_bus.publish(BookingEvent::BookingCreated {
            booking_id,
            court_id: court.id,
            slot: slot.to_string(),
            total: price.total.to_string(),
            payment_method: method.label(),
            timestamp: Utc::now(),
        });

        advance(&mut phase, CheckoutPhase::CreatingPaymentIntent);
        let amount_minor = price.total_minor_units()?;
        let intent_req = CreateIntentRequest::brl(
            amount_minor,
            court.id,
            booking_id,
            Some(req.customer_email.clone()),
            req.customer_name.clone(),
        );

        match method {
            PaymentMethod::Pix => {
                let pix = self.checked(booking_id, self.processor.create_pix(&intent_req)).await?;
                self.store
                    .record_payment_intent(booking_id, &pix.payment_intent_id)
                    .await?;
                self.event_bus.publish(BookingEvent::PixPaymentCreated {
                    booking_id,
                    payment_intent_id: pix.payment_intent_id.clone(),
                    expires_at: pix.expires_at,
                    timestamp: Utc::now(),
                });
                advance(&mut phase, CheckoutPhase::AwaitingPix);
                let booking = self.store.get(booking_id).await?;
                Ok(CheckoutOutcome::AwaitingPix { booking, pix })
            }
            PaymentMethod::Card { .. } => {
                let intent = self
                    .checked(booking_id, self.processor.create_intent(&intent_req))
                    .await?;
                self.store
                    .record_payment_intent(booking_id, &intent.payment_intent_id)
                    .await?;
                self.event_bus.publish(BookingEvent::PaymentIntentCreated {
                    booking_id,
                    payment_intent_id: intent.payment_intent_id.clone(),
                    amount_minor,
                    timestamp: Utc::now(),
                });
                advance(&mut phase, CheckoutPhase::ConfirmingCard);
                let outcome = self
                    .checked(
                        booking_id,
                        self.confirmer.present_payment_sheet(&intent.client_secret),
                    )
                    .await?;
                self.settle(&mut phase, booking_id, &intent.payment_intent_id, outcome)
                    .await
            }
            wallet @ (PaymentMethod::ApplePay | PaymentMethod::GooglePay) => {
                let intent = self
                    .checked(booking_id, self.processor.create_intent(&intent_req))
                    .await?;
                self.store
                    .record_payment_intent(booking_id, &intent.payment_intent_id)
                    .await?;
                self.event_bus.publish(BookingEvent::PaymentIntentCreated {
                    booking_id,
                    payment_intent_id: intent.payment_intent_id.clone(),
                    amount_minor,
                    timestamp: Utc::now(),
                });
                let metadata = WalletMetadata::brl(
                    MERCHANT_NAME,
                    &format!("{} — {slot}", court.name),
                    amount_minor,
                );
                advance(&mut phase, CheckoutPhase::ConfirmingWallet);
                let outcome = self
                    .checked(
                        booking_id,
                        self.confirmer
                            .confirm_platform_pay(&intent.client_secret, &wallet, &metadata),
                    )
                    .await?;
                self.settle(&mut phase, booking_id, &intent.payment_intent_id, outcome)
                    .await
            }
        }
    }

    /// Awaits a fallible checkout step, emitting `checkout_failed` on
    /// error before propagating it.
    async fn checked<T>(
        &self,
        booking_id: BookingId,
        step: impl Future<Output = Result<T, GatewayError>> + Send,
    ) -> Result<T, GatewayError> {
        match step.await {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(%booking_id, error = %e, "checkout step failed");
                self.event_bus.publish(BookingEvent::CheckoutFailed {
                    booking_id,
                    reason: e.to_string(),
                    timestamp: Utc::now(),
                });
                Err(e)
            }
        }
    }

    /// Translates a settlement outcome into booking state.
    async fn settle(
        &self,
        phase: &mut CheckoutPhase,
        booking_id: BookingId,
        payment_intent_id: &str,
        outcome: PaymentOutcome,
    ) -> Result<CheckoutOutcome, GatewayError> {
        match outcome {
            PaymentOutcome::Completed => {
                let booking = self.store.mark_paid(booking_id, payment_intent_id).await?;
                advance(phase, CheckoutPhase::Confirmed);
                tracing::info!(%booking_id, payment_intent_id, "booking confirmed");
                self.event_bus.publish(BookingEvent::BookingConfirmed {
                    booking_id,
                    payment_intent_id: payment_intent_id.to_string(),
                    timestamp: Utc::now(),
                });
                Ok(CheckoutOutcome::Confirmed { booking })
            }
            PaymentOutcome::Cancelled => {
                // Customer dismissed the sheet. Not an error; the booking
                // stays pending and the reaper frees the slot if the
                // customer never returns.
                advance(phase, CheckoutPhase::Cancelled);
                tracing::info!(%booking_id, "checkout cancelled by customer");
                self.event_bus.publish(BookingEvent::CheckoutCancelled {
                    booking_id,
                    timestamp: Utc::now(),
                });
                Ok(CheckoutOutcome::Cancelled { booking_id })
            }
            PaymentOutcome::Failed(reason) => {
                advance(phase, CheckoutPhase::Failed);
                self.store.mark_payment_failed(booking_id).await?;
                tracing::warn!(%booking_id, %reason, "payment failed");
                self.event_bus.publish(BookingEvent::CheckoutFailed {
                    booking_id,
                    reason: reason.clone(),
                    timestamp: Utc::now(),
                });
                Err(GatewayError::PaymentFailed(reason))
            }
        }
    }

    /// Polls the settlement status of a PIX booking.
    ///
    /// Pending bookings past the PIX payment window report
    /// [`PixStatus::Expired`] without a processor round trip. A `paid`
    /// answer confirms a pending booking as a side effect; a `paid`
    /// answer for a cancelled booking is logged for reconciliation and
    /// never re-confirms it.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::BookingNotFound`] for unknown bookings,
    /// [`GatewayError::InvalidRequest`] when the booking has no payment
    /// intent, or [`GatewayError::ProcessorError`] on processor failure.
    pub async fn pix_status(&self, booking_id: BookingId) -> Result<PixStatus, GatewayError> {
        let booking = self.store.get(booking_id).await?;
        if booking.status == BookingStatus::Confirmed {
            return Ok(PixStatus::Paid);
        }
        let intent_id = booking.payment_intent_id.clone().ok_or_else(|| {
            GatewayError::InvalidRequest(format!("booking {booking_id} has no payment intent"))
        })?;

        // Cancelled bookings skip the expiry short-circuit: the customer
        // may have paid just before the cancellation landed, and that
        // mismatch must surface.
        let age = Utc::now() - booking.created_at;
        if booking.status != BookingStatus::Cancelled
            && age > chrono::Duration::minutes(self.pix_expiry_mins)
        {
            return Ok(PixStatus::Expired);
        }

        let status = self.processor.pix_status(&intent_id).await?;
        if status == PixStatus::Paid {
            match booking.status {
                BookingStatus::Pending => {
                    self.store.mark_paid(booking_id, &intent_id).await?;
                    self.event_bus.publish(BookingEvent::BookingConfirmed {
                        booking_id,
                        payment_intent_id: intent_id,
                        timestamp: Utc::now(),
                    });
                }
                BookingStatus::Cancelled => {
                    tracing::error!(
                        %booking_id,
                        payment_intent_id = %intent_id,
                        "pix settled for a cancelled booking, manual refund required"
                    );
                }
                BookingStatus::Confirmed => {}
            }
        }
        Ok(status)
    }

    /// Cancels a pending booking on the customer's request.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::BookingNotFound`] or
    /// [`GatewayError::InvalidTransition`] for non-pending bookings.
    pub async fn cancel_booking(
        &self,
        booking_id: BookingId,
        reason: Option<String>,
    ) -> Result<Booking, GatewayError> {
        let booking = self.store.cancel(booking_id, reason.clone()).await?;
        tracing::info!(%booking_id, "booking cancelled");
        self.event_bus.publish(BookingEvent::BookingCancelled {
            booking_id,
            reason,
            timestamp: Utc::now(),
        });
        Ok(booking)
    }

    /// Refunds a settled booking, fully or partially.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidTransition`] unless the booking's
    /// payment has succeeded, or [`GatewayError::ProcessorError`] if the
    /// processor rejects the refund.
    pub async fn refund(
        &self,
        booking_id: BookingId,
        amount_minor: Option<i64>,
    ) -> Result<Refund, GatewayError> {
        let booking = self.store.get(booking_id).await?;
        if booking.payment_status != PaymentStatus::Succeeded {
            return Err(GatewayError::InvalidTransition(format!(
                "booking {booking_id} has no settled payment to refund"
            )));
        }
        let intent_id = booking.payment_intent_id.ok_or_else(|| {
            GatewayError::Internal(format!("settled booking {booking_id} lacks an intent id"))
        })?;
        let refund = self.processor.refund(&intent_id, amount_minor).await?;
        tracing::info!(%booking_id, refund_id = %refund.refund_id, "refund issued");
        Ok(refund)
    }

    /// Cancels pending bookings older than `max_age_mins`, publishing a
    /// cancellation event per booking. Called by the reaper task.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on store failure.
    pub async fn reap_stale_pending(
        &self,
        max_age_mins: i64,
    ) -> Result<Vec<BookingId>, GatewayError> {
        let cutoff = Utc::now() - chrono::Duration::minutes(max_age_mins);
        let reason = "janela de pagamento expirada";
        let reaped = self.store.cancel_stale_pending(cutoff, reason).await?;
        for &booking_id in &reaped {
            self.event_bus.publish(BookingEvent::BookingCancelled {
                booking_id,
                reason: Some(reason.to_string()),
                timestamp: Utc::now(),
            });
        }
        Ok(reaped)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::Court;
    use crate::payment::{PaymentIntent, PixPayment};
    use crate::store::InMemoryBookingStore;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct FakeProcessor {
        intent_calls: AtomicUsize,
        pix_calls: AtomicUsize,
        poll_calls: AtomicUsize,
        fail_create: bool,
        pix_poll_status: Mutex<PixStatus>,
    }

    impl Default for FakeProcessor {
        fn default() -> Self {
            Self::polling(PixStatus::Pending)
        }
    }

    impl FakeProcessor {
        fn polling(status: PixStatus) -> Self {
            Self {
                intent_calls: AtomicUsize::new(0),
                pix_calls: AtomicUsize::new(0),
                poll_calls: AtomicUsize::new(0),
                fail_create: false,
                pix_poll_status: Mutex::new(status),
            }
        }

        fn total_calls(&self) -> usize {
            self.intent_calls.load(Ordering::SeqCst) + self.pix_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PaymentProcessor for FakeProcessor {
        async fn create_intent(
            &self,
            req: &CreateIntentRequest,
        ) -> Result<PaymentIntent, GatewayError> {
            self.intent_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_create {
                return Err(GatewayError::ProcessorError("boom".to_string()));
            }
            Ok(PaymentIntent {
                client_secret: format!("secret_{}", req.booking_id),
                payment_intent_id: "pi_123".to_string(),
            })
        }

        async fn create_pix(
            &self,
            _req: &CreateIntentRequest,
        ) -> Result<PixPayment, GatewayError> {
            self.pix_calls.fetch_add(1, Ordering::SeqCst);
            Ok(PixPayment {
                payment_intent_id: "pi_pix_123".to_string(),
                pix_code: "00020126BR.GOV.BCB.PIX".to_string(),
                qr_code_base64: "aGVsbG8=".to_string(),
                expires_at: Utc::now() + chrono::Duration::minutes(15),
            })
        }

        async fn pix_status(&self, _id: &str) -> Result<PixStatus, GatewayError> {
            self.poll_calls.fetch_add(1, Ordering::SeqCst);
            let Ok(status) = self.pix_poll_status.lock() else {
                panic!("poisoned");
            };
            Ok(*status)
        }

        async fn refund(
            &self,
            _id: &str,
            _amount: Option<i64>,
        ) -> Result<Refund, GatewayError> {
            Ok(Refund {
                refund_id: "re_123".to_string(),
            })
        }
    }

    #[derive(Debug)]
    struct FakeConfirmer {
        outcome: PaymentOutcome,
        sheet_calls: AtomicUsize,
        wallet_calls: AtomicUsize,
    }

    impl FakeConfirmer {
        fn completing() -> Self {
            Self::with(PaymentOutcome::Completed)
        }

        fn with(outcome: PaymentOutcome) -> Self {
            Self {
                outcome,
                sheet_calls: AtomicUsize::new(0),
                wallet_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PaymentConfirmer for FakeConfirmer {
        async fn present_payment_sheet(
            &self,
            _client_secret: &str,
        ) -> Result<PaymentOutcome, GatewayError> {
            self.sheet_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.outcome.clone())
        }

        async fn confirm_platform_pay(
            &self,
            _client_secret: &str,
            _wallet: &PaymentMethod,
            metadata: &WalletMetadata,
        ) -> Result<PaymentOutcome, GatewayError> {
            assert_eq!(metadata.country_code, "BR");
            assert_eq!(metadata.currency_code, "BRL");
            self.wallet_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.outcome.clone())
        }
    }

    struct Harness {
        service: CheckoutService,
        store: Arc<InMemoryBookingStore>,
        processor: Arc<FakeProcessor>,
        confirmer: Arc<FakeConfirmer>,
        court_id: Uuid,
    }

    async fn harness(processor: FakeProcessor, confirmer: FakeConfirmer) -> Harness {
        let store = Arc::new(InMemoryBookingStore::new());
        let court_id = Uuid::new_v4();
        let court = Court {
            id: court_id,
            name: "Arena Norte".to_string(),
            price_per_hour: Decimal::ONE_HUNDRED,
        };
        let Ok(()) = store.upsert_court(court).await else {
            panic!("court setup");
        };
        let processor = Arc::new(processor);
        let confirmer = Arc::new(confirmer);
        let service = CheckoutService::new(
            Arc::clone(&store) as Arc<dyn BookingStore>,
            Arc::clone(&processor) as Arc<dyn PaymentProcessor>,
            Arc::clone(&confirmer) as Arc<dyn PaymentConfirmer>,
            EventBus::new(100),
            15,
        );
        Harness {
            service,
            store,
            processor,
            confirmer,
            court_id,
        }
    }

    fn card_request(court_id: Uuid) -> CheckoutRequest {
        let Some(date) = NaiveDate::from_ymd_opt(2026, 9, 1) else {
            panic!("valid date");
        };
        let Some(start_time) = NaiveTime::from_hms_opt(18, 0, 0) else {
            panic!("valid time");
        };
        CheckoutRequest {
            court_id,
            customer_email: "ana@example.com".to_string(),
            customer_name: Some("Ana".to_string()),
            date,
            start_time,
            duration_hours: 2,
            payment_method: Some(PaymentMethod::Card {
                brand: "visa".to_string(),
                last4: "4242".to_string(),
            }),
            coupon_code: None,
            discount: Decimal::ZERO,
        }
    }

    #[tokio::test]
    async fn missing_payment_method_is_rejected_before_any_side_effect() {
        let h = harness(FakeProcessor::default(), FakeConfirmer::completing()).await;
        let mut req = card_request(h.court_id);
        req.payment_method = None;

        let result = h.service.checkout(req).await;
        assert!(matches!(result, Err(GatewayError::PaymentMethodRequired)));
        assert_eq!(h.processor.total_calls(), 0);
        let Ok(bookings) = h.store.list_for_customer("ana@example.com").await else {
            panic!("list should succeed");
        };
        assert!(bookings.is_empty());
    }

    #[tokio::test]
    async fn card_checkout_confirms_booking() {
        let h = harness(FakeProcessor::default(), FakeConfirmer::completing()).await;
        let mut events = h.service.event_bus.subscribe();

        let result = h.service.checkout(card_request(h.court_id)).await;
        let Ok(CheckoutOutcome::Confirmed { booking }) = result else {
            panic!("checkout should confirm: {result:?}");
        };
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.payment_status, PaymentStatus::Succeeded);
        assert_eq!(booking.payment_intent_id.as_deref(), Some("pi_123"));
        assert_eq!(booking.price.total.to_string(), "220.00");
        assert_eq!(h.confirmer.sheet_calls.load(Ordering::SeqCst), 1);

        // created → intent → confirmed, in order.
        let mut types = Vec::new();
        while let Ok(event) = events.try_recv() {
            types.push(event.event_type_str());
        }
        assert_eq!(
            types,
            vec!["booking_created", "payment_intent_created", "booking_confirmed"]
        );
    }

    #[tokio::test]
    async fn wallet_checkout_uses_platform_pay() {
        let h = harness(FakeProcessor::default(), FakeConfirmer::completing()).await;
        let mut req = card_request(h.court_id);
        req.payment_method = Some(PaymentMethod::ApplePay);

        let result = h.service.checkout(req).await;
        assert!(matches!(result, Ok(CheckoutOutcome::Confirmed { .. })));
        assert_eq!(h.confirmer.wallet_calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.confirmer.sheet_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn occupied_slot_fails_before_payment() {
        let h = harness(FakeProcessor::default(), FakeConfirmer::completing()).await;
        let first = h.service.checkout(card_request(h.court_id)).await;
        assert!(first.is_ok());
        let calls_after_first = h.processor.total_calls();

        let second = h.service.checkout(card_request(h.court_id)).await;
        assert!(matches!(second, Err(GatewayError::SlotUnavailable)));
        assert_eq!(h.processor.total_calls(), calls_after_first);
    }

    #[tokio::test]
    async fn customer_cancel_leaves_booking_pending() {
        let h = harness(
            FakeProcessor::default(),
            FakeConfirmer::with(PaymentOutcome::Cancelled),
        )
        .await;

        let result = h.service.checkout(card_request(h.court_id)).await;
        let Ok(CheckoutOutcome::Cancelled { booking_id }) = result else {
            panic!("cancel should not be an error: {result:?}");
        };
        let Ok(booking) = h.store.get(booking_id).await else {
            panic!("booking should exist");
        };
        assert_eq!(booking.status, BookingStatus::Pending);

        // The pending booking still holds the slot until the reaper
        // frees it.
        let retry = h.service.checkout(card_request(h.court_id)).await;
        assert!(matches!(retry, Err(GatewayError::SlotUnavailable)));
    }

    #[tokio::test]
    async fn declined_payment_keeps_booking_pending() {
        let h = harness(
            FakeProcessor::default(),
            FakeConfirmer::with(PaymentOutcome::Failed("cartão recusado".to_string())),
        )
        .await;
        let mut events = h.service.event_bus.subscribe();

        let result = h.service.checkout(card_request(h.court_id)).await;
        let Err(GatewayError::PaymentFailed(reason)) = result else {
            panic!("decline should fail the checkout: {result:?}");
        };
        assert_eq!(reason, "cartão recusado");

        let Ok(bookings) = h.store.list_for_customer("ana@example.com").await else {
            panic!("list should succeed");
        };
        assert_eq!(bookings.len(), 1);
        let Some(booking) = bookings.first() else {
            panic!("booking should exist");
        };
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.payment_status, PaymentStatus::Failed);

        let mut saw_failure = false;
        while let Ok(event) = events.try_recv() {
            if event.event_type_str() == "checkout_failed" {
                saw_failure = true;
            }
        }
        assert!(saw_failure);
    }

    #[tokio::test]
    async fn intent_creation_failure_emits_checkout_failed() {
        let processor = FakeProcessor {
            fail_create: true,
            ..FakeProcessor::default()
        };
        let h = harness(processor, FakeConfirmer::completing()).await;
        let mut events = h.service.event_bus.subscribe();

        let result = h.service.checkout(card_request(h.court_id)).await;
        assert!(matches!(result, Err(GatewayError::ProcessorError(_))));

        let mut types = Vec::new();
        while let Ok(event) = events.try_recv() {
            types.push(event.event_type_str());
        }
        assert_eq!(types, vec!["booking_created", "checkout_failed"]);
    }

    #[tokio::test]
    async fn pix_checkout_returns_qr_code_without_confirming() {
        let h = harness(FakeProcessor::default(), FakeConfirmer::completing()).await;
        let mut req = card_request(h.court_id);
        req.payment_method = Some(PaymentMethod::Pix);

        let result = h.service.checkout(req).await;
        let Ok(CheckoutOutcome::AwaitingPix { booking, pix }) = result else {
            panic!("pix checkout should await settlement: {result:?}");
        };
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.payment_intent_id.as_deref(), Some("pi_pix_123"));
        assert!(!pix.qr_code_base64.is_empty());
        assert_eq!(h.confirmer.sheet_calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.confirmer.wallet_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn paid_pix_poll_confirms_the_booking() {
        let h = harness(
            FakeProcessor::polling(PixStatus::Paid),
            FakeConfirmer::completing(),
        )
        .await;
        let mut req = card_request(h.court_id);
        req.payment_method = Some(PaymentMethod::Pix);

        let Ok(CheckoutOutcome::AwaitingPix { booking, .. }) = h.service.checkout(req).await
        else {
            panic!("pix checkout should await settlement");
        };

        let status = h.service.pix_status(booking.id).await;
        assert_eq!(status.ok(), Some(PixStatus::Paid));

        let Ok(confirmed) = h.store.get(booking.id).await else {
            panic!("booking should exist");
        };
        assert_eq!(confirmed.status, BookingStatus::Confirmed);
    }

    #[tokio::test]
    async fn paid_pix_for_cancelled_booking_is_not_reconfirmed() {
        let h = harness(
            FakeProcessor::polling(PixStatus::Paid),
            FakeConfirmer::completing(),
        )
        .await;
        let mut req = card_request(h.court_id);
        req.payment_method = Some(PaymentMethod::Pix);

        let Ok(CheckoutOutcome::AwaitingPix { booking, .. }) = h.service.checkout(req).await
        else {
            panic!("pix checkout should await settlement");
        };
        let Ok(_) = h.service.cancel_booking(booking.id, None).await else {
            panic!("pending booking should cancel");
        };

        // The settlement is still reported, but the booking stays
        // cancelled and the processor is actually consulted.
        let status = h.service.pix_status(booking.id).await;
        assert_eq!(status.ok(), Some(PixStatus::Paid));
        assert_eq!(h.processor.poll_calls.load(Ordering::SeqCst), 1);

        let Ok(after) = h.store.get(booking.id).await else {
            panic!("booking should exist");
        };
        assert_eq!(after.status, BookingStatus::Cancelled);
    }

    #[tokio::test]
    async fn expired_pix_window_short_circuits_the_poll() {
        let h = harness(
            FakeProcessor::polling(PixStatus::Pending),
            FakeConfirmer::completing(),
        )
        .await;
        let mut req = card_request(h.court_id);
        req.payment_method = Some(PaymentMethod::Pix);

        let Ok(CheckoutOutcome::AwaitingPix { booking, .. }) = h.service.checkout(req).await
        else {
            panic!("pix checkout should await settlement");
        };

        // A zero-minute window makes any booking immediately expired.
        let service = CheckoutService::new(
            Arc::clone(&h.store) as Arc<dyn BookingStore>,
            Arc::clone(&h.processor) as Arc<dyn PaymentProcessor>,
            Arc::clone(&h.confirmer) as Arc<dyn PaymentConfirmer>,
            EventBus::new(100),
            0,
        );
        let status = service.pix_status(booking.id).await;
        assert_eq!(status.ok(), Some(PixStatus::Expired));
        // The processor is not consulted for an expired window.
        assert_eq!(h.processor.poll_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn refund_requires_a_settled_payment() {
        let h = harness(FakeProcessor::default(), FakeConfirmer::completing()).await;
        let Ok(CheckoutOutcome::Confirmed { booking }) =
            h.service.checkout(card_request(h.court_id)).await
        else {
            panic!("checkout should confirm");
        };

        let refund = h.service.refund(booking.id, None).await;
        let Ok(refund) = refund else {
            panic!("refund of a settled booking should succeed");
        };
        assert_eq!(refund.refund_id, "re_123");

        // A fresh pending booking has nothing to refund.
        let mut req = card_request(h.court_id);
        let Some(date) = NaiveDate::from_ymd_opt(2026, 9, 2) else {
            panic!("valid date");
        };
        req.date = date;
        req.payment_method = Some(PaymentMethod::Pix);
        let Ok(CheckoutOutcome::AwaitingPix { booking: pending, .. }) =
            h.service.checkout(req).await
        else {
            panic!("pix checkout should await settlement");
        };
        let result = h.service.refund(pending.id, None).await;
        assert!(matches!(result, Err(GatewayError::InvalidTransition(_))));
    }

    #[tokio::test]
    async fn reaper_cancels_only_stale_pending_bookings() {
        let h = harness(FakeProcessor::default(), FakeConfirmer::completing()).await;
        let mut req = card_request(h.court_id);
        req.payment_method = Some(PaymentMethod::Pix);
        let Ok(CheckoutOutcome::AwaitingPix { booking, .. }) = h.service.checkout(req).await
        else {
            panic!("pix checkout should await settlement");
        };

        // Nothing is old enough yet.
        let Ok(reaped) = h.service.reap_stale_pending(30).await else {
            panic!("reap should succeed");
        };
        assert!(reaped.is_empty());

        // With a zero max age everything pending is stale.
        let mut events = h.service.event_bus.subscribe();
        let Ok(reaped) = h.service.reap_stale_pending(0).await else {
            panic!("reap should succeed");
        };
        assert_eq!(reaped, vec![booking.id]);

        let Ok(event) = events.try_recv() else {
            panic!("cancellation event expected");
        };
        assert_eq!(event.event_type_str(), "booking_cancelled");
        let Ok(cancelled) = h.store.get(booking.id).await else {
            panic!("booking should exist");
        };
        assert_eq!(
            cancelled.cancellation_reason.as_deref(),
            Some("janela de pagamento expirada")
        );
    }
}
