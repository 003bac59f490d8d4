//! Background task that cancels abandoned pending bookings.
//!
//! A pending booking whose payment never settles (closed app, expired
//! PIX code, crash mid-checkout) would hold its slot forever. The reaper
//! sweeps on a fixed interval and cancels pending bookings older than
//! the configured maximum age, freeing their slots.

use std::sync::Arc;
use std::time::Duration;

use super::CheckoutService;

/// Runs the reaper loop until the process exits.
///
/// Spawned once at startup when `REAPER_ENABLED` is set. Sweep failures
/// are logged and the loop keeps going.
pub async fn run(service: Arc<CheckoutService>, interval_secs: u64, max_age_mins: i64) {
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    tracing::info!(interval_secs, max_age_mins, "pending-booking reaper started");

    loop {
        ticker.tick().await;
        match service.reap_stale_pending(max_age_mins).await {
            Ok(reaped) if !reaped.is_empty() => {
                tracing::info!(count = reaped.len(), "cancelled stale pending bookings");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, "reaper sweep failed");
            }
        }
    }
}
