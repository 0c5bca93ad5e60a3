use std::sync::Arc;

use parterre_core::ReservationEngine;
use tokio::time::{interval, Duration};
use tracing::{error, info};

/// Background repair loop for the window between a durable commit and the
/// hot-store SOLD finalize. Runs for the lifetime of the process.
pub async fn start_reconciliation_worker(engine: Arc<ReservationEngine>, interval_seconds: u64) {
    info!(interval_seconds, "Reconciliation worker started");
    let mut ticker = interval(Duration::from_secs(interval_seconds));

    loop {
        ticker.tick().await;
        if let Err(e) = engine.reconcile_sold_keys().await {
            error!(error = %e, "Reconciliation sweep failed");
        }
    }
}
