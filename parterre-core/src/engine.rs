use std::sync::Arc;

use parterre_domain::{seatmap, Receipt, SeatState};
use parterre_store::{DbClient, RedisClient, SeatRepository};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::ReservationError;
use crate::snapshot;

#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    pub hold_seconds: u64,
    pub receipt_ttl_seconds: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldOutcome {
    Acquired,
    Conflict,
}

/// The reservation state machine. Per seat:
/// AVAILABLE -> LOCKED(user) via `hold`, LOCKED -> AVAILABLE via `release`
/// or TTL expiry, LOCKED(user) -> SOLD(user) via `purchase`. SOLD is
/// terminal outside `reset`. All coordination is delegated to the hot state
/// store (single-key scripts) and the durable store (row-locked
/// transactions); the engine itself holds no locks.
pub struct ReservationEngine {
    redis: Arc<RedisClient>,
    db: Arc<DbClient>,
    config: EngineConfig,
}

impl ReservationEngine {
    pub fn new(redis: Arc<RedisClient>, db: Arc<DbClient>, config: EngineConfig) -> Self {
        Self { redis, db, config }
    }

    /// Acquire a time-bounded exclusive claim on a seat. Single-key script
    /// order in the hot store decides simultaneous arrivals; everyone else
    /// sees a conflict, including the holder re-asking (holds are not
    /// renewable without an intervening release).
    pub async fn hold(&self, seat_id: &str, user_id: &str) -> Result<HoldOutcome, ReservationError> {
        let acquired = self
            .redis
            .acquire_seat_hold(seat_id, user_id, self.config.hold_seconds)
            .await?;

        if acquired {
            info!(seat_id, user_id, "Seat hold acquired");
            Ok(HoldOutcome::Acquired)
        } else {
            Ok(HoldOutcome::Conflict)
        }
    }

    /// Release a hold if and only if `user_id` still owns it. Releases fire
    /// on navigation events and race TTL expiry and purchases, so a missing
    /// or foreign lock is not an error and hot-store hiccups are swallowed.
    pub async fn release(&self, seat_id: &str, user_id: &str) -> Result<(), ReservationError> {
        if let Err(e) = self.redis.release_seat_hold(seat_id, user_id).await {
            warn!(seat_id, user_id, error = %e, "Release failed, hold will expire via TTL");
        }
        Ok(())
    }

    /// Promote a hold to a permanent booking.
    ///
    /// Order matters: the receipt short-circuit keeps retries exactly-once,
    /// hold verification before the durable write enforces holder-only
    /// purchase, and the durable commit before the SOLD finalize ensures the
    /// hot store never claims SOLD for an unbooked seat.
    pub async fn purchase(
        &self,
        idempotency_key: &str,
        seat_id: &str,
        user_id: &str,
    ) -> Result<Receipt, ReservationError> {
        // 1. Idempotency short-circuit: replay the cached receipt verbatim.
        if let Some(cached) = self.redis.get_receipt(idempotency_key).await? {
            let receipt: Receipt = serde_json::from_str(&cached)?;
            info!(idempotency_key, seat_id, "Replayed cached receipt");
            return Ok(receipt);
        }

        // 2. Hold verification: the caller must own the LOCKED entry now.
        let owns_hold = self
            .redis
            .get_seat_state(seat_id)
            .await?
            .and_then(|raw| SeatState::parse(&raw))
            .map(|state| state.is_locked_by(user_id))
            .unwrap_or(false);
        if !owns_hold {
            return Err(ReservationError::LockExpiredOrStolen);
        }

        // 3. Durable transaction with a row lock on the seat.
        let mut tx = self.db.pool.begin().await?;
        let row = SeatRepository::find_for_update(&mut tx, seat_id)
            .await?
            .ok_or_else(|| ReservationError::UnknownSeat(seat_id.to_string()))?;

        if row.status == "booked" {
            tx.rollback().await?;
            // A booked row without a cached receipt means a prior purchase
            // lost its finalize/receipt step. Needs operator reconciliation.
            error!(seat_id, idempotency_key, "Seat booked in ledger but no receipt cached");
            return Err(ReservationError::AlreadySold);
        }

        // 4. Book it and commit. From here the sale is durable.
        SeatRepository::mark_booked(&mut tx, seat_id, user_id).await?;
        tx.commit().await?;

        // 5. Finalize the hot store. On failure the reconciliation sweep
        //    rewrites the key from the ledger.
        if let Err(e) = self.redis.mark_seat_sold(seat_id).await {
            error!(seat_id, error = %e, "SOLD finalize failed after commit, sweep will repair");
        }

        // 6. Publish the receipt under the client's idempotency key.
        let receipt = Receipt::new(format!("tx_{}", Uuid::new_v4().simple()));
        let payload = serde_json::to_string(&receipt)?;
        if let Err(e) = self
            .redis
            .put_receipt(idempotency_key, &payload, self.config.receipt_ttl_seconds)
            .await
        {
            error!(seat_id, idempotency_key, error = %e, "Receipt cache write failed after commit");
        }

        info!(seat_id, user_id, tx_id = %receipt.tx_id, "Seat purchased");
        Ok(receipt)
    }

    /// Merged view of the durable records with the hot-store overlay. Not
    /// serializable against in-flight holds and purchases; per-seat
    /// consistent only. A failing hot-store scan degrades to ledger-only.
    pub async fn snapshot(&self) -> Result<Vec<parterre_domain::SeatView>, ReservationError> {
        let rows = SeatRepository::list_all(&self.db.pool).await?;
        let seats: Vec<_> = rows.into_iter().filter_map(|r| r.into_seat()).collect();

        let overlay = match self.redis.scan_seat_states().await {
            Ok(entries) => snapshot::overlay_from_entries(entries),
            Err(e) => {
                warn!(error = %e, "Hot store scan failed, serving ledger-only snapshot");
                Default::default()
            }
        };

        Ok(snapshot::merge(seats, &overlay))
    }

    /// Admin reset: drop all volatile state, reopen every seat.
    pub async fn reset(&self) -> Result<(), ReservationError> {
        self.redis.flush_all().await?;
        let reopened = SeatRepository::reset_all(&self.db.pool).await?;
        info!(reopened, "All seats reset to available");
        Ok(())
    }

    /// Idempotent boot seeding of the fixed venue layout.
    pub async fn seed_seats(&self) -> Result<u64, ReservationError> {
        let seats = seatmap::generate();
        let inserted = SeatRepository::seed(&self.db.pool, &seats).await?;
        if inserted > 0 {
            info!(inserted, "Seeded seat inventory");
        }
        Ok(inserted)
    }

    /// Repair pass for the narrow window between the durable commit and the
    /// SOLD finalize: any booked seat whose hot key does not read SOLD gets
    /// the marker rewritten from the ledger.
    pub async fn reconcile_sold_keys(&self) -> Result<u64, ReservationError> {
        let rows = SeatRepository::list_all(&self.db.pool).await?;
        let mut repaired = 0;

        for row in rows.into_iter().filter(|r| r.status == "booked") {
            let hot = self.redis.get_seat_state(&row.seat_id).await?;
            let is_sold = matches!(
                hot.as_deref().and_then(SeatState::parse),
                Some(SeatState::Sold)
            );
            if !is_sold {
                self.redis.mark_seat_sold(&row.seat_id).await?;
                repaired += 1;
            }
        }

        if repaired > 0 {
            warn!(repaired, "Rewrote SOLD markers from the ledger");
        }
        Ok(repaired)
    }
}
