use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReservationError {
    /// The seat is locked by another user or already sold.
    #[error("Seat Unavailable")]
    SeatUnavailable,

    /// Purchase attempted without owning an active hold on the seat.
    #[error("Lock expired or seat not held")]
    LockExpiredOrStolen,

    /// The durable store already shows the seat booked, but no receipt was
    /// found for this idempotency key. Operator attention required.
    #[error("Seat already sold")]
    AlreadySold,

    #[error("Unknown seat: {0}")]
    UnknownSeat(String),

    #[error("hot state store error: {0}")]
    Hss(#[from] redis::RedisError),

    #[error("durable store error: {0}")]
    Drs(#[from] sqlx::Error),

    #[error("receipt decode error: {0}")]
    ReceiptDecode(#[from] serde_json::Error),
}
