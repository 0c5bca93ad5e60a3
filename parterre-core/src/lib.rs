pub mod engine;
pub mod error;
pub mod snapshot;

pub use engine::{EngineConfig, HoldOutcome, ReservationEngine};
pub use error::ReservationError;
