pub mod hold;
pub mod receipt;
pub mod seat;
pub mod seatmap;

pub use hold::SeatState;
pub use receipt::Receipt;
pub use seat::{Seat, SeatStatus, SeatView, Tier, ViewState};
