pub mod layout;
pub mod seat;

pub use layout::{LayoutError, SeatLayout};
pub use seat::{FreeSeat, RowNumber, Seat, SeatId};
