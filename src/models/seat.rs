use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub type SeatId = i64;
pub type RowNumber = i32;

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Seat {
    pub id: SeatId,
    pub row_number: RowNumber,
    pub is_booked: bool,
    // Владелец брони; пока всегда NULL, идентичность вызывающего не передаётся
    pub held_by: Option<Uuid>,
}

impl Seat {
    pub fn free(id: SeatId, row_number: RowNumber) -> Self {
        Self {
            id,
            row_number,
            is_booked: false,
            held_by: None,
        }
    }
}

/// Свободное место в том виде, в каком его видит селектор: только id и ряд.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct FreeSeat {
    pub id: SeatId,
    pub row_number: RowNumber,
}

impl From<&Seat> for FreeSeat {
    fn from(seat: &Seat) -> Self {
        Self {
            id: seat.id,
            row_number: seat.row_number,
        }
    }
}
