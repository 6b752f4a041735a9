pub mod allocator;
pub mod selector;

pub use allocator::{Booking, BookingPolicy, SeatAllocator};
pub use selector::{select_seats, Selection, Strategy};
