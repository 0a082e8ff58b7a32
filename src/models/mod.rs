pub mod seat;
pub mod station;
pub mod booking;

pub use seat::{Deck, Seat, SeatId, SeatStatus, SeatView};
pub use station::{Route, Station};
pub use booking::{Booking, MealPreference, NewBooking};
