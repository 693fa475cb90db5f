pub mod movie;
pub mod order;
pub mod seat;

pub use movie::{Movie, Theater};
pub use order::{Order, OrderStatus, Showtime};
pub use seat::{SeatPosition, SelectedSeat};
