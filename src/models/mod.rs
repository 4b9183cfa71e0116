//! Database row models

pub mod hotel;
pub mod quote;
pub mod trip_option;
pub mod user;

pub use hotel::HotelRow;
pub use quote::QuoteRecord;
pub use trip_option::{TripCategory, TripOptionRow, TripOptions};
pub use user::{UserResponse, UserRole, UserRow};
