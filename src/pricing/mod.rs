//! Quote pricing engine.
//!
//! Turns a client's selections (hotels, nights, room quantities, per-person
//! costs) into priced room lines and a grand total. The math in
//! `calculators` is pure; `services` supplies the catalog snapshot.

pub mod amount;
pub mod calculators;
pub mod models;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use amount::{parse_or_zero, Amount};
pub use calculators::{price_quote, reprice};
pub use models::{HotelRateSheet, QuoteDraft, QuotePricing, RoomType};
pub use routes::router;
