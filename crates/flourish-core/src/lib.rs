#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

mod clock;
mod error;
pub mod model;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ApiError, HttpError};

/// Generate a new document identifier
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Round a money amount to two decimal places
///
/// Negative zero is normalized so empty sums serialize as `0.0`.
pub fn round_money(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0 + 0.0
}
