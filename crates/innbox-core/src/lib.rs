//! Innbox core: shared booking domain types and errors.

pub mod booking;
pub mod error;

pub use booking::{BookingRequest, RoomType};
pub use error::{Error, Result};
