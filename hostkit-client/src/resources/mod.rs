//! Typed endpoints of the rental-management API.
//!
//! Each submodule adds methods to [`HostkitClient`](crate::HostkitClient) and
//! defines the payloads it returns. Payload structs carry the fields the
//! client relies on; anything else the server sends is kept in `extra`.

pub mod calendar;
pub mod messages;
pub mod properties;
pub mod reservations;
pub mod reviews;

pub use calendar::CalendarDay;
pub use messages::Message;
pub use properties::{Address, Property};
pub use reservations::{Guest, Reservation, ReservationStatus};
pub use reviews::Review;
