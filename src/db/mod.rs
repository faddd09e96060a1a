pub mod availability;
pub mod bookings;
pub mod fields;
pub mod matches;
pub mod users;
