pub mod auth;
pub mod availability;
pub mod booking;
pub mod common;
pub mod field;
pub mod matches;
pub mod user;
