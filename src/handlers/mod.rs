pub mod auth_handler;
pub mod availability_handler;
pub mod backend_health_handler;
pub mod booking_handler;
pub mod field_handler;
pub mod match_handler;
pub mod registration_handler;
pub mod roster_handler;
pub mod team_handler;
