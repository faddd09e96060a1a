use actix_web::web;

pub mod auth;
pub mod backend_health;
pub mod bookings;
pub mod fields;
pub mod matches;
pub mod registration;

use crate::middleware::auth::AuthMiddleware;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(registration::register)
        .service(backend_health::backend_health)
        .service(auth::login);

    // Field and availability routes (require authentication)
    cfg.service(
        web::scope("/fields")
            .wrap(AuthMiddleware)
            .service(fields::create_field)
            .service(fields::get_fields)
            .service(fields::get_available_hours)
            .service(fields::upsert_rule)
            .service(fields::delete_rule)
            .service(fields::add_blocked_slot)
            .service(fields::remove_blocked_slot),
    );
    // Booking routes (require authentication)
    cfg.service(
        web::scope("/bookings")
            .wrap(AuthMiddleware)
            .service(bookings::create_booking)
            .service(bookings::cancel_booking),
    );
    // Match routes (require authentication)
    cfg.service(
        web::scope("/matches")
            .wrap(AuthMiddleware)
            .service(matches::create_open_match)
            .service(matches::create_closed_match)
            .service(matches::get_match)
            .service(matches::cancel_match)
            .service(matches::join_match)
            .service(matches::leave_match)
            .service(matches::assign_teams),
    );
}
