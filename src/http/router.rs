//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        // Weekly template
        .route(
            "/service-versions/{id}/weekly-template",
            get(handlers::get_weekly_template),
        )
        .route(
            "/service-versions/{id}/weekly-template/{weekday}",
            put(handlers::update_template_day),
        )
        // Slot policy
        .route(
            "/service-versions/{id}/slot-policy",
            put(handlers::update_slot_policy),
        )
        // Computed slots
        .route("/service-versions/{id}/slots", get(handlers::get_slots))
        .route(
            "/service-versions/{id}/slots/at",
            get(handlers::get_slot_details),
        )
        // Date exceptions
        .route(
            "/service-versions/{id}/exceptions",
            get(handlers::list_exceptions).post(handlers::create_exception),
        )
        .route("/exceptions/{id}", delete(handlers::delete_exception))
        // Reservation validation & booking
        .route(
            "/service-versions/{id}/validate-reservation",
            post(handlers::validate_reservation),
        )
        .route(
            "/service-versions/{id}/reservations",
            post(handlers::book_reservation),
        )
        .route(
            "/service-versions/{id}/alternatives",
            get(handlers::find_alternatives),
        )
        // Schedule lifecycle
        .route(
            "/service-versions/{id}/deactivate",
            post(handlers::deactivate_schedule),
        )
        .route(
            "/service-versions/{id}/reactivate",
            post(handlers::reactivate_schedule),
        )
        // Legacy slots
        .route(
            "/legacy-slots/{id}/schedule-change",
            post(handlers::change_legacy_slot_schedule),
        );

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
