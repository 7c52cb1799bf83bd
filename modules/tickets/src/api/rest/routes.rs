use axum::{
    routing::{get, patch},
    Extension, Router,
};
use std::sync::Arc;

use crate::api::rest::handlers;
use crate::domain::service::Service;

/// Ticket routes, relative to the `/api` prefix.
///
/// Static segments (`live`, `past`, `stats`) are matched before the `{id}`
/// capture by the router, so they are safe to nest under `/tickets`.
pub fn ticket_routes(service: Arc<Service>) -> Router {
    Router::new()
        .route(
            "/tickets",
            get(handlers::list_tickets).post(handlers::create_ticket),
        )
        .route("/tickets/live", get(handlers::live_tickets))
        .route("/tickets/past", get(handlers::past_tickets))
        .route("/tickets/stats", get(handlers::ticket_stats))
        .route(
            "/tickets/{id}",
            get(handlers::get_ticket)
                .patch(handlers::update_ticket)
                .delete(handlers::delete_ticket),
        )
        .route("/tickets/{id}/resolve", patch(handlers::resolve_ticket))
        .route(
            "/tickets/{id}/notes",
            get(handlers::list_notes).post(handlers::create_note),
        )
        .route("/tickets/{id}/timeline", get(handlers::get_timeline))
        .layer(Extension(service))
}

/// Full REST surface mounted under `/api`.
pub fn api_router(service: Arc<Service>) -> Router {
    Router::new().nest("/api", ticket_routes(service))
}
