//! Route definitions for the `/complaints` resource.
//!
//! All endpoints require authentication.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{complaint, routing, workflow};
use crate::state::AppState;

/// Routes mounted at `/complaints`.
///
/// ```text
/// GET    /                                -> list_complaints
/// POST   /                                -> create_complaint
/// GET    /{id}                            -> get_complaint
/// GET    /{id}/status-logs                -> list_status_logs
/// GET    /{id}/transitions                -> list_transitions
///
/// POST   /{id}/status                     -> update_status
/// POST   /{id}/approve                    -> approve_work
/// POST   /{id}/reject-work                -> reject_work
///
/// POST   /{id}/assign-department          -> assign_department
/// POST   /{id}/escalate-to-taluk          -> escalate_to_taluk
/// POST   /{id}/escalate-to-zilla          -> escalate_to_zilla
/// POST   /{id}/reassign-gram-panchayat    -> reassign_gram_panchayat
/// POST   /{id}/transfer-department        -> transfer_department
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(complaint::list_complaints).post(complaint::create_complaint),
        )
        .route("/{id}", get(complaint::get_complaint))
        .route("/{id}/status-logs", get(complaint::list_status_logs))
        .route("/{id}/transitions", get(complaint::list_transitions))
        // Status workflow
        .route("/{id}/status", post(workflow::update_status))
        .route("/{id}/approve", post(workflow::approve_work))
        .route("/{id}/reject-work", post(workflow::reject_work))
        // Jurisdiction routing
        .route("/{id}/assign-department", post(routing::assign_department))
        .route("/{id}/escalate-to-taluk", post(routing::escalate_to_taluk))
        .route("/{id}/escalate-to-zilla", post(routing::escalate_to_zilla))
        .route(
            "/{id}/reassign-gram-panchayat",
            post(routing::reassign_gram_panchayat),
        )
        .route(
            "/{id}/transfer-department",
            post(routing::transfer_department),
        )
}
