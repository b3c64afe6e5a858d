pub mod auth;
pub mod complaint;
pub mod health;
pub mod jurisdiction;
pub mod notification;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/login                                      login (public)
///
/// /complaints                                      list, file
/// /complaints/{id}                                 get
/// /complaints/{id}/status-logs                     status history
/// /complaints/{id}/transitions                     statuses the caller may move to
/// /complaints/{id}/status                          transition (POST)
/// /complaints/{id}/approve                         approve resolved work (POST)
/// /complaints/{id}/reject-work                     reopen resolved work (POST)
/// /complaints/{id}/assign-department               ward / supervisor assignment (POST)
/// /complaints/{id}/escalate-to-taluk               GP -> TP (POST)
/// /complaints/{id}/escalate-to-zilla               TP -> ZP (POST)
/// /complaints/{id}/reassign-gram-panchayat         TP/ZP -> GP (POST)
/// /complaints/{id}/transfer-department             panchayat -> department (POST)
///
/// /constituencies/{id}/departments                 department lookup
///
/// /notifications                                   list
/// /notifications/{id}/read                         mark read (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/complaints", complaint::router())
        .nest("/constituencies", jurisdiction::router())
        .nest("/notifications", notification::router())
}
