//! Route definitions for the `/constituencies` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::jurisdiction;
use crate::state::AppState;

/// Routes mounted at `/constituencies`.
///
/// ```text
/// GET    /{id}/departments    -> list_departments
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/departments", get(jurisdiction::list_departments))
}
