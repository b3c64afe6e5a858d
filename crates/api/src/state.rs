use std::sync::Arc;

use janasamparka_events::EventBus;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything inside is behind `Arc` or is a pool handle.
#[derive(Clone)]
pub struct AppState {
    pub pool: janasamparka_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Complaint events are published here after each mutation commits.
    pub event_bus: Arc<EventBus>,
}
