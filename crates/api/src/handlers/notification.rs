//! Handlers for the caller's in-app notifications.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use janasamparka_core::error::CoreError;
use janasamparka_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use janasamparka_core::types::DbId;
use janasamparka_db::models::notification::Notification;
use janasamparka_db::repositories::NotificationRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::NotificationListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/notifications?unread_only=&limit=&offset=
pub async fn list_notifications(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<NotificationListParams>,
) -> AppResult<Json<DataResponse<Vec<Notification>>>> {
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let offset = clamp_offset(params.offset);
    let notifications = NotificationRepo::list_for_user(
        &state.pool,
        auth.user_id,
        params.unread_only,
        limit,
        offset,
    )
    .await?;
    Ok(Json(DataResponse {
        data: notifications,
    }))
}

/// POST /api/v1/notifications/{id}/read
///
/// Returns 204 on success, 404 if the notification is not the caller's or
/// was already read.
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let updated = NotificationRepo::mark_read(&state.pool, id, auth.user_id).await?;
    if !updated {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
