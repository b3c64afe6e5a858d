//! Read-only jurisdiction lookups used by assignment screens.

use axum::extract::{Path, State};
use axum::Json;
use janasamparka_core::types::DbId;
use janasamparka_db::models::jurisdiction::Department;
use janasamparka_db::repositories::JurisdictionRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireOfficer;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/constituencies/{id}/departments
pub async fn list_departments(
    RequireOfficer(_auth): RequireOfficer,
    State(state): State<AppState>,
    Path(constituency_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Department>>>> {
    let departments = JurisdictionRepo::list_departments(&state.pool, constituency_id).await?;
    Ok(Json(DataResponse { data: departments }))
}
