//! Handlers for the `/complaints` resource: filing, listing, reading, and
//! the status history.
//!
//! Also hosts the lookups shared by the workflow and routing handlers.

use std::collections::BTreeSet;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use janasamparka_core::complaint::{AssignmentType, ComplaintStatus, Priority};
use janasamparka_core::error::CoreError;
use janasamparka_core::jurisdiction::{Actor, Placement};
use janasamparka_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use janasamparka_core::roles::Role;
use janasamparka_core::types::DbId;
use janasamparka_core::workflow::WorkflowValidator;
use janasamparka_db::models::complaint::{Complaint, CreateComplaint};
use janasamparka_db::models::user::User;
use janasamparka_db::repositories::{
    ComplaintFilter, ComplaintRepo, JurisdictionRepo, StatusLogRepo, UserRepo,
};
use janasamparka_db::DbPool;
use janasamparka_events::bus::COMPLAINT_CREATED;
use janasamparka_events::ComplaintEvent;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::ComplaintListParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /complaints`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateComplaintRequest {
    #[validate(length(min = 5, max = 200))]
    pub title: String,
    #[validate(length(min = 10, max = 5000))]
    pub description: String,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    #[validate(length(max = 500))]
    pub location_text: Option<String>,
    pub priority: Option<Priority>,
    /// Defaults to the caller's own constituency.
    pub constituency_id: Option<DbId>,
    pub ward_id: Option<DbId>,
    pub gram_panchayat_id: Option<DbId>,
}

/// Response for `GET /complaints/{id}/transitions`.
#[derive(Debug, Serialize)]
pub struct TransitionsResponse {
    pub current: ComplaintStatus,
    /// Statuses the caller may move the complaint to.
    pub allowed: BTreeSet<ComplaintStatus>,
    pub requires_work_approval: bool,
    pub is_terminal: bool,
}

// ---------------------------------------------------------------------------
// Shared lookups
// ---------------------------------------------------------------------------

/// Load the caller's user row, refusing deactivated accounts.
pub(crate) async fn load_active_user(pool: &DbPool, auth: &AuthUser) -> AppResult<User> {
    let user = UserRepo::find_by_id(pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Unknown user".into())))?;
    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }
    Ok(user)
}

/// Resolve where a complaint sits, including the owning unit's parents.
pub(crate) async fn placement_of(pool: &DbPool, complaint: &Complaint) -> AppResult<Placement> {
    let owner = match complaint.owner()? {
        Some((kind, id)) => JurisdictionRepo::find_unit(pool, kind, id).await?,
        None => None,
    };
    Ok(Placement {
        constituency_id: complaint.constituency_id,
        status: complaint.status()?,
        owner,
    })
}

pub(crate) fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Complaint",
        id,
    })
}

/// The filer, the owning unit's officer and the governing supervisors may
/// read a complaint.
fn can_view(actor: &Actor, complaint: &Complaint, placement: &Placement) -> bool {
    complaint.user_id == actor.user_id
        || actor.owns(placement)
        || actor.governs(placement.constituency_id)
}

/// Fetch a complaint the caller may read. Out-of-scope complaints read as 404.
async fn find_visible(pool: &DbPool, actor: &Actor, id: DbId) -> AppResult<Complaint> {
    let complaint = ComplaintRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let placement = placement_of(pool, &complaint).await?;
    if !can_view(actor, &complaint, &placement) {
        return Err(not_found(id));
    }
    Ok(complaint)
}

/// Listing filter for the caller's scope, or `None` if nothing is visible.
fn scope_filter(actor: &Actor) -> Option<ComplaintFilter> {
    match actor.role {
        Role::Admin => Some(ComplaintFilter::default()),
        Role::Mla | Role::Moderator => Some(ComplaintFilter {
            constituency_id: Some(actor.constituency_id?),
            ..Default::default()
        }),
        Role::Citizen => Some(ComplaintFilter {
            user_id: Some(actor.user_id),
            ..Default::default()
        }),
        officer => Some(ComplaintFilter {
            owner: Some((officer.unit_kind()?, actor.unit_id?)),
            ..Default::default()
        }),
    }
}

/// A unit named on a new complaint must exist in its constituency.
async fn ensure_unit_in(
    pool: &DbPool,
    kind: AssignmentType,
    id: DbId,
    constituency_id: DbId,
) -> AppResult<()> {
    let unit = JurisdictionRepo::find_unit(pool, kind, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: kind.label(),
                id,
            })
        })?;
    if unit.constituency_id != constituency_id {
        return Err(AppError::Core(CoreError::Validation(format!(
            "{} {id} does not belong to constituency {constituency_id}",
            kind.label()
        ))));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/complaints
///
/// File a complaint. It starts in `submitted`, owned by the given ward or
/// gram panchayat if one is named.
pub async fn create_complaint(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateComplaintRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate().map_err(CoreError::from)?;
    let user = load_active_user(&state.pool, &auth).await?;

    let constituency_id = input
        .constituency_id
        .or(user.constituency_id)
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(
                "constituency_id is required".into(),
            ))
        })?;
    if let Some(ward_id) = input.ward_id {
        ensure_unit_in(&state.pool, AssignmentType::Ward, ward_id, constituency_id).await?;
    }
    if let Some(gp_id) = input.gram_panchayat_id {
        ensure_unit_in(&state.pool, AssignmentType::GramPanchayat, gp_id, constituency_id)
            .await?;
    }

    let complaint = ComplaintRepo::create(
        &state.pool,
        &CreateComplaint {
            constituency_id,
            user_id: user.id,
            title: input.title,
            description: input.description,
            category: input.category,
            location_text: input.location_text,
            priority: input.priority.unwrap_or_default(),
            ward_id: input.ward_id,
            gram_panchayat_id: input.gram_panchayat_id,
        },
    )
    .await?;

    tracing::info!(
        complaint_id = complaint.id,
        user_id = user.id,
        constituency_id,
        "Complaint filed"
    );
    state
        .event_bus
        .publish(ComplaintEvent::new(COMPLAINT_CREATED, complaint.id).with_actor(user.id));

    Ok((StatusCode::CREATED, Json(DataResponse { data: complaint })))
}

/// GET /api/v1/complaints?status=&limit=&offset=
///
/// List complaints visible to the caller, newest first.
pub async fn list_complaints(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ComplaintListParams>,
) -> AppResult<impl IntoResponse> {
    let actor = load_active_user(&state.pool, &auth).await?.actor()?;

    let Some(mut filter) = scope_filter(&actor) else {
        return Ok(Json(DataResponse {
            data: Vec::<Complaint>::new(),
        }));
    };
    filter.status = params.status;

    let limit = clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let offset = clamp_offset(params.offset);
    let complaints = ComplaintRepo::list(&state.pool, &filter, limit, offset).await?;

    Ok(Json(DataResponse { data: complaints }))
}

/// GET /api/v1/complaints/{id}
pub async fn get_complaint(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let actor = load_active_user(&state.pool, &auth).await?.actor()?;
    let complaint = find_visible(&state.pool, &actor, id).await?;
    Ok(Json(DataResponse { data: complaint }))
}

/// GET /api/v1/complaints/{id}/status-logs
///
/// The complaint's status history, oldest first.
pub async fn list_status_logs(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let actor = load_active_user(&state.pool, &auth).await?.actor()?;
    find_visible(&state.pool, &actor, id).await?;
    let logs = StatusLogRepo::list_for_complaint(&state.pool, id).await?;
    Ok(Json(DataResponse { data: logs }))
}

/// GET /api/v1/complaints/{id}/transitions
///
/// The statuses the caller may move this complaint to right now.
pub async fn list_transitions(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let actor = load_active_user(&state.pool, &auth).await?.actor()?;
    let complaint = find_visible(&state.pool, &actor, id).await?;
    let placement = placement_of(&state.pool, &complaint).await?;
    let current = placement.status;

    let allowed = if actor.check_scope(&placement).is_ok() {
        WorkflowValidator::allowed_transitions_for(current, actor.role)
    } else {
        BTreeSet::new()
    };

    Ok(Json(DataResponse {
        data: TransitionsResponse {
            current,
            allowed,
            requires_work_approval: WorkflowValidator::requires_work_approval(current),
            is_terminal: WorkflowValidator::is_terminal_status(current),
        },
    }))
}
