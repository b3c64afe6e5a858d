//! Handlers that move a complaint through its status workflow.
//!
//! Each mutation locks the complaint row, validates against the transition
//! table, applies the planned column changes and appends the status log in a
//! single transaction. The event is published only after commit.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use janasamparka_core::complaint::ComplaintStatus;
use janasamparka_core::error::CoreError;
use janasamparka_core::roles::Role;
use janasamparka_core::types::DbId;
use janasamparka_core::workflow::{
    TransitionPlan, TransitionRequest, WorkflowError, WorkflowValidator,
};
use janasamparka_db::models::complaint::Complaint;
use janasamparka_db::repositories::ComplaintRepo;
use janasamparka_events::bus::{STATUS_CHANGED, WORK_APPROVED, WORK_REJECTED};
use janasamparka_events::ComplaintEvent;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult};
use crate::handlers::complaint::{load_active_user, not_found, placement_of};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireOfficer;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /complaints/{id}/status`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    /// Target status as its wire string; unknown values are a workflow error.
    pub status: String,
    #[validate(length(max = 2000))]
    pub note: Option<String>,
    /// Recorded when rejecting a complaint.
    #[validate(length(max = 2000))]
    pub rejection_reason: Option<String>,
}

/// Request body for `POST /complaints/{id}/approve`.
#[derive(Debug, Deserialize, Validate)]
pub struct ApproveWorkRequest {
    #[validate(length(max = 2000))]
    pub note: Option<String>,
}

/// Request body for `POST /complaints/{id}/reject-work`.
#[derive(Debug, Deserialize, Validate)]
pub struct RejectWorkRequest {
    #[validate(length(max = 2000), custom(function = "not_blank"))]
    pub reason: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Shared transition path
// ---------------------------------------------------------------------------

/// Lock the complaint, check the caller's scope, plan with `plan` and apply.
///
/// Returns the updated row and the plan that was applied.
async fn run_transition<F>(
    state: &AppState,
    auth: &AuthUser,
    id: DbId,
    plan: F,
) -> AppResult<(Complaint, TransitionPlan)>
where
    F: FnOnce(ComplaintStatus, Role) -> Result<TransitionPlan, AppError>,
{
    let actor = load_active_user(&state.pool, auth).await?.actor()?;

    let mut tx = state.pool.begin().await?;
    let current = ComplaintRepo::find_for_update(&mut tx, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let placement = placement_of(&state.pool, &current).await?;
    actor.check_scope(&placement)?;

    let plan = plan(placement.status, actor.role)?;
    let updated = ComplaintRepo::apply_transition(&mut tx, &current, &plan, actor.user_id).await?;
    tx.commit().await?;

    tracing::info!(
        complaint_id = id,
        user_id = actor.user_id,
        from = %plan.from,
        to = %plan.to,
        "Complaint status changed"
    );
    Ok((updated, plan))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/complaints/{id}/status
///
/// Move a complaint along one edge of the transition table.
pub async fn update_status(
    RequireOfficer(auth): RequireOfficer,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStatusRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate().map_err(CoreError::from)?;

    let (updated, plan) = run_transition(&state, &auth, id, |current, role| {
        WorkflowValidator::validate_status_transition(
            current.as_str(),
            &input.status,
            role.as_str(),
        )?;
        let target: ComplaintStatus = input.status.parse().map_err(WorkflowError::from)?;
        Ok(WorkflowValidator::plan_transition(
            TransitionRequest {
                current,
                target,
                role,
                note: input.note.as_deref(),
                rejection_reason: input.rejection_reason.as_deref(),
            },
            Utc::now(),
        )?)
    })
    .await?;

    state.event_bus.publish(
        ComplaintEvent::new(STATUS_CHANGED, id)
            .with_actor(auth.user_id)
            .with_transition(plan.from, plan.to),
    );

    Ok(Json(DataResponse { data: updated }))
}

/// POST /api/v1/complaints/{id}/approve
///
/// Approve resolved work, closing the complaint. Only supervisors may take
/// the edge; officers get a workflow error from the validator.
pub async fn approve_work(
    RequireOfficer(auth): RequireOfficer,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ApproveWorkRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate().map_err(CoreError::from)?;

    let (updated, plan) = run_transition(&state, &auth, id, |current, role| {
        Ok(WorkflowValidator::plan_approval(
            current,
            role,
            input.note.as_deref(),
            Utc::now(),
        )?)
    })
    .await?;

    state.event_bus.publish(
        ComplaintEvent::new(WORK_APPROVED, id)
            .with_actor(auth.user_id)
            .with_transition(plan.from, plan.to),
    );

    Ok(Json(DataResponse { data: updated }))
}

/// POST /api/v1/complaints/{id}/reject-work
///
/// Send resolved work back to `in_progress` with a reason.
pub async fn reject_work(
    RequireOfficer(auth): RequireOfficer,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RejectWorkRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate().map_err(CoreError::from)?;
    let reason = input.reason.trim();

    let (updated, plan) = run_transition(&state, &auth, id, |current, role| {
        Ok(WorkflowValidator::plan_work_rejection(
            current,
            role,
            reason,
            Utc::now(),
        )?)
    })
    .await?;

    state.event_bus.publish(
        ComplaintEvent::new(WORK_REJECTED, id)
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({ "reason": reason }))
            .with_transition(plan.from, plan.to),
    );

    Ok(Json(DataResponse { data: updated }))
}
