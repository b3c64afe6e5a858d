//! Handlers that re-point a complaint's owning unit: department assignment,
//! panchayat escalation, reassignment down to a gram panchayat, and transfer
//! to a department.
//!
//! All of them go through [`validate_routing`]. Department assignment of a
//! still-`submitted` complaint also takes the `submitted -> assigned` edge in
//! the same transaction.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use janasamparka_core::complaint::ComplaintStatus;
use janasamparka_core::error::CoreError;
use janasamparka_core::jurisdiction::{validate_routing, RoutingAction};
use janasamparka_core::types::DbId;
use janasamparka_core::workflow::{TransitionRequest, WorkflowValidator};
use janasamparka_db::models::complaint::Complaint;
use janasamparka_db::repositories::{ComplaintRepo, JurisdictionRepo};
use janasamparka_events::ComplaintEvent;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::complaint::{load_active_user, not_found, placement_of};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /complaints/{id}/assign-department`.
#[derive(Debug, Deserialize, Validate)]
pub struct AssignDepartmentRequest {
    pub department_id: DbId,
    #[validate(length(max = 2000))]
    pub note: Option<String>,
}

/// Request body for `POST /complaints/{id}/escalate-to-taluk`.
#[derive(Debug, Deserialize)]
pub struct EscalateToTalukRequest {
    pub taluk_panchayat_id: DbId,
}

/// Request body for `POST /complaints/{id}/escalate-to-zilla`.
#[derive(Debug, Deserialize)]
pub struct EscalateToZillaRequest {
    pub zilla_panchayat_id: DbId,
}

/// Request body for `POST /complaints/{id}/reassign-gram-panchayat`.
#[derive(Debug, Deserialize)]
pub struct ReassignGramPanchayatRequest {
    pub gram_panchayat_id: DbId,
}

/// Request body for `POST /complaints/{id}/transfer-department`.
#[derive(Debug, Deserialize)]
pub struct TransferDepartmentRequest {
    pub department_id: DbId,
}

// ---------------------------------------------------------------------------
// Shared routing path
// ---------------------------------------------------------------------------

/// Whether this action also starts work on a complaint that was never assigned.
fn assigns_for_action(action: RoutingAction, status: ComplaintStatus) -> bool {
    status == ComplaintStatus::Submitted
        && matches!(
            action,
            RoutingAction::WardToDepartment | RoutingAction::SupervisorAssignDepartment
        )
}

async fn route_complaint(
    state: &AppState,
    auth: &AuthUser,
    id: DbId,
    action: RoutingAction,
    target_id: DbId,
    note: Option<&str>,
) -> AppResult<Complaint> {
    let actor = load_active_user(&state.pool, auth).await?.actor()?;

    let target_kind = action.target_kind();
    let target = JurisdictionRepo::find_unit(&state.pool, target_kind, target_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: target_kind.label(),
                id: target_id,
            })
        })?;

    let mut tx = state.pool.begin().await?;
    let current = ComplaintRepo::find_for_update(&mut tx, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let placement = placement_of(&state.pool, &current).await?;

    let change = validate_routing(&actor, &placement, action, &target)?;
    let mut updated = ComplaintRepo::apply_assignment(&mut tx, id, &change).await?;

    let mut transition = None;
    if assigns_for_action(action, placement.status) {
        let plan = WorkflowValidator::plan_transition(
            TransitionRequest {
                current: placement.status,
                target: ComplaintStatus::Assigned,
                role: actor.role,
                note,
                rejection_reason: None,
            },
            Utc::now(),
        )?;
        updated = ComplaintRepo::apply_transition(&mut tx, &updated, &plan, actor.user_id).await?;
        transition = Some((plan.from, plan.to));
    }
    tx.commit().await?;

    tracing::info!(
        complaint_id = id,
        user_id = actor.user_id,
        assignment_type = %change.assignment_type,
        unit_id = change.unit_id,
        "Complaint routed"
    );

    let mut event = ComplaintEvent::new(action.event_type(), id)
        .with_actor(actor.user_id)
        .with_payload(serde_json::json!({
            "assignment_type": change.assignment_type,
            "unit_id": change.unit_id,
        }));
    if let Some((from, to)) = transition {
        event = event.with_transition(from, to);
    }
    state.event_bus.publish(event);

    Ok(updated)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/complaints/{id}/assign-department
///
/// Ward officers hand their ward's complaints to a department; supervisors
/// may assign any complaint in their constituency.
pub async fn assign_department(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AssignDepartmentRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate().map_err(CoreError::from)?;
    let action = if auth.role.is_supervisor() {
        RoutingAction::SupervisorAssignDepartment
    } else {
        RoutingAction::WardToDepartment
    };
    let complaint = route_complaint(
        &state,
        &auth,
        id,
        action,
        input.department_id,
        input.note.as_deref(),
    )
    .await?;
    Ok(Json(DataResponse { data: complaint }))
}

/// POST /api/v1/complaints/{id}/escalate-to-taluk
pub async fn escalate_to_taluk(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<EscalateToTalukRequest>,
) -> AppResult<impl IntoResponse> {
    let complaint = route_complaint(
        &state,
        &auth,
        id,
        RoutingAction::EscalateToTaluk,
        input.taluk_panchayat_id,
        None,
    )
    .await?;
    Ok(Json(DataResponse { data: complaint }))
}

/// POST /api/v1/complaints/{id}/escalate-to-zilla
pub async fn escalate_to_zilla(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<EscalateToZillaRequest>,
) -> AppResult<impl IntoResponse> {
    let complaint = route_complaint(
        &state,
        &auth,
        id,
        RoutingAction::EscalateToZilla,
        input.zilla_panchayat_id,
        None,
    )
    .await?;
    Ok(Json(DataResponse { data: complaint }))
}

/// POST /api/v1/complaints/{id}/reassign-gram-panchayat
pub async fn reassign_gram_panchayat(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ReassignGramPanchayatRequest>,
) -> AppResult<impl IntoResponse> {
    let complaint = route_complaint(
        &state,
        &auth,
        id,
        RoutingAction::ReassignToGramPanchayat,
        input.gram_panchayat_id,
        None,
    )
    .await?;
    Ok(Json(DataResponse { data: complaint }))
}

/// POST /api/v1/complaints/{id}/transfer-department
pub async fn transfer_department(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<TransferDepartmentRequest>,
) -> AppResult<impl IntoResponse> {
    let complaint = route_complaint(
        &state,
        &auth,
        id,
        RoutingAction::TransferToDepartment,
        input.department_id,
        None,
    )
    .await?;
    Ok(Json(DataResponse { data: complaint }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_department_assignment_of_submitted_starts_work() {
        assert!(assigns_for_action(
            RoutingAction::WardToDepartment,
            ComplaintStatus::Submitted
        ));
        assert!(assigns_for_action(
            RoutingAction::SupervisorAssignDepartment,
            ComplaintStatus::Submitted
        ));
        assert!(!assigns_for_action(
            RoutingAction::WardToDepartment,
            ComplaintStatus::InProgress
        ));
        assert!(!assigns_for_action(
            RoutingAction::EscalateToTaluk,
            ComplaintStatus::Submitted
        ));
        assert!(!assigns_for_action(
            RoutingAction::TransferToDepartment,
            ComplaintStatus::Submitted
        ));
    }
}
