//! Complaint status-transition rules.
//!
//! The legal edges between [`ComplaintStatus`] values live in a single static
//! table, [`TRANSITIONS`], each tagged with the [`Authority`] required to take
//! it. [`WorkflowValidator`] answers every question the handlers ask
//! (is this edge legal, may this role take it, which note should be logged)
//! from that table alone, and [`WorkflowValidator::plan_transition`] computes
//! the column changes a transition implies so the database layer only has to
//! apply them.

use std::collections::BTreeSet;

use crate::complaint::ComplaintStatus;
use crate::roles::Role;
use crate::types::{ParseEnumError, Timestamp};

use ComplaintStatus::{Assigned, Closed, InProgress, Rejected, Resolved, Submitted};

/// Minimum authority needed to take an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authority {
    /// Any field officer (ward, department or panchayat tier), or a supervisor.
    FieldOfficer,
    /// Admin, MLA or moderator only.
    Supervisor,
}

impl Authority {
    fn admits(self, role: Role) -> bool {
        match self {
            Authority::FieldOfficer => role.is_field_officer() || role.is_supervisor(),
            Authority::Supervisor => role.is_supervisor(),
        }
    }
}

/// One legal edge of the status graph.
#[derive(Debug, Clone, Copy)]
pub struct Transition {
    pub from: ComplaintStatus,
    pub to: ComplaintStatus,
    pub authority: Authority,
    /// Note logged when the caller supplies none.
    pub reason: &'static str,
}

/// Every legal edge. Anything not listed here is illegal for every role.
pub const TRANSITIONS: &[Transition] = &[
    Transition {
        from: Submitted,
        to: Assigned,
        authority: Authority::FieldOfficer,
        reason: "Complaint assigned for action",
    },
    Transition {
        from: Submitted,
        to: Rejected,
        authority: Authority::Supervisor,
        reason: "Complaint rejected during review",
    },
    Transition {
        from: Assigned,
        to: InProgress,
        authority: Authority::FieldOfficer,
        reason: "Work started on complaint",
    },
    Transition {
        from: Assigned,
        to: Rejected,
        authority: Authority::Supervisor,
        reason: "Complaint rejected after assignment",
    },
    Transition {
        from: InProgress,
        to: Resolved,
        authority: Authority::FieldOfficer,
        reason: "Work completed, pending approval",
    },
    Transition {
        from: InProgress,
        to: Assigned,
        authority: Authority::Supervisor,
        reason: "Complaint returned for reassignment",
    },
    Transition {
        from: Resolved,
        to: Closed,
        authority: Authority::Supervisor,
        reason: "Work approved and complaint closed",
    },
    Transition {
        from: Resolved,
        to: InProgress,
        authority: Authority::Supervisor,
        reason: "Work rejected, complaint reopened",
    },
];

/// Fallback note for an edge missing from [`TRANSITIONS`].
const GENERIC_REASON: &str = "Status updated";

/// A requested transition was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("Invalid status transition from '{from}' to '{to}'")]
    IllegalTransition {
        from: ComplaintStatus,
        to: ComplaintStatus,
    },

    #[error("Role '{role}' may not move a complaint from '{from}' to '{to}'")]
    NotPermitted {
        role: Role,
        from: ComplaintStatus,
        to: ComplaintStatus,
    },

    #[error("Complaint is '{status}'; only resolved work can be approved or rejected")]
    ApprovalNotPending { status: ComplaintStatus },

    #[error(transparent)]
    Unrecognized(#[from] ParseEnumError),
}

/// How a nullable column is affected by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldChange<T> {
    Keep,
    Set(T),
    Clear,
}

impl<T> FieldChange<T> {
    /// Apply the change to the current column value.
    pub fn apply(self, current: Option<T>) -> Option<T> {
        match self {
            FieldChange::Keep => current,
            FieldChange::Set(value) => Some(value),
            FieldChange::Clear => None,
        }
    }
}

/// Input to [`WorkflowValidator::plan_transition`].
#[derive(Debug, Clone, Copy)]
pub struct TransitionRequest<'a> {
    pub current: ComplaintStatus,
    pub target: ComplaintStatus,
    pub role: Role,
    /// Free-text note for the status log.
    pub note: Option<&'a str>,
    /// Reason recorded when work is rejected or the complaint is dismissed.
    pub rejection_reason: Option<&'a str>,
}

/// The complete set of row effects of one validated transition.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionPlan {
    pub from: ComplaintStatus,
    pub to: ComplaintStatus,
    /// Note written to the status log.
    pub note: String,
    pub assigned_at: FieldChange<Timestamp>,
    pub resolved_at: FieldChange<Timestamp>,
    pub closed_at: FieldChange<Timestamp>,
    pub work_approved: FieldChange<bool>,
    pub rejection_reason: FieldChange<String>,
}

/// Stateless validator for complaint status transitions.
pub struct WorkflowValidator;

impl WorkflowValidator {
    fn edge(from: ComplaintStatus, to: ComplaintStatus) -> Option<&'static Transition> {
        TRANSITIONS.iter().find(|t| t.from == from && t.to == to)
    }

    /// Statuses reachable from `current` in one step, ignoring roles.
    pub fn allowed_transitions(current: ComplaintStatus) -> BTreeSet<ComplaintStatus> {
        TRANSITIONS
            .iter()
            .filter(|t| t.from == current)
            .map(|t| t.to)
            .collect()
    }

    /// Statuses `role` may move a complaint to from `current`.
    pub fn allowed_transitions_for(
        current: ComplaintStatus,
        role: Role,
    ) -> BTreeSet<ComplaintStatus> {
        TRANSITIONS
            .iter()
            .filter(|t| t.from == current && t.authority.admits(role))
            .map(|t| t.to)
            .collect()
    }

    /// Whether `role` may take the edge `current -> target`.
    ///
    /// Always `false` for an edge that is not in [`TRANSITIONS`].
    pub fn can_user_transition(
        current: ComplaintStatus,
        target: ComplaintStatus,
        role: Role,
    ) -> bool {
        Self::edge(current, target).is_some_and(|t| t.authority.admits(role))
    }

    /// Resolved work must be approved or rejected by a supervisor.
    pub fn requires_work_approval(status: ComplaintStatus) -> bool {
        status == Resolved
    }

    pub fn is_terminal_status(status: ComplaintStatus) -> bool {
        matches!(status, Closed | Rejected)
    }

    /// Canned note for an edge, used when the caller supplies none.
    pub fn transition_reason(from: ComplaintStatus, to: ComplaintStatus) -> &'static str {
        Self::edge(from, to).map_or(GENERIC_REASON, |t| t.reason)
    }

    /// Check a typed transition request.
    pub fn validate(
        current: ComplaintStatus,
        target: ComplaintStatus,
        role: Role,
    ) -> Result<(), WorkflowError> {
        let edge = Self::edge(current, target).ok_or(WorkflowError::IllegalTransition {
            from: current,
            to: target,
        })?;
        if !edge.authority.admits(role) {
            return Err(WorkflowError::NotPermitted {
                role,
                from: current,
                to: target,
            });
        }
        Ok(())
    }

    /// Validate a transition given the raw stored / token strings.
    pub fn validate_status_transition(
        old_status: &str,
        new_status: &str,
        role: &str,
    ) -> Result<(), WorkflowError> {
        let current: ComplaintStatus = old_status.parse()?;
        let target: ComplaintStatus = new_status.parse()?;
        let role: Role = role.parse()?;
        Self::validate(current, target, role)
    }

    /// Validate a transition and compute the column changes it implies.
    pub fn plan_transition(
        request: TransitionRequest<'_>,
        now: Timestamp,
    ) -> Result<TransitionPlan, WorkflowError> {
        let TransitionRequest {
            current,
            target,
            role,
            note,
            rejection_reason,
        } = request;
        Self::validate(current, target, role)?;

        let note = non_blank(note)
            .unwrap_or_else(|| Self::transition_reason(current, target))
            .to_string();

        let mut plan = TransitionPlan {
            from: current,
            to: target,
            note,
            assigned_at: FieldChange::Keep,
            resolved_at: FieldChange::Keep,
            closed_at: FieldChange::Keep,
            work_approved: FieldChange::Keep,
            rejection_reason: FieldChange::Keep,
        };

        match (current, target) {
            (_, Assigned) => plan.assigned_at = FieldChange::Set(now),
            (_, Resolved) => {
                plan.resolved_at = FieldChange::Set(now);
                plan.work_approved = FieldChange::Clear;
            }
            (Resolved, Closed) => {
                plan.closed_at = FieldChange::Set(now);
                plan.work_approved = FieldChange::Set(true);
            }
            (Resolved, InProgress) => {
                plan.resolved_at = FieldChange::Clear;
                plan.work_approved = FieldChange::Set(false);
                plan.rejection_reason = FieldChange::Set(
                    non_blank(rejection_reason)
                        .unwrap_or(plan.note.as_str())
                        .to_string(),
                );
            }
            (_, Rejected) => {
                plan.rejection_reason = FieldChange::Set(
                    non_blank(rejection_reason)
                        .unwrap_or(plan.note.as_str())
                        .to_string(),
                );
            }
            _ => {}
        }

        Ok(plan)
    }

    /// Plan the supervisory approval of resolved work (RESOLVED -> CLOSED).
    pub fn plan_approval(
        current: ComplaintStatus,
        role: Role,
        note: Option<&str>,
        now: Timestamp,
    ) -> Result<TransitionPlan, WorkflowError> {
        if !Self::requires_work_approval(current) {
            return Err(WorkflowError::ApprovalNotPending { status: current });
        }
        Self::plan_transition(
            TransitionRequest {
                current,
                target: Closed,
                role,
                note,
                rejection_reason: None,
            },
            now,
        )
    }

    /// Plan the supervisory rejection of resolved work (RESOLVED -> IN_PROGRESS).
    pub fn plan_work_rejection(
        current: ComplaintStatus,
        role: Role,
        reason: &str,
        now: Timestamp,
    ) -> Result<TransitionPlan, WorkflowError> {
        if !Self::requires_work_approval(current) {
            return Err(WorkflowError::ApprovalNotPending { status: current });
        }
        Self::plan_transition(
            TransitionRequest {
                current,
                target: InProgress,
                role,
                note: Some(reason),
                rejection_reason: Some(reason),
            },
            now,
        )
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
