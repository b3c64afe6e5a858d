//! Jurisdiction routing rules.
//!
//! A complaint is owned by exactly one unit at a time (a ward, a department
//! or one panchayat tier). [`validate_routing`] is the single place that
//! decides whether an actor may re-point that ownership to a given target;
//! it never touches the complaint's status.

use crate::complaint::{AssignmentType, ComplaintStatus};
use crate::roles::Role;
use crate::types::DbId;

/// A jurisdiction unit, resolved together with its upward links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitRef {
    pub kind: AssignmentType,
    pub id: DbId,
    pub constituency_id: DbId,
    /// Parent taluk panchayat (gram panchayats only).
    pub taluk_panchayat_id: Option<DbId>,
    /// Zilla panchayat reached upwards (gram and taluk panchayats).
    pub zilla_panchayat_id: Option<DbId>,
}

/// The user requesting a routing change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: DbId,
    pub role: Role,
    pub constituency_id: Option<DbId>,
    /// The unit a field officer is bound to (matching `role.unit_kind()`).
    pub unit_id: Option<DbId>,
}

impl Actor {
    /// Whether this actor supervises complaints of `constituency_id`.
    /// Admins supervise every constituency.
    pub fn governs(&self, constituency_id: DbId) -> bool {
        self.role.is_supervisor()
            && (self.role == Role::Admin || self.constituency_id == Some(constituency_id))
    }

    /// Whether this actor's own unit currently owns the complaint.
    pub fn owns(&self, placement: &Placement) -> bool {
        match (&placement.owner, self.role.unit_kind(), self.unit_id) {
            (Some(owner), Some(kind), Some(unit_id)) => owner.kind == kind && owner.id == unit_id,
            _ => false,
        }
    }

    /// Supervisors act within their constituency, field officers on
    /// complaints their unit owns. Citizens never act.
    pub fn check_scope(&self, placement: &Placement) -> Result<(), RoutingError> {
        if self.role.is_supervisor() {
            if !self.governs(placement.constituency_id) {
                return Err(RoutingError::Forbidden(
                    "Complaint belongs to another constituency".to_string(),
                ));
            }
            return Ok(());
        }
        if !self.owns(placement) {
            let unit = self.role.unit_kind().map_or("unit", AssignmentType::label);
            return Err(RoutingError::Forbidden(format!(
                "Complaint is not assigned to your {unit}"
            )));
        }
        Ok(())
    }
}

/// Where a complaint currently sits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub constituency_id: DbId,
    pub status: ComplaintStatus,
    /// The owning unit, if the complaint has one.
    pub owner: Option<UnitRef>,
}

/// A requested change of ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingAction {
    /// Ward officer hands a complaint from their ward to a department.
    WardToDepartment,
    /// Gram panchayat officer escalates to the parent taluk panchayat.
    EscalateToTaluk,
    /// Taluk panchayat officer escalates to the parent zilla panchayat.
    EscalateToZilla,
    /// Taluk or zilla panchayat officer sends a complaint down to a gram panchayat.
    ReassignToGramPanchayat,
    /// Panchayat officer of the owning tier transfers to a department.
    TransferToDepartment,
    /// Admin, MLA or moderator assigns to a department.
    SupervisorAssignDepartment,
}

impl RoutingAction {
    /// The kind of unit this action routes to.
    pub fn target_kind(self) -> AssignmentType {
        match self {
            Self::WardToDepartment
            | Self::TransferToDepartment
            | Self::SupervisorAssignDepartment => AssignmentType::Department,
            Self::EscalateToTaluk => AssignmentType::TalukPanchayat,
            Self::EscalateToZilla => AssignmentType::ZillaPanchayat,
            Self::ReassignToGramPanchayat => AssignmentType::GramPanchayat,
        }
    }

    /// Event name published after the change commits.
    pub fn event_type(self) -> &'static str {
        match self {
            Self::WardToDepartment | Self::SupervisorAssignDepartment => {
                "complaint.assigned_department"
            }
            Self::EscalateToTaluk | Self::EscalateToZilla => "complaint.escalated",
            Self::ReassignToGramPanchayat => "complaint.reassigned",
            Self::TransferToDepartment => "complaint.transferred",
        }
    }
}

/// The validated ownership change to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentChange {
    pub assignment_type: AssignmentType,
    pub unit_id: DbId,
}

/// A routing request was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoutingError {
    /// The actor lacks authority over the complaint (HTTP 403).
    #[error("{0}")]
    Forbidden(String),
    /// The target is unsuitable for this complaint (HTTP 400).
    #[error("{0}")]
    Invalid(String),
}

/// Decide whether `actor` may route the complaint at `placement` to `target`.
pub fn validate_routing(
    actor: &Actor,
    placement: &Placement,
    action: RoutingAction,
    target: &UnitRef,
) -> Result<AssignmentChange, RoutingError> {
    if matches!(
        placement.status,
        ComplaintStatus::Closed | ComplaintStatus::Rejected
    ) {
        return Err(RoutingError::Invalid(format!(
            "Cannot reassign a {} complaint",
            placement.status
        )));
    }

    check_authority(actor, placement, action)?;

    let expected = action.target_kind();
    if target.kind != expected {
        return Err(RoutingError::Invalid(format!(
            "Target must be a {}, got a {}",
            expected.label(),
            target.kind.label()
        )));
    }

    if target.constituency_id != placement.constituency_id {
        return Err(RoutingError::Invalid(format!(
            "{} {} does not belong to the complaint's constituency",
            target.kind.label(),
            target.id
        )));
    }

    check_hierarchy(actor, placement, action, target)?;

    Ok(AssignmentChange {
        assignment_type: target.kind,
        unit_id: target.id,
    })
}

/// Role and ownership checks (403 on failure).
fn check_authority(
    actor: &Actor,
    placement: &Placement,
    action: RoutingAction,
) -> Result<(), RoutingError> {
    let allowed: &[Role] = match action {
        RoutingAction::WardToDepartment => &[Role::WardOfficer],
        RoutingAction::EscalateToTaluk => &[Role::GpOfficer],
        RoutingAction::EscalateToZilla => &[Role::TpOfficer],
        RoutingAction::ReassignToGramPanchayat => &[Role::TpOfficer, Role::ZpOfficer],
        RoutingAction::TransferToDepartment => {
            &[Role::GpOfficer, Role::TpOfficer, Role::ZpOfficer]
        }
        RoutingAction::SupervisorAssignDepartment => &[Role::Admin, Role::Mla, Role::Moderator],
    };
    if !allowed.contains(&actor.role) {
        return Err(RoutingError::Forbidden(format!(
            "Role '{}' may not perform this reassignment",
            actor.role
        )));
    }

    actor.check_scope(placement)
}

/// Parent/child relationship checks between the owner and the target (400).
fn check_hierarchy(
    actor: &Actor,
    placement: &Placement,
    action: RoutingAction,
    target: &UnitRef,
) -> Result<(), RoutingError> {
    match action {
        RoutingAction::EscalateToTaluk => {
            let parent = placement.owner.as_ref().and_then(|o| o.taluk_panchayat_id);
            if parent != Some(target.id) {
                return Err(RoutingError::Invalid(format!(
                    "Taluk Panchayat {} is not the parent of this Gram Panchayat",
                    target.id
                )));
            }
        }
        RoutingAction::EscalateToZilla => {
            let parent = placement.owner.as_ref().and_then(|o| o.zilla_panchayat_id);
            if parent != Some(target.id) {
                return Err(RoutingError::Invalid(format!(
                    "Zilla Panchayat {} is not the parent of this Taluk Panchayat",
                    target.id
                )));
            }
        }
        RoutingAction::ReassignToGramPanchayat => {
            let reports_up = match actor.role {
                Role::TpOfficer => target.taluk_panchayat_id == actor.unit_id,
                Role::ZpOfficer => target.zilla_panchayat_id == actor.unit_id,
                _ => false,
            };
            if !reports_up {
                return Err(RoutingError::Invalid(format!(
                    "Gram Panchayat {} is outside your jurisdiction",
                    target.id
                )));
            }
        }
        RoutingAction::WardToDepartment
        | RoutingAction::TransferToDepartment
        | RoutingAction::SupervisorAssignDepartment => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const CONSTITUENCY: DbId = 1;
    const OTHER_CONSTITUENCY: DbId = 2;

    fn unit(kind: AssignmentType, id: DbId) -> UnitRef {
        UnitRef {
            kind,
            id,
            constituency_id: CONSTITUENCY,
            taluk_panchayat_id: None,
            zilla_panchayat_id: None,
        }
    }

    fn gp(id: DbId, tp: DbId, zp: DbId) -> UnitRef {
        UnitRef {
            taluk_panchayat_id: Some(tp),
            zilla_panchayat_id: Some(zp),
            ..unit(AssignmentType::GramPanchayat, id)
        }
    }

    fn tp(id: DbId, zp: DbId) -> UnitRef {
        UnitRef {
            zilla_panchayat_id: Some(zp),
            ..unit(AssignmentType::TalukPanchayat, id)
        }
    }

    fn officer(role: Role, unit_id: DbId) -> Actor {
        Actor {
            user_id: 100,
            role,
            constituency_id: Some(CONSTITUENCY),
            unit_id: Some(unit_id),
        }
    }

    fn placed_at(owner: UnitRef) -> Placement {
        Placement {
            constituency_id: CONSTITUENCY,
            status: ComplaintStatus::Submitted,
            owner: Some(owner),
        }
    }

    // -- ward -> department --------------------------------------------------

    #[test]
    fn ward_officer_assigns_own_ward_to_department() {
        let change = validate_routing(
            &officer(Role::WardOfficer, 7),
            &placed_at(unit(AssignmentType::Ward, 7)),
            RoutingAction::WardToDepartment,
            &unit(AssignmentType::Department, 3),
        )
        .unwrap();
        assert_eq!(
            change,
            AssignmentChange {
                assignment_type: AssignmentType::Department,
                unit_id: 3
            }
        );
    }

    #[test]
    fn ward_officer_cannot_assign_other_ward() {
        assert_matches!(
            validate_routing(
                &officer(Role::WardOfficer, 7),
                &placed_at(unit(AssignmentType::Ward, 8)),
                RoutingAction::WardToDepartment,
                &unit(AssignmentType::Department, 3),
            ),
            Err(RoutingError::Forbidden(msg)) if msg.contains("Ward")
        );
    }

    #[test]
    fn department_officer_cannot_use_ward_assignment() {
        assert_matches!(
            validate_routing(
                &officer(Role::DepartmentOfficer, 3),
                &placed_at(unit(AssignmentType::Ward, 7)),
                RoutingAction::WardToDepartment,
                &unit(AssignmentType::Department, 3),
            ),
            Err(RoutingError::Forbidden(_))
        );
    }

    #[test]
    fn department_in_other_constituency_is_invalid() {
        let target = UnitRef {
            constituency_id: OTHER_CONSTITUENCY,
            ..unit(AssignmentType::Department, 3)
        };
        assert_matches!(
            validate_routing(
                &officer(Role::WardOfficer, 7),
                &placed_at(unit(AssignmentType::Ward, 7)),
                RoutingAction::WardToDepartment,
                &target,
            ),
            Err(RoutingError::Invalid(msg)) if msg.contains("constituency")
        );
    }

    #[test]
    fn target_kind_must_match_action() {
        assert_matches!(
            validate_routing(
                &officer(Role::WardOfficer, 7),
                &placed_at(unit(AssignmentType::Ward, 7)),
                RoutingAction::WardToDepartment,
                &unit(AssignmentType::Ward, 9),
            ),
            Err(RoutingError::Invalid(_))
        );
    }

    #[test]
    fn closed_complaints_cannot_be_routed() {
        let placement = Placement {
            status: ComplaintStatus::Closed,
            ..placed_at(unit(AssignmentType::Ward, 7))
        };
        assert_matches!(
            validate_routing(
                &officer(Role::WardOfficer, 7),
                &placement,
                RoutingAction::WardToDepartment,
                &unit(AssignmentType::Department, 3),
            ),
            Err(RoutingError::Invalid(_))
        );
    }

    // -- escalation ----------------------------------------------------------

    #[test]
    fn gp_officer_escalates_to_parent_taluk() {
        let change = validate_routing(
            &officer(Role::GpOfficer, 11),
            &placed_at(gp(11, 21, 31)),
            RoutingAction::EscalateToTaluk,
            &tp(21, 31),
        )
        .unwrap();
        assert_eq!(change.assignment_type, AssignmentType::TalukPanchayat);
        assert_eq!(change.unit_id, 21);
    }

    #[test]
    fn escalation_to_unrelated_taluk_is_invalid() {
        assert_matches!(
            validate_routing(
                &officer(Role::GpOfficer, 11),
                &placed_at(gp(11, 21, 31)),
                RoutingAction::EscalateToTaluk,
                &tp(22, 31),
            ),
            Err(RoutingError::Invalid(_))
        );
    }

    #[test]
    fn tp_officer_cannot_escalate_to_taluk() {
        assert_matches!(
            validate_routing(
                &officer(Role::TpOfficer, 21),
                &placed_at(gp(11, 21, 31)),
                RoutingAction::EscalateToTaluk,
                &tp(21, 31),
            ),
            Err(RoutingError::Forbidden(_))
        );
    }

    #[test]
    fn tp_officer_escalates_to_parent_zilla() {
        let change = validate_routing(
            &officer(Role::TpOfficer, 21),
            &placed_at(tp(21, 31)),
            RoutingAction::EscalateToZilla,
            &unit(AssignmentType::ZillaPanchayat, 31),
        )
        .unwrap();
        assert_eq!(change.assignment_type, AssignmentType::ZillaPanchayat);
    }

    // -- reassignment down ---------------------------------------------------

    #[test]
    fn tp_officer_reassigns_to_child_gp() {
        let change = validate_routing(
            &officer(Role::TpOfficer, 21),
            &placed_at(tp(21, 31)),
            RoutingAction::ReassignToGramPanchayat,
            &gp(12, 21, 31),
        )
        .unwrap();
        assert_eq!(change.unit_id, 12);
    }

    #[test]
    fn zp_officer_reassigns_to_gp_under_any_of_its_taluks() {
        let change = validate_routing(
            &officer(Role::ZpOfficer, 31),
            &placed_at(unit(AssignmentType::ZillaPanchayat, 31)),
            RoutingAction::ReassignToGramPanchayat,
            &gp(13, 22, 31),
        )
        .unwrap();
        assert_eq!(change.assignment_type, AssignmentType::GramPanchayat);
    }

    #[test]
    fn tp_officer_cannot_reassign_to_foreign_gp() {
        assert_matches!(
            validate_routing(
                &officer(Role::TpOfficer, 21),
                &placed_at(tp(21, 31)),
                RoutingAction::ReassignToGramPanchayat,
                &gp(14, 22, 31),
            ),
            Err(RoutingError::Invalid(msg)) if msg.contains("outside")
        );
    }

    #[test]
    fn gp_officer_cannot_reassign_down() {
        assert_matches!(
            validate_routing(
                &officer(Role::GpOfficer, 11),
                &placed_at(gp(11, 21, 31)),
                RoutingAction::ReassignToGramPanchayat,
                &gp(12, 21, 31),
            ),
            Err(RoutingError::Forbidden(_))
        );
    }

    // -- transfer to department ----------------------------------------------

    #[test]
    fn owning_tier_transfers_to_department() {
        for (role, owner) in [
            (Role::GpOfficer, gp(11, 21, 31)),
            (Role::TpOfficer, tp(21, 31)),
            (Role::ZpOfficer, unit(AssignmentType::ZillaPanchayat, 31)),
        ] {
            let actor = officer(role, owner.id);
            let change = validate_routing(
                &actor,
                &placed_at(owner),
                RoutingAction::TransferToDepartment,
                &unit(AssignmentType::Department, 5),
            )
            .unwrap();
            assert_eq!(change.assignment_type, AssignmentType::Department);
        }
    }

    #[test]
    fn non_owning_tier_cannot_transfer() {
        assert_matches!(
            validate_routing(
                &officer(Role::ZpOfficer, 31),
                &placed_at(gp(11, 21, 31)),
                RoutingAction::TransferToDepartment,
                &unit(AssignmentType::Department, 5),
            ),
            Err(RoutingError::Forbidden(_))
        );
    }

    // -- supervisors ---------------------------------------------------------

    #[test]
    fn moderator_assigns_unowned_complaint() {
        let actor = Actor {
            user_id: 1,
            role: Role::Moderator,
            constituency_id: Some(CONSTITUENCY),
            unit_id: None,
        };
        let placement = Placement {
            constituency_id: CONSTITUENCY,
            status: ComplaintStatus::Submitted,
            owner: None,
        };
        assert!(validate_routing(
            &actor,
            &placement,
            RoutingAction::SupervisorAssignDepartment,
            &unit(AssignmentType::Department, 5),
        )
        .is_ok());
    }

    #[test]
    fn mla_of_other_constituency_is_forbidden() {
        let actor = Actor {
            user_id: 1,
            role: Role::Mla,
            constituency_id: Some(OTHER_CONSTITUENCY),
            unit_id: None,
        };
        assert_matches!(
            validate_routing(
                &actor,
                &placed_at(unit(AssignmentType::Ward, 7)),
                RoutingAction::SupervisorAssignDepartment,
                &unit(AssignmentType::Department, 5),
            ),
            Err(RoutingError::Forbidden(_))
        );
    }

    #[test]
    fn admin_is_not_bound_to_a_constituency() {
        let actor = Actor {
            user_id: 1,
            role: Role::Admin,
            constituency_id: None,
            unit_id: None,
        };
        assert!(validate_routing(
            &actor,
            &placed_at(unit(AssignmentType::Ward, 7)),
            RoutingAction::SupervisorAssignDepartment,
            &unit(AssignmentType::Department, 5),
        )
        .is_ok());
    }

    // -- scope checks --------------------------------------------------------

    #[test]
    fn citizen_has_no_scope() {
        let citizen = Actor {
            user_id: 5,
            role: Role::Citizen,
            constituency_id: Some(CONSTITUENCY),
            unit_id: None,
        };
        let placement = placed_at(unit(AssignmentType::Ward, 7));
        assert!(!citizen.owns(&placement));
        assert!(!citizen.governs(CONSTITUENCY));
        assert_matches!(citizen.check_scope(&placement), Err(RoutingError::Forbidden(_)));
    }

    #[test]
    fn officer_scope_follows_current_owner() {
        let ward_officer = officer(Role::WardOfficer, 7);
        assert!(ward_officer.check_scope(&placed_at(unit(AssignmentType::Ward, 7))).is_ok());
        // Same id, different kind of unit.
        assert!(!ward_officer.owns(&placed_at(unit(AssignmentType::Department, 7))));
        let unowned = Placement {
            owner: None,
            ..placed_at(unit(AssignmentType::Ward, 7))
        };
        assert!(!ward_officer.owns(&unowned));
    }

    #[test]
    fn supervisor_scope_is_the_constituency() {
        let moderator = Actor {
            user_id: 2,
            role: Role::Moderator,
            constituency_id: Some(CONSTITUENCY),
            unit_id: None,
        };
        assert!(moderator.governs(CONSTITUENCY));
        assert!(!moderator.governs(OTHER_CONSTITUENCY));
    }
}
