//! The closed set of user roles.
//!
//! These must match the `CHECK` constraint on `users.role` in
//! `20260301000003_create_users_table.sql`.

use crate::complaint::AssignmentType;

define_text_enum! {
    /// Role carried in the access token and stored on the user row.
    Role("role") {
        /// Files complaints; cannot change status.
        Citizen => "citizen",
        WardOfficer => "ward_officer",
        DepartmentOfficer => "department_officer",
        /// Gram panchayat development officer.
        GpOfficer => "gp_officer",
        TpOfficer => "tp_officer",
        ZpOfficer => "zp_officer",
        Moderator => "moderator",
        /// The constituency's elected representative.
        Mla => "mla",
        Admin => "admin",
    }
}

impl Role {
    /// Admin, MLA and moderator: may approve or reject completed work.
    pub fn is_supervisor(self) -> bool {
        matches!(self, Self::Admin | Self::Mla | Self::Moderator)
    }

    /// Officers bound to a single jurisdiction unit.
    pub fn is_field_officer(self) -> bool {
        self.unit_kind().is_some()
    }

    /// The kind of unit an officer of this role is bound to.
    pub fn unit_kind(self) -> Option<AssignmentType> {
        match self {
            Self::WardOfficer => Some(AssignmentType::Ward),
            Self::DepartmentOfficer => Some(AssignmentType::Department),
            Self::GpOfficer => Some(AssignmentType::GramPanchayat),
            Self::TpOfficer => Some(AssignmentType::TalukPanchayat),
            Self::ZpOfficer => Some(AssignmentType::ZillaPanchayat),
            Self::Citizen | Self::Moderator | Self::Mla | Self::Admin => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supervisors_are_admin_mla_moderator() {
        let supervisors: Vec<Role> = Role::ALL
            .iter()
            .copied()
            .filter(|r| r.is_supervisor())
            .collect();
        assert_eq!(supervisors, vec![Role::Moderator, Role::Mla, Role::Admin]);
    }

    #[test]
    fn citizen_is_neither_officer_nor_supervisor() {
        assert!(!Role::Citizen.is_field_officer());
        assert!(!Role::Citizen.is_supervisor());
    }

    #[test]
    fn officers_map_to_their_unit_kind() {
        assert_eq!(Role::WardOfficer.unit_kind(), Some(AssignmentType::Ward));
        assert_eq!(
            Role::TpOfficer.unit_kind(),
            Some(AssignmentType::TalukPanchayat)
        );
        assert_eq!(Role::Admin.unit_kind(), None);
    }

    #[test]
    fn role_parses_from_token_text() {
        assert_eq!("department_officer".parse::<Role>(), Ok(Role::DepartmentOfficer));
        assert!("superuser".parse::<Role>().is_err());
    }
}
