//! Complaint entity model and DTOs.

use janasamparka_core::complaint::{AssignmentType, ComplaintStatus, Priority};
use janasamparka_core::types::{DbId, ParseEnumError, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `complaints` table.
///
/// `status`, `priority` and `assignment_type` are stored as text; use the
/// typed accessors to work with them.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Complaint {
    pub id: DbId,
    pub constituency_id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub location_text: Option<String>,
    pub status: String,
    pub priority: String,
    pub assignment_type: Option<String>,
    pub ward_id: Option<DbId>,
    pub department_id: Option<DbId>,
    pub gram_panchayat_id: Option<DbId>,
    pub taluk_panchayat_id: Option<DbId>,
    pub zilla_panchayat_id: Option<DbId>,
    pub assigned_at: Option<Timestamp>,
    pub resolved_at: Option<Timestamp>,
    pub closed_at: Option<Timestamp>,
    pub work_approved: Option<bool>,
    pub approved_by: Option<DbId>,
    pub approved_at: Option<Timestamp>,
    pub rejection_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Complaint {
    pub fn status(&self) -> Result<ComplaintStatus, ParseEnumError> {
        self.status.parse()
    }

    pub fn priority(&self) -> Result<Priority, ParseEnumError> {
        self.priority.parse()
    }

    pub fn assignment_type(&self) -> Result<Option<AssignmentType>, ParseEnumError> {
        self.assignment_type.as_deref().map(str::parse).transpose()
    }

    /// The foreign key column for a unit kind.
    pub fn unit_id(&self, kind: AssignmentType) -> Option<DbId> {
        match kind {
            AssignmentType::Ward => self.ward_id,
            AssignmentType::Department => self.department_id,
            AssignmentType::GramPanchayat => self.gram_panchayat_id,
            AssignmentType::TalukPanchayat => self.taluk_panchayat_id,
            AssignmentType::ZillaPanchayat => self.zilla_panchayat_id,
        }
    }

    /// The unit currently responsible, as `(kind, id)`.
    pub fn owner(&self) -> Result<Option<(AssignmentType, DbId)>, ParseEnumError> {
        Ok(self
            .assignment_type()?
            .and_then(|kind| self.unit_id(kind).map(|id| (kind, id))))
    }
}

/// DTO for filing a new complaint.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateComplaint {
    pub constituency_id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub location_text: Option<String>,
    pub priority: Priority,
    pub ward_id: Option<DbId>,
    pub gram_panchayat_id: Option<DbId>,
}

impl CreateComplaint {
    /// Initial owning unit: the ward if given, otherwise the gram panchayat.
    pub fn initial_assignment(&self) -> Option<AssignmentType> {
        if self.ward_id.is_some() {
            Some(AssignmentType::Ward)
        } else if self.gram_panchayat_id.is_some() {
            Some(AssignmentType::GramPanchayat)
        } else {
            None
        }
    }
}
