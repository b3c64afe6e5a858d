//! Status log models. Rows are append-only (no `updated_at`).

use janasamparka_core::complaint::ComplaintStatus;
use janasamparka_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `status_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StatusLog {
    pub id: DbId,
    pub complaint_id: DbId,
    /// `None` for the entry written when the complaint is filed.
    pub old_status: Option<String>,
    pub new_status: String,
    pub changed_by: Option<DbId>,
    pub note: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for appending a status log entry.
#[derive(Debug, Clone)]
pub struct CreateStatusLog {
    pub complaint_id: DbId,
    pub old_status: Option<ComplaintStatus>,
    pub new_status: ComplaintStatus,
    pub changed_by: Option<DbId>,
    pub note: Option<String>,
}
