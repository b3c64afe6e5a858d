//! Repository for the `complaints` table.
//!
//! Status and ownership changes run inside a caller-owned transaction so the
//! workflow check, the row update and the status log append commit together.

use janasamparka_core::complaint::{AssignmentType, ComplaintStatus};
use janasamparka_core::jurisdiction::AssignmentChange;
use janasamparka_core::types::DbId;
use janasamparka_core::workflow::TransitionPlan;
use sqlx::{PgConnection, PgPool};

use crate::models::complaint::{Complaint, CreateComplaint};
use crate::models::status_log::CreateStatusLog;
use crate::repositories::StatusLogRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, constituency_id, user_id, title, description, category, \
    location_text, status, priority, assignment_type, ward_id, department_id, \
    gram_panchayat_id, taluk_panchayat_id, zilla_panchayat_id, assigned_at, resolved_at, \
    closed_at, work_approved, approved_by, approved_at, rejection_reason, created_at, updated_at";

/// Note written to the log entry created with a new complaint.
const SUBMITTED_NOTE: &str = "Complaint submitted";

/// Listing filter. `None` fields do not constrain the result.
#[derive(Debug, Clone, Default)]
pub struct ComplaintFilter {
    pub constituency_id: Option<DbId>,
    pub user_id: Option<DbId>,
    pub status: Option<ComplaintStatus>,
    /// Restrict to complaints currently owned by this unit.
    pub owner: Option<(AssignmentType, DbId)>,
}

/// The foreign key column holding a unit of `kind`.
fn unit_column(kind: AssignmentType) -> &'static str {
    match kind {
        AssignmentType::Ward => "ward_id",
        AssignmentType::Department => "department_id",
        AssignmentType::GramPanchayat => "gram_panchayat_id",
        AssignmentType::TalukPanchayat => "taluk_panchayat_id",
        AssignmentType::ZillaPanchayat => "zilla_panchayat_id",
    }
}

/// Provides CRUD and workflow operations for complaints.
pub struct ComplaintRepo;

impl ComplaintRepo {
    /// Insert a new complaint in `submitted` state together with its first
    /// status log entry, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateComplaint) -> Result<Complaint, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO complaints
                (constituency_id, user_id, title, description, category, location_text,
                 priority, assignment_type, ward_id, gram_panchayat_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        let complaint = sqlx::query_as::<_, Complaint>(&query)
            .bind(input.constituency_id)
            .bind(input.user_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.location_text)
            .bind(input.priority.as_str())
            .bind(input.initial_assignment().map(AssignmentType::as_str))
            .bind(input.ward_id)
            .bind(input.gram_panchayat_id)
            .fetch_one(&mut *tx)
            .await?;

        StatusLogRepo::append(
            &mut tx,
            &CreateStatusLog {
                complaint_id: complaint.id,
                old_status: None,
                new_status: ComplaintStatus::Submitted,
                changed_by: Some(input.user_id),
                note: Some(SUBMITTED_NOTE.to_string()),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(complaint)
    }

    /// Find a complaint by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Complaint>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM complaints WHERE id = $1");
        sqlx::query_as::<_, Complaint>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a complaint and lock its row until the transaction ends.
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Complaint>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM complaints WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Complaint>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List complaints matching `filter`, newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &ComplaintFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Complaint>, sqlx::Error> {
        // Build the WHERE clause and track the next bind parameter index.
        let mut conditions: Vec<String> = Vec::new();
        let mut bind_idx: u32 = 1;

        if filter.constituency_id.is_some() {
            conditions.push(format!("constituency_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.user_id.is_some() {
            conditions.push(format!("user_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.status.is_some() {
            conditions.push(format!("status = ${bind_idx}"));
            bind_idx += 1;
        }
        if let Some((kind, _)) = filter.owner {
            conditions.push(format!(
                "assignment_type = ${bind_idx} AND {} = ${}",
                unit_column(kind),
                bind_idx + 1
            ));
            bind_idx += 2;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM complaints \
             {where_clause} \
             ORDER BY created_at DESC, id DESC \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1,
        );

        let mut q = sqlx::query_as::<_, Complaint>(&query);
        if let Some(constituency_id) = filter.constituency_id {
            q = q.bind(constituency_id);
        }
        if let Some(user_id) = filter.user_id {
            q = q.bind(user_id);
        }
        if let Some(status) = filter.status {
            q = q.bind(status.as_str());
        }
        if let Some((kind, unit_id)) = filter.owner {
            q = q.bind(kind.as_str()).bind(unit_id);
        }

        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Apply a validated status transition and append its log entry.
    ///
    /// `current` must be the row as read by [`find_for_update`](Self::find_for_update)
    /// in the same transaction.
    pub async fn apply_transition(
        conn: &mut PgConnection,
        current: &Complaint,
        plan: &TransitionPlan,
        changed_by: DbId,
    ) -> Result<Complaint, sqlx::Error> {
        let plan = plan.clone();
        let closing = plan.to == ComplaintStatus::Closed;
        let approved_by = if closing { Some(changed_by) } else { current.approved_by };
        let closed_at = plan.closed_at.apply(current.closed_at);
        let approved_at = if closing { closed_at } else { current.approved_at };

        let query = format!(
            "UPDATE complaints SET
                status = $2,
                assigned_at = $3,
                resolved_at = $4,
                closed_at = $5,
                work_approved = $6,
                rejection_reason = $7,
                approved_by = $8,
                approved_at = $9
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Complaint>(&query)
            .bind(current.id)
            .bind(plan.to.as_str())
            .bind(plan.assigned_at.apply(current.assigned_at))
            .bind(plan.resolved_at.apply(current.resolved_at))
            .bind(closed_at)
            .bind(plan.work_approved.apply(current.work_approved))
            .bind(plan.rejection_reason.apply(current.rejection_reason.clone()))
            .bind(approved_by)
            .bind(approved_at)
            .fetch_one(&mut *conn)
            .await?;

        StatusLogRepo::append(
            conn,
            &CreateStatusLog {
                complaint_id: current.id,
                old_status: Some(plan.from),
                new_status: plan.to,
                changed_by: Some(changed_by),
                note: Some(plan.note),
            },
        )
        .await?;

        Ok(updated)
    }

    /// Re-point the complaint's owning unit. Status is left untouched.
    pub async fn apply_assignment(
        conn: &mut PgConnection,
        id: DbId,
        change: &AssignmentChange,
    ) -> Result<Complaint, sqlx::Error> {
        let query = format!(
            "UPDATE complaints SET assignment_type = $2, {} = $3
             WHERE id = $1
             RETURNING {COLUMNS}",
            unit_column(change.assignment_type)
        );
        sqlx::query_as::<_, Complaint>(&query)
            .bind(id)
            .bind(change.assignment_type.as_str())
            .bind(change.unit_id)
            .fetch_one(conn)
            .await
    }
}
