//! Repository for the append-only `status_logs` table.

use janasamparka_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::status_log::{CreateStatusLog, StatusLog};

/// Column list for `status_logs` queries.
const COLUMNS: &str = "id, complaint_id, old_status, new_status, changed_by, note, created_at";

/// Append and read operations for status logs. There is no update or delete.
pub struct StatusLogRepo;

impl StatusLogRepo {
    /// Append one entry inside the caller's transaction.
    pub async fn append(
        conn: &mut PgConnection,
        input: &CreateStatusLog,
    ) -> Result<StatusLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO status_logs (complaint_id, old_status, new_status, changed_by, note)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StatusLog>(&query)
            .bind(input.complaint_id)
            .bind(input.old_status.map(|s| s.as_str()))
            .bind(input.new_status.as_str())
            .bind(input.changed_by)
            .bind(&input.note)
            .fetch_one(conn)
            .await
    }

    /// All entries for a complaint, oldest first.
    pub async fn list_for_complaint(
        pool: &PgPool,
        complaint_id: DbId,
    ) -> Result<Vec<StatusLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM status_logs
             WHERE complaint_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, StatusLog>(&query)
            .bind(complaint_id)
            .fetch_all(pool)
            .await
    }

    /// Number of entries recorded for a complaint.
    pub async fn count_for_complaint(pool: &PgPool, complaint_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM status_logs WHERE complaint_id = $1")
            .bind(complaint_id)
            .fetch_one(pool)
            .await
    }
}
