//! Repository for constituencies and the jurisdiction unit tables
//! (`wards`, `departments`, `gram_panchayats`, `taluk_panchayats`,
//! `zilla_panchayats`).

use janasamparka_core::complaint::AssignmentType;
use janasamparka_core::jurisdiction::UnitRef;
use janasamparka_core::types::DbId;
use sqlx::PgPool;

use crate::models::jurisdiction::{Constituency, CreateUnit, Department, UnitRow};

/// Column list for `departments` queries.
const DEPARTMENT_COLUMNS: &str = "id, constituency_id, name, code, created_at, updated_at";

/// Provides lookups and inserts for jurisdiction units.
pub struct JurisdictionRepo;

impl JurisdictionRepo {
    /// Insert a constituency, returning the created row.
    pub async fn create_constituency(
        pool: &PgPool,
        name: &str,
        code: &str,
    ) -> Result<Constituency, sqlx::Error> {
        sqlx::query_as::<_, Constituency>(
            "INSERT INTO constituencies (name, code) VALUES ($1, $2)
             RETURNING id, name, code, created_at, updated_at",
        )
        .bind(name)
        .bind(code)
        .fetch_one(pool)
        .await
    }

    /// Insert a unit of `kind`, returning its generated ID.
    pub async fn create_unit(
        pool: &PgPool,
        kind: AssignmentType,
        input: &CreateUnit,
    ) -> Result<DbId, sqlx::Error> {
        match kind {
            AssignmentType::Ward => {
                sqlx::query_scalar(
                    "INSERT INTO wards (constituency_id, name, ward_number)
                     VALUES ($1, $2, COALESCE($3, (
                         SELECT COALESCE(MAX(ward_number), 0) + 1
                         FROM wards WHERE constituency_id = $1
                     )))
                     RETURNING id",
                )
                .bind(input.constituency_id)
                .bind(&input.name)
                .bind(input.number)
                .fetch_one(pool)
                .await
            }
            AssignmentType::Department => {
                sqlx::query_scalar(
                    "INSERT INTO departments (constituency_id, name, code)
                     VALUES ($1, $2, COALESCE($3, UPPER(REPLACE($2, ' ', '_'))))
                     RETURNING id",
                )
                .bind(input.constituency_id)
                .bind(&input.name)
                .bind(&input.code)
                .fetch_one(pool)
                .await
            }
            AssignmentType::ZillaPanchayat => {
                sqlx::query_scalar(
                    "INSERT INTO zilla_panchayats (constituency_id, name)
                     VALUES ($1, $2)
                     RETURNING id",
                )
                .bind(input.constituency_id)
                .bind(&input.name)
                .fetch_one(pool)
                .await
            }
            AssignmentType::TalukPanchayat => {
                sqlx::query_scalar(
                    "INSERT INTO taluk_panchayats (constituency_id, name, zilla_panchayat_id)
                     VALUES ($1, $2, $3)
                     RETURNING id",
                )
                .bind(input.constituency_id)
                .bind(&input.name)
                .bind(input.parent_id)
                .fetch_one(pool)
                .await
            }
            AssignmentType::GramPanchayat => {
                sqlx::query_scalar(
                    "INSERT INTO gram_panchayats (constituency_id, name, taluk_panchayat_id)
                     VALUES ($1, $2, $3)
                     RETURNING id",
                )
                .bind(input.constituency_id)
                .bind(&input.name)
                .bind(input.parent_id)
                .fetch_one(pool)
                .await
            }
        }
    }

    /// Resolve a unit together with its upward panchayat links.
    ///
    /// Returns `None` if no unit of `kind` has the given `id`.
    pub async fn find_unit(
        pool: &PgPool,
        kind: AssignmentType,
        id: DbId,
    ) -> Result<Option<UnitRef>, sqlx::Error> {
        let query = match kind {
            AssignmentType::Ward => {
                "SELECT id, constituency_id,
                        NULL::BIGINT AS taluk_panchayat_id, NULL::BIGINT AS zilla_panchayat_id
                 FROM wards WHERE id = $1"
            }
            AssignmentType::Department => {
                "SELECT id, constituency_id,
                        NULL::BIGINT AS taluk_panchayat_id, NULL::BIGINT AS zilla_panchayat_id
                 FROM departments WHERE id = $1"
            }
            AssignmentType::ZillaPanchayat => {
                "SELECT id, constituency_id,
                        NULL::BIGINT AS taluk_panchayat_id, NULL::BIGINT AS zilla_panchayat_id
                 FROM zilla_panchayats WHERE id = $1"
            }
            AssignmentType::TalukPanchayat => {
                "SELECT id, constituency_id,
                        NULL::BIGINT AS taluk_panchayat_id, zilla_panchayat_id
                 FROM taluk_panchayats WHERE id = $1"
            }
            AssignmentType::GramPanchayat => {
                "SELECT g.id, g.constituency_id, g.taluk_panchayat_id, t.zilla_panchayat_id
                 FROM gram_panchayats g
                 JOIN taluk_panchayats t ON t.id = g.taluk_panchayat_id
                 WHERE g.id = $1"
            }
        };

        let row = sqlx::query_as::<_, UnitRow>(query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(|r| r.into_unit_ref(kind)))
    }

    /// List the departments of a constituency, ordered by name.
    pub async fn list_departments(
        pool: &PgPool,
        constituency_id: DbId,
    ) -> Result<Vec<Department>, sqlx::Error> {
        let query = format!(
            "SELECT {DEPARTMENT_COLUMNS} FROM departments
             WHERE constituency_id = $1
             ORDER BY name ASC"
        );
        sqlx::query_as::<_, Department>(&query)
            .bind(constituency_id)
            .fetch_all(pool)
            .await
    }
}
