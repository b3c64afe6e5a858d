//! Constituency and jurisdiction unit models.

use janasamparka_core::complaint::AssignmentType;
use janasamparka_core::jurisdiction::UnitRef;
use janasamparka_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `constituencies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Constituency {
    pub id: DbId,
    pub name: String,
    pub code: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `departments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Department {
    pub id: DbId,
    pub constituency_id: DbId,
    pub name: String,
    pub code: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Any unit reduced to the columns routing needs.
#[derive(Debug, Clone, FromRow)]
pub struct UnitRow {
    pub id: DbId,
    pub constituency_id: DbId,
    pub taluk_panchayat_id: Option<DbId>,
    pub zilla_panchayat_id: Option<DbId>,
}

impl UnitRow {
    pub fn into_unit_ref(self, kind: AssignmentType) -> UnitRef {
        UnitRef {
            kind,
            id: self.id,
            constituency_id: self.constituency_id,
            taluk_panchayat_id: self.taluk_panchayat_id,
            zilla_panchayat_id: self.zilla_panchayat_id,
        }
    }
}

/// DTO for creating a unit of any kind.
///
/// `parent_id` is the zilla panchayat for a taluk panchayat and the taluk
/// panchayat for a gram panchayat; it is ignored for other kinds. `code` is
/// used by departments and `number` by wards.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUnit {
    pub constituency_id: DbId,
    pub name: String,
    pub code: Option<String>,
    pub number: Option<i32>,
    pub parent_id: Option<DbId>,
}
