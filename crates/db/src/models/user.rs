//! User entity model and DTOs.

use janasamparka_core::complaint::AssignmentType;
use janasamparka_core::jurisdiction::Actor;
use janasamparka_core::roles::Role;
use janasamparka_core::types::{DbId, ParseEnumError, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub constituency_id: Option<DbId>,
    pub ward_id: Option<DbId>,
    pub department_id: Option<DbId>,
    pub gram_panchayat_id: Option<DbId>,
    pub taluk_panchayat_id: Option<DbId>,
    pub zilla_panchayat_id: Option<DbId>,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    pub fn role(&self) -> Result<Role, ParseEnumError> {
        self.role.parse()
    }

    /// The unit a field officer is bound to, matching their role.
    pub fn bound_unit_id(&self, role: Role) -> Option<DbId> {
        match role.unit_kind()? {
            AssignmentType::Ward => self.ward_id,
            AssignmentType::Department => self.department_id,
            AssignmentType::GramPanchayat => self.gram_panchayat_id,
            AssignmentType::TalukPanchayat => self.taluk_panchayat_id,
            AssignmentType::ZillaPanchayat => self.zilla_panchayat_id,
        }
    }

    /// The routing actor for this user.
    pub fn actor(&self) -> Result<Actor, ParseEnumError> {
        let role = self.role()?;
        Ok(Actor {
            user_id: self.id,
            role,
            constituency_id: self.constituency_id,
            unit_id: self.bound_unit_id(role),
        })
    }
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub role: String,
    pub constituency_id: Option<DbId>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            constituency_id: user.constituency_id,
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub constituency_id: Option<DbId>,
    pub ward_id: Option<DbId>,
    pub department_id: Option<DbId>,
    pub gram_panchayat_id: Option<DbId>,
    pub taluk_panchayat_id: Option<DbId>,
    pub zilla_panchayat_id: Option<DbId>,
}
