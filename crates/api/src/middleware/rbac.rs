//! Role-based access control (RBAC) extractors.
//!
//! [`RequireOfficer`] wraps [`AuthUser`] and rejects requests whose role does not
//! meet the requirement. Finer checks (which edge, which complaint) happen in
//! the workflow validator and the routing rules.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use janasamparka_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires a field officer or a supervisor. Rejects citizens with 403.
///
/// ```ignore
/// async fn update_status(RequireOfficer(user): RequireOfficer) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireOfficer(pub AuthUser);

impl FromRequestParts<AppState> for RequireOfficer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.role.is_field_officer() && !user.role.is_supervisor() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Officer role required".into(),
            )));
        }
        Ok(RequireOfficer(user))
    }
}
