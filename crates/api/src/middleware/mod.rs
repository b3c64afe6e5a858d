//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireOfficer`] -- any field officer or supervisor.

pub mod auth;
pub mod rbac;
