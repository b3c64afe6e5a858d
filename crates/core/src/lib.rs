//! Janasamparka domain core.
//!
//! Pure, I/O-free building blocks shared by the database and API layers:
//!
//! - [`complaint`] -- status, priority and assignment-type enums.
//! - [`roles`] -- the closed set of user roles and their authority classes.
//! - [`workflow`] -- the status-transition validator and transition planning.
//! - [`jurisdiction`] -- routing rules between wards, departments and panchayat tiers.
//! - [`error`] -- the shared domain error type.

#[macro_use]
mod macros;

pub mod complaint;
pub mod error;
pub mod jurisdiction;
pub mod pagination;
pub mod roles;
pub mod types;
pub mod workflow;
