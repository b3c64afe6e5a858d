//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Methods that must run inside
//! a caller-owned transaction take `&mut PgConnection` instead.

pub mod complaint_repo;
pub mod jurisdiction_repo;
pub mod notification_repo;
pub mod status_log_repo;
pub mod user_repo;

pub use complaint_repo::{ComplaintFilter, ComplaintRepo};
pub use jurisdiction_repo::JurisdictionRepo;
pub use notification_repo::NotificationRepo;
pub use status_log_repo::StatusLogRepo;
pub use user_repo::UserRepo;
