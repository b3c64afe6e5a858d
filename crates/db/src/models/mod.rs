//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts

pub mod complaint;
pub mod jurisdiction;
pub mod notification;
pub mod status_log;
pub mod user;
