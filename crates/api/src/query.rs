//! Shared query parameter types for API handlers.
//!
//! `limit` / `offset` are clamped with `clamp_limit` / `clamp_offset` before
//! reaching the repository layer.

use janasamparka_core::complaint::ComplaintStatus;
use serde::Deserialize;

/// Query parameters for `GET /complaints`.
#[derive(Debug, Deserialize)]
pub struct ComplaintListParams {
    pub status: Option<ComplaintStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for `GET /notifications`.
#[derive(Debug, Deserialize)]
pub struct NotificationListParams {
    #[serde(default)]
    pub unread_only: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
