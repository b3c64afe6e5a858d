//! Limit/offset clamping for paginated list endpoints.

/// Default page size when the caller does not supply `limit`.
pub const DEFAULT_PAGE_SIZE: i64 = 25;

/// Upper bound on any requested page size.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
