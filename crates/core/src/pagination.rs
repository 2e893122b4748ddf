//! Limit/offset normalisation for list endpoints.

/// Page size used when the client does not send `limit`.
pub const DEFAULT_PAGE_LIMIT: i64 = 100;

/// Largest page a client may request.
pub const MAX_PAGE_LIMIT: i64 = 500;

/// Clamp a user-provided limit to `1..=max`, falling back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
