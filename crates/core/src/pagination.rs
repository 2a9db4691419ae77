//! Pagination clamping helpers shared by list endpoints.

/// Clamp an optional caller-supplied limit into `1..=max`, falling back to
/// `default` when absent or non-positive.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    match limit {
        Some(l) if l > 0 => l.min(max),
        _ => default,
    }
}

/// Clamp an optional caller-supplied offset to be non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
