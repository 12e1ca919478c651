//! Exact match counts from the `Content-Range` response header.
//!
//! With `Prefer: count=exact` the backend reports the returned window and the
//! total number of matching rows:
//!
//! ```text
//! Content-Range: 0-9/25
//! Content-Range: */0
//! ```

/// Extracts the total from a `Content-Range` header value.
///
/// Returns `None` when the header is missing, the total is unknown (`*`), or
/// the value is malformed.
#[must_use]
pub fn parse_total_count(header: Option<&str>) -> Option<u64> {
    let (_, total) = header?.trim().rsplit_once('/')?;
    total.trim().parse().ok()
}
