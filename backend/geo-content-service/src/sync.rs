/// Watermark handling for polling-based incremental sync.
///
/// A watermark is a Unix timestamp in whole seconds. The sync query returns
/// rows whose `updated_at` is strictly after it; results are a set, not a
/// stream, so clients derive their next watermark with [`max_watermark`].
use crate::error::{AppError, Result};
use crate::models::ContentRecord;
use chrono::{DateTime, Utc};
use std::ops::Deref;

/// Parse a caller-supplied watermark.
pub fn parse_watermark(raw: &str) -> Result<DateTime<Utc>> {
    let secs: i64 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("invalid 'from' parameter: {:?}", raw)))?;

    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| AppError::Validation(format!("'from' parameter out of range: {}", secs)))
}

/// Largest `updated_at` in `items` as a Unix timestamp, if any.
pub fn max_watermark<T>(items: &[T]) -> Option<i64>
where
    T: Deref<Target = ContentRecord>,
{
    items.iter().map(|item| item.updated_at.timestamp()).max()
}
