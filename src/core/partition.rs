use crate::domain::model::{CutoffResult, Version};
use chrono::{DateTime, TimeDelta, Utc};

/// `now - older_than_days`, saturating at the representable range.
pub fn cutoff_for(now: DateTime<Utc>, older_than_days: i64) -> DateTime<Utc> {
    let shifted = TimeDelta::try_days(older_than_days).and_then(|delta| now.checked_sub_signed(delta));
    match shifted {
        Some(cutoff) => cutoff,
        None if older_than_days > 0 => DateTime::<Utc>::MIN_UTC,
        None => DateTime::<Utc>::MAX_UTC,
    }
}

pub fn partition(versions: Vec<Version>, older_than_days: i64) -> CutoffResult {
    partition_at(versions, older_than_days, Utc::now())
}

/// Splits `versions` into those created strictly before the cutoff and the rest.
///
/// Both halves are sorted by `created`; the sort is stable so equal timestamps
/// keep their fetch order. Zero or negative day counts put the cutoff at or
/// after `now`.
pub fn partition_at(versions: Vec<Version>, older_than_days: i64, now: DateTime<Utc>) -> CutoffResult {
    let cutoff = cutoff_for(now, older_than_days);

    let (mut old, mut new): (Vec<Version>, Vec<Version>) =
        versions.into_iter().partition(|v| v.created < cutoff);
    old.sort_by_key(|v| v.created);
    new.sort_by_key(|v| v.created);

    tracing::debug!(
        "Cutoff {}: {} old, {} new",
        cutoff,
        old.len(),
        new.len()
    );

    CutoffResult { cutoff, old, new }
}
