//! Pure aggregate computations over session records.

use chrono::{DateTime, TimeDelta, Utc};

use crate::error::{Error, Result};
use crate::models::SessionRecord;
use crate::utils::time::within_trailing_window;

fn checked_sum<I>(values: I, what: &str) -> Result<i64>
where
    I: IntoIterator<Item = i64>,
{
    values
        .into_iter()
        .try_fold(0i64, |total, value| total.checked_add(value))
        .ok_or_else(|| Error::Internal(format!("{} overflows a 64-bit total", what)))
}

pub fn played_time(records: &[SessionRecord]) -> Result<i64> {
    checked_sum(records.iter().map(|r| r.played_time), "played time")
}

/// Played time of the records created within `window` before `now`
pub fn played_within(
    records: &[SessionRecord],
    now: DateTime<Utc>,
    window: TimeDelta,
) -> Result<i64> {
    checked_sum(
        records
            .iter()
            .filter(|r| within_trailing_window(r.created_at, now, window))
            .map(|r| r.played_time),
        "weekly played time",
    )
}

/// Sum of scores, counting only sessions that were actually played.
/// A zero-length session contributes nothing whatever score it reports.
pub fn score_total(records: &[SessionRecord]) -> Result<i64> {
    checked_sum(
        records
            .iter()
            .filter(|r| r.played_time != 0)
            .map(|r| r.score),
        "score",
    )
}

/// Stable descending sort, equal keys keep their input order
pub fn sort_desc_by_key<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> i64,
{
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}
