//! Filtering, ordering and truncation of the report working set.

use chrono::{DateTime, Utc};

use super::{RawRecord, Report};
use crate::util::{days_since, parse_timestamp};

/// Reports older than this many days are dropped.
pub const DEFAULT_EXPIRE_DAYS: u32 = 7;
/// Maximum size of the working set.
pub const DEFAULT_MAX_REPORTS: usize = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionLimits {
    pub expire_days: u32,
    pub max_reports: usize,
}

impl Default for SelectionLimits {
    fn default() -> Self {
        Self {
            expire_days: DEFAULT_EXPIRE_DAYS,
            max_reports: DEFAULT_MAX_REPORTS,
        }
    }
}

/// Build the working set with the default limits.
pub fn select_reports(raw: &[RawRecord], now: DateTime<Utc>) -> Vec<Report> {
    select_reports_with(raw, now, &SelectionLimits::default())
}

/// Normalize, keep recent reports with an id and title, order newest first,
/// and cap the result.
///
/// Pure: the same input and `now` always give the same output. Ties keep
/// their feed order; duplicate ids are kept.
pub fn select_reports_with(
    raw: &[RawRecord],
    now: DateTime<Utc>,
    limits: &SelectionLimits,
) -> Vec<Report> {
    let max_age = limits.expire_days as f64;

    let mut survivors: Vec<(DateTime<Utc>, Report)> = raw
        .iter()
        .map(Report::from_raw)
        .filter(|r| !r.id.is_empty() && !r.title.is_empty())
        .filter(|r| days_since(&r.created_at, now) <= max_age)
        .filter_map(|r| parse_timestamp(&r.created_at).map(|t| (t, r)))
        .collect();

    // sort_by is stable
    survivors.sort_by(|(a, _), (b, _)| b.cmp(a));
    survivors.truncate(limits.max_reports);

    survivors.into_iter().map(|(_, report)| report).collect()
}
