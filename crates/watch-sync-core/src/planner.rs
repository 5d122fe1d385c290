use chrono::{DateTime, Duration, Utc};
use watch_sync_models::RawRecord;

/// How much remote history a run asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPlan {
    /// Entire history; no usable cache or a forced run
    Full,
    /// Only events at or after `cutoff`
    Incremental {
        cutoff: DateTime<Utc>,
        cached_count: usize,
    },
}

impl FetchPlan {
    pub fn cutoff(&self) -> Option<DateTime<Utc>> {
        match self {
            FetchPlan::Full => None,
            FetchPlan::Incremental { cutoff, .. } => Some(*cutoff),
        }
    }

    pub fn is_incremental(&self) -> bool {
        matches!(self, FetchPlan::Incremental { .. })
    }
}

/// One second past the newest parsable `watched_at` in the cache
pub fn compute_cutoff(cached: &[RawRecord]) -> Option<DateTime<Utc>> {
    cached
        .iter()
        .filter_map(|r| r.watched_at_utc())
        .max()
        .map(|newest| newest + Duration::seconds(1))
}

/// Incremental only when both persisted files are usable. Without the
/// normalized document an incremental run would write just the new records.
pub fn plan_fetch(cached: Option<&[RawRecord]>, history_usable: bool, force: bool) -> FetchPlan {
    if force || !history_usable {
        return FetchPlan::Full;
    }
    let Some(cached) = cached.filter(|c| !c.is_empty()) else {
        return FetchPlan::Full;
    };
    match compute_cutoff(cached) {
        Some(cutoff) => FetchPlan::Incremental {
            cutoff,
            cached_count: cached.len(),
        },
        None => FetchPlan::Full,
    }
}
