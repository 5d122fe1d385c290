// Identity-keyed deduplication and new-wins merging of watch records

use chrono::{Local, TimeZone};
use std::collections::HashSet;
use tracing::debug;
use watch_sync_models::{NormalizedRecord, RawRecord};
use crate::identity::{IdentityKey, Keyed};

/// Drop every record whose identity key was already seen, keeping the first
pub fn dedup_by_identity<T: Keyed>(items: Vec<T>) -> Vec<T> {
    dedup_by_identity_in(items, &Local)
}

pub fn dedup_by_identity_in<T, Tz>(items: Vec<T>, tz: &Tz) -> Vec<T>
where
    T: Keyed,
    Tz: TimeZone,
{
    let mut seen: HashSet<IdentityKey> = HashSet::with_capacity(items.len());
    let before = items.len();
    let unique: Vec<T> = items
        .into_iter()
        .filter(|item| seen.insert(item.identity_key_in(tz)))
        .collect();

    if unique.len() < before {
        debug!(
            "dedup_by_identity: removed {} duplicates ({} -> {})",
            before - unique.len(),
            before,
            unique.len()
        );
    }
    unique
}

/// Result of merging freshly fetched records into the raw cache
#[derive(Debug, Clone)]
pub struct RawMerge {
    /// Deduplicated union, newest fetch first
    pub records: Vec<RawRecord>,
    /// The fetched records that survived deduplication; these go through resolution
    pub fresh: Vec<RawRecord>,
}

/// New records come first so they win every identity collision
pub fn merge_raw(fetched: Vec<RawRecord>, cached: Vec<RawRecord>) -> RawMerge {
    merge_raw_in(fetched, cached, &Local)
}

pub fn merge_raw_in<Tz: TimeZone>(
    fetched: Vec<RawRecord>,
    cached: Vec<RawRecord>,
    tz: &Tz,
) -> RawMerge {
    let fresh = dedup_by_identity_in(fetched, tz);
    let mut combined = Vec::with_capacity(fresh.len() + cached.len());
    combined.extend(fresh.iter().cloned());
    combined.extend(cached);

    RawMerge {
        records: dedup_by_identity_in(combined, tz),
        fresh,
    }
}

/// Keep every newly normalized record; append previous ones whose key is not taken
pub fn merge_normalized(
    fresh: Vec<NormalizedRecord>,
    previous: Vec<NormalizedRecord>,
) -> Vec<NormalizedRecord> {
    merge_normalized_in(fresh, previous, &Local)
}

pub fn merge_normalized_in<Tz: TimeZone>(
    fresh: Vec<NormalizedRecord>,
    previous: Vec<NormalizedRecord>,
    tz: &Tz,
) -> Vec<NormalizedRecord> {
    let mut seen: HashSet<IdentityKey> = fresh.iter().map(|r| r.identity_key_in(tz)).collect();
    let mut merged = fresh;
    let mut carried = 0;

    for record in previous {
        if seen.insert(record.identity_key_in(tz)) {
            merged.push(record);
            carried += 1;
        }
    }

    debug!(
        "merge_normalized: {} fresh, {} carried over",
        merged.len() - carried,
        carried
    );
    merged
}

#[cfg(test)]
mod tests;
