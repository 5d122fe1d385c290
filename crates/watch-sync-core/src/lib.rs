pub mod error;
pub mod identity;
pub mod lookup_cache;
pub mod merge;
pub mod normalize;
pub mod planner;
pub mod resolve;
pub mod stats;
pub mod store;
pub mod sync;

#[cfg(test)]
mod test_support;

pub use error::SyncError;
pub use identity::{IdentityKey, Keyed};
pub use lookup_cache::{LookupCache, LookupCounters};
pub use merge::{dedup_by_identity, merge_normalized, merge_raw, RawMerge};
pub use normalize::normalize;
pub use planner::{plan_fetch, FetchPlan};
pub use resolve::PosterResolver;
pub use stats::{ResolverStats, RunStats};
pub use store::HistoryStore;
pub use sync::{
    NoopObserver, RunObserver, RunPhase, SyncOptions, SyncOrchestrator, SyncOutcome, SyncResult,
    SyncRun,
};
