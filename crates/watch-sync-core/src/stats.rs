use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::info;
use crate::lookup_cache::LookupCounters;

/// Attempts and successes of one resolver over a run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolverStats {
    pub attempted: usize,
    pub resolved: usize,
}

impl ResolverStats {
    pub fn record(&mut self, resolved: bool) {
        self.attempted += 1;
        if resolved {
            self.resolved += 1;
        }
    }

    pub fn unresolved(&self) -> usize {
        self.attempted - self.resolved
    }
}

/// Counters reported at the end of a run
#[derive(Debug, Default, Clone, Serialize)]
pub struct RunStats {
    pub fetched: usize,
    pub processed: usize,
    pub seasons: ResolverStats,
    /// Which season strategy placed how many episodes
    pub season_strategies: BTreeMap<&'static str, usize>,
    pub enrichment: ResolverStats,
    pub posters: ResolverStats,
    pub cast: ResolverStats,
    pub lookups: LookupCounters,
}

impl RunStats {
    pub fn log_summary(&self, elapsed_secs: f64) {
        info!(
            "Resolved {} records in {:.1}s | Seasons: {}/{} | Enriched: {}/{} | Posters: {}/{} | Cast: {}/{}",
            self.processed,
            elapsed_secs,
            self.seasons.resolved,
            self.seasons.attempted,
            self.enrichment.resolved,
            self.enrichment.attempted,
            self.posters.resolved,
            self.posters.attempted,
            self.cast.resolved,
            self.cast.attempted,
        );
        info!(
            "Catalog lookups: {} remote | {} cached | {} failed",
            self.lookups.remote, self.lookups.hits, self.lookups.failures
        );
        if !self.season_strategies.is_empty() {
            let breakdown: Vec<String> = self
                .season_strategies
                .iter()
                .map(|(strategy, count)| format!("{}: {}", strategy, count))
                .collect();
            info!("Season sources: {}", breakdown.join(", "));
        }
    }
}

/// Periodic progress logging for the resolution loop
pub struct ProgressTracker {
    total: usize,
    interval: usize,
    last_logged: usize,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn new(total: usize, interval: usize) -> Self {
        if total > interval {
            info!("Resolving metadata for {} records", total);
        }
        Self {
            total,
            interval: interval.max(1),
            last_logged: 0,
            start_time: Instant::now(),
        }
    }

    /// `current` is 1-based
    pub fn log_progress(&mut self, current: usize) {
        if current - self.last_logged < self.interval && current != self.total {
            return;
        }
        let elapsed = self.start_time.elapsed().as_secs_f64();
        // Fast runs are almost entirely cache hits; nothing worth reporting
        if elapsed < 0.5 && current < self.total {
            return;
        }
        let rate = if elapsed > 0.0 { current as f64 / elapsed } else { 0.0 };
        info!("Progress: {}/{} ({:.1} records/sec)", current, self.total, rate);
        self.last_logged = current;
    }
}
