use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use watch_sync_models::{HistoryDocument, NormalizedRecord, RawRecord};
use watch_sync_sources::CatalogApi;
use crate::error::SyncError;
use crate::lookup_cache::LookupCache;
use crate::merge::{merge_normalized, merge_raw};
use crate::normalize::normalize;
use crate::planner::{plan_fetch, FetchPlan};
use crate::resolve::{enrich_episode, resolve_cast, resolve_season, resolve_show_id, PosterResolver};
use crate::stats::{ProgressTracker, RunStats};
use crate::store::HistoryStore;

#[derive(Debug, Clone, Serialize)]
pub struct SyncOptions {
    /// Cap on fetched history records
    pub limit: Option<usize>,
    pub resolve_images: bool,
    pub resolve_cast: bool,
    pub enrich: bool,
    pub force_full_sync: bool,
    pub cast_limit: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            limit: None,
            resolve_images: true,
            resolve_cast: true,
            enrich: true,
            force_full_sync: false,
            cast_limit: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    LoadingCache,
    Fetching,
    Resolving,
    Writing,
}

/// Hooks for progress display; every method defaults to doing nothing
pub trait RunObserver {
    fn phase_started(&self, _phase: RunPhase) {}
    fn records_to_resolve(&self, _total: usize) {}
    fn record_resolved(&self, _done: usize, _total: usize) {}
}

pub struct NoopObserver;

impl RunObserver for NoopObserver {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Incremental fetch found nothing new; no file was touched
    UpToDate { cached: usize },
    Written {
        fetched: usize,
        new_records: usize,
        raw_count: usize,
        normalized_count: usize,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncResult {
    #[serde(flatten)]
    pub outcome: SyncOutcome,
    pub duration_secs: f64,
    pub stats: RunStats,
}

impl SyncResult {
    pub fn is_up_to_date(&self) -> bool {
        matches!(self.outcome, SyncOutcome::UpToDate { .. })
    }
}

/// Elapsed seconds rounded to two decimals
pub fn generation_time(elapsed_secs: f64) -> f64 {
    (elapsed_secs * 100.0).round() / 100.0
}

/// Owns the collaborators of a sync and starts one [`SyncRun`] per call
pub struct SyncOrchestrator {
    api: Box<dyn CatalogApi>,
    store: HistoryStore,
    posters: PosterResolver,
    sync_options: SyncOptions,
}

impl SyncOrchestrator {
    pub fn new(api: Box<dyn CatalogApi>, store: HistoryStore) -> Self {
        Self {
            api,
            store,
            posters: PosterResolver::new(None),
            sync_options: SyncOptions::default(),
        }
    }

    pub fn with_sync_options(mut self, options: SyncOptions) -> Self {
        self.sync_options = options;
        self
    }

    pub fn with_posters(mut self, posters: PosterResolver) -> Self {
        self.posters = posters;
        self
    }

    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    pub async fn sync(&self) -> Result<SyncResult, SyncError> {
        self.sync_with_observer(&NoopObserver).await
    }

    pub async fn sync_with_observer(&self, observer: &dyn RunObserver) -> Result<SyncResult, SyncError> {
        let run = SyncRun::new(
            self.api.as_ref(),
            &self.store,
            &self.posters,
            &self.sync_options,
            observer,
        );
        run.execute().await
    }
}

/// One end-to-end execution: plan, fetch, merge, resolve, persist.
/// Resolution caches live and die with it.
pub struct SyncRun<'a> {
    api: &'a dyn CatalogApi,
    store: &'a HistoryStore,
    posters: &'a PosterResolver,
    options: &'a SyncOptions,
    observer: &'a dyn RunObserver,
    started: Instant,
    started_at: DateTime<Utc>,
    cutoff: Option<DateTime<Utc>>,
    working: Vec<RawRecord>,
    cache: LookupCache,
    stats: RunStats,
}

impl<'a> SyncRun<'a> {
    pub fn new(
        api: &'a dyn CatalogApi,
        store: &'a HistoryStore,
        posters: &'a PosterResolver,
        options: &'a SyncOptions,
        observer: &'a dyn RunObserver,
    ) -> Self {
        Self {
            api,
            store,
            posters,
            options,
            observer,
            started: Instant::now(),
            started_at: Utc::now(),
            cutoff: None,
            working: Vec::new(),
            cache: LookupCache::new(),
            stats: RunStats::default(),
        }
    }

    #[instrument(skip_all)]
    pub async fn execute(mut self) -> Result<SyncResult, SyncError> {
        debug!(
            "Sync run against {} started at {}",
            self.api.source_name(),
            self.started_at.to_rfc3339()
        );

        self.observer.phase_started(RunPhase::LoadingCache);
        let cached = self.store.load_raw();
        let previous = self.store.try_load_history();
        if cached.is_some() && previous.is_none() {
            warn!("Normalized history missing or unreadable; rebuilding from a full fetch");
        }
        let plan = plan_fetch(
            cached.as_deref(),
            previous.is_some(),
            self.options.force_full_sync,
        );
        self.cutoff = plan.cutoff();
        match plan {
            FetchPlan::Full => info!("Fetching full watch history"),
            FetchPlan::Incremental { cutoff, cached_count } => info!(
                "Fetching watch history since {} ({} cached records)",
                cutoff.to_rfc3339_opts(SecondsFormat::Secs, true),
                cached_count
            ),
        }

        self.observer.phase_started(RunPhase::Fetching);
        let fetched = self.api.fetch_history(self.cutoff, self.options.limit).await?;
        if fetched.is_empty() && !plan.is_incremental() {
            return Err(SyncError::EmptyHistory);
        }
        self.stats.fetched = fetched.len();
        info!("Fetched {} history records", fetched.len());

        let merged = merge_raw(fetched, cached.unwrap_or_default());
        if let FetchPlan::Incremental { cached_count, .. } = plan {
            if merged.records.len() == cached_count {
                info!("Watch history already up to date ({} records)", cached_count);
                return Ok(self.finish(SyncOutcome::UpToDate {
                    cached: cached_count,
                }));
            }
        }

        self.working = merged.fresh;
        self.resolve_working_set().await;

        let fresh: Vec<NormalizedRecord> = self.working.iter().map(normalize).collect();
        let new_records = fresh.len();

        self.observer.phase_started(RunPhase::Writing);
        let previous = previous.map(|document| document.items).unwrap_or_default();
        let items = merge_normalized(fresh, previous);
        let document = HistoryDocument {
            generated_at: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
            generation_time: generation_time(self.started.elapsed().as_secs_f64()),
            count: items.len(),
            items,
        };

        self.store.save_raw(&merged.records)?;
        self.store.save_history(&document)?;
        info!(
            "Wrote {} raw and {} normalized records ({} new)",
            merged.records.len(),
            document.count,
            new_records
        );

        let outcome = SyncOutcome::Written {
            fetched: self.stats.fetched,
            new_records,
            raw_count: merged.records.len(),
            normalized_count: document.count,
        };
        Ok(self.finish(outcome))
    }

    fn finish(mut self, outcome: SyncOutcome) -> SyncResult {
        self.stats.lookups = self.cache.counters();
        let duration_secs = self.started.elapsed().as_secs_f64();
        if matches!(outcome, SyncOutcome::Written { .. }) {
            self.stats.log_summary(duration_secs);
        }
        SyncResult {
            outcome,
            duration_secs,
            stats: self.stats,
        }
    }

    async fn resolve_working_set(&mut self) {
        let mut working = std::mem::take(&mut self.working);
        let total = working.len();
        self.observer.phase_started(RunPhase::Resolving);
        self.observer.records_to_resolve(total);
        let mut progress = ProgressTracker::new(total, 50);

        for (idx, record) in working.iter_mut().enumerate() {
            self.resolve_record(record).await;
            self.stats.processed += 1;
            progress.log_progress(idx + 1);
            self.observer.record_resolved(idx + 1, total);
        }
        self.working = working;
    }

    /// Season, show metadata, poster, cast; each step fails soft
    async fn resolve_record(&mut self, record: &mut RawRecord) {
        let api = self.api;
        let options = self.options;

        if record.is_episode() {
            let season = resolve_season(record, api, &mut self.cache).await;
            self.stats.seasons.record(season.is_some());
            if let Some((season, strategy)) = season {
                record.resolved_season = Some(season);
                *self.stats.season_strategies.entry(strategy.as_str()).or_default() += 1;
            }
        }

        let show_id = if record.is_episode() && (options.enrich || options.resolve_cast) {
            resolve_show_id(record, api, &mut self.cache).await
        } else {
            None
        };

        if options.enrich && record.is_episode() {
            let applied = enrich_episode(record, show_id.as_ref(), api, &mut self.cache).await;
            self.stats.enrichment.record(applied);
        }

        if options.resolve_images {
            let thumbnail = self.posters.resolve(record, &mut self.cache);
            self.stats.posters.record(thumbnail.is_some());
            record.thumbnail = thumbnail;
        }

        if options.resolve_cast {
            let cast = resolve_cast(record, show_id.as_ref(), options.cast_limit, api, &mut self.cache).await;
            self.stats.cast.record(cast.as_ref().map(|c| !c.is_empty()).unwrap_or(false));
            if let Some(cast) = cast {
                record.cast = Some(cast);
            }
        }
    }
}
