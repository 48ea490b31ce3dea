use crate::cache::CacheStore;
use crate::diary::DiaryAggregator;
use crate::export::ReportExporter;
use crate::master_list::{MasterListBuilder, MasterLists};
use crate::stats::{SnapshotInfo, SnapshotPair, StatsEngine};
use anyhow::Result;
use film_diary_config::Config;
use film_diary_models::{DiaryYear, UserProfile};
use film_diary_sources::CatalogClient;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, info_span, warn, Instrument};

#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    pub force_refresh: bool,
    /// Write the stats JSON here instead of the cache
    pub export_path: Option<PathBuf>,
    /// Log stage timings at INFO instead of DEBUG
    pub trace: bool,
}

#[derive(Debug, Clone)]
pub struct StageTiming {
    pub stage: &'static str,
    pub duration: Duration,
}

pub struct AnalysisReport {
    pub diary: DiaryYear,
    pub lists: MasterLists,
    pub snapshots: SnapshotPair,
    pub stats_path: PathBuf,
    pub timings: Vec<StageTiming>,
}

/// Diary → master lists → profile → stats → export, one stage after the other
pub struct AnalysisPipeline {
    catalog: Arc<dyn CatalogClient>,
    cache: CacheStore,
    config: Config,
}

impl AnalysisPipeline {
    pub fn new(catalog: Arc<dyn CatalogClient>, cache: CacheStore, config: Config) -> Self {
        Self { catalog, cache, config }
    }

    pub async fn run(&self, user: &str, year: i32, options: &AnalysisOptions) -> Result<AnalysisReport> {
        let mut timings = Vec::new();

        let started = Instant::now();
        let diary = DiaryAggregator::new(self.catalog.clone(), self.cache.clone(), self.config.fetch.diary_concurrency)
            .offline(self.config.fetch.offline)
            .fetch(user, year, options.force_refresh)
            .instrument(info_span!("diary", user, year))
            .await;
        timings.push(finish_stage("diary", started, options.trace));

        let started = Instant::now();
        let lists = MasterListBuilder::new(
            self.catalog.clone(),
            self.cache.clone(),
            self.config.fetch.movie_concurrency,
            self.config.analysis.feature_length_minutes,
        )
        .build(user, year, &diary, options.force_refresh)
        .instrument(info_span!("master_lists", user, year))
        .await;
        timings.push(finish_stage("master lists", started, options.trace));

        let started = Instant::now();
        let profile = self.profile(user).await;
        timings.push(finish_stage("profile", started, options.trace));

        let started = Instant::now();
        let engine = StatsEngine::new(self.config.analysis.clone());
        let snapshots = {
            let _span = info_span!("stats", user, year).entered();
            engine.compute(&diary, &lists, year, SnapshotInfo::new(user, year, profile))?
        };
        timings.push(finish_stage("stats", started, options.trace));

        let started = Instant::now();
        let exporter = ReportExporter::new(self.cache.clone());
        let stats_path = match &options.export_path {
            Some(path) => exporter.export_to(path, &snapshots)?,
            None => exporter.export(user, year, &snapshots)?,
        };
        timings.push(finish_stage("export", started, options.trace));

        Ok(AnalysisReport {
            diary,
            lists,
            snapshots,
            stats_path,
            timings,
        })
    }

    async fn profile(&self, user: &str) -> UserProfile {
        if self.config.fetch.offline {
            return UserProfile::fallback(user);
        }
        match self.catalog.fetch_user_profile(user).await {
            Ok(profile) => profile,
            Err(e) if e.is_not_found() => {
                info!("No catalog profile for {}; using the username", user);
                UserProfile::fallback(user)
            }
            Err(e) => {
                warn!("Could not fetch profile for {}: {}. Using the username instead.", user, e);
                UserProfile::fallback(user)
            }
        }
    }
}

fn finish_stage(stage: &'static str, started: Instant, trace: bool) -> StageTiming {
    let duration = started.elapsed();
    if trace {
        info!("Stage {} finished in {:.2}s", stage, duration.as_secs_f64());
    } else {
        debug!("Stage {} finished in {:.2}s", stage, duration.as_secs_f64());
    }
    StageTiming { stage, duration }
}
