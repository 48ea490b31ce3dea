use super::progress::AnalysisSpinner;
use super::cache_store;
use super::report::{
    genre_table, headline_table, milestone_table, monthly_table, people_table, streak_table,
};
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use film_diary_config::{Config, PathManager};
use film_diary_core::{AnalysisOptions, AnalysisPipeline, AnalysisReport, StatsError};
use film_diary_sources::HttpCatalogClient;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

pub struct AnalyzeArgs {
    pub user: String,
    pub year: i32,
    pub force_refresh: bool,
    pub summary_only: bool,
    pub trace: bool,
    pub export: Option<PathBuf>,
}

pub async fn run_analyze(args: AnalyzeArgs, config: Config, paths: &PathManager, output: &Output) -> Result<()> {
    tracing::debug!(user = %args.user, year = args.year, "Analyze command started");

    let cache = cache_store(&config, paths)?;
    let catalog = HttpCatalogClient::new(&config.catalog)
        .map_err(|e| eyre!("Failed to create catalog client: {}", e))?;
    if config.fetch.offline {
        output.warn("Offline mode: cache misses are rebuilt from the cached diary only");
    }

    let pipeline = AnalysisPipeline::new(Arc::new(catalog), cache, config);
    let options = AnalysisOptions {
        force_refresh: args.force_refresh,
        export_path: args.export.clone(),
        trace: args.trace,
    };

    let spinner = AnalysisSpinner::new(output.is_human());
    spinner.set_message(format!("Analyzing {} for {}...", args.user, args.year));
    let result = pipeline.run(&args.user, args.year, &options).await;
    spinner.finish();

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            if let Some(StatsError::InsufficientData { year }) = e.downcast_ref::<StatsError>() {
                output.warn(format!("{} has no diary entries for {}", args.user, year));
                return Ok(());
            }
            return Err(eyre!("Analysis failed for {} ({}): {}", args.user, args.year, e));
        }
    };

    if output.is_human() {
        print_human(&args, &report, output);
    } else {
        output.document(&json!({
            "user": args.user,
            "year": args.year,
            "stats_path": report.stats_path,
            "snapshots": report.snapshots,
        }));
    }

    Ok(())
}

fn print_human(args: &AnalyzeArgs, report: &AnalysisReport, output: &Output) {
    let info = &report.snapshots.all.info;
    let name = info.display_name.as_deref().unwrap_or(&info.username);
    let diary_entries = report.diary.total_entries();
    let movies = report.lists.movies.len();

    output.heading(format!("{}'s {} in film", name, args.year));
    output.table(&headline_table(&report.snapshots));

    if movies < diary_entries {
        output.warn(format!(
            "{} of {} diary entries could not be enriched and were left out",
            diary_entries - movies,
            diary_entries
        ));
    }

    if !args.summary_only {
        let stats = &report.snapshots.all.stats;

        output.heading("By month");
        output.table(&monthly_table(stats));

        if !stats.top_actors.is_empty() {
            output.heading("Top actors");
            output.table(&people_table("Actor", &stats.top_actors));
        }
        if !stats.top_directors.is_empty() {
            output.heading("Top directors");
            output.table(&people_table("Director", &stats.top_directors));
        }
        if !stats.categories.genres.movies.is_empty() {
            output.heading("Top genres");
            output.table(&genre_table(stats));
        }

        output.heading("Milestones");
        output.table(&milestone_table(stats));

        if !stats.streaks.longest_daily_streak.is_empty() || !stats.streaks.longest_weekly_streak.is_empty() {
            output.heading("Longest streaks");
            output.table(&streak_table(stats));
        }
    }

    if args.trace {
        let timings: Vec<String> = report
            .timings
            .iter()
            .map(|timing| format!("{} {:.2}s", timing.stage, timing.duration.as_secs_f64()))
            .collect();
        output.info(format!("Stage timings: {}", timings.join(", ")));
    }

    output.info("");
    output.success(format!("Saved stats to {}", report.stats_path.display()));
}
