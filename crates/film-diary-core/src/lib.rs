pub mod cache;
pub mod diary;
pub mod export;
pub mod master_list;
pub mod pipeline;
pub mod progress;
pub mod stats;

#[cfg(test)]
mod testing;

pub use cache::{CacheFile, CacheStore};
pub use diary::{merge_chronologically, DiaryAggregator, MonthSource};
pub use export::ReportExporter;
pub use master_list::{MasterListBuilder, MasterLists};
pub use pipeline::{AnalysisOptions, AnalysisPipeline, AnalysisReport, StageTiming};
pub use progress::ProgressTracker;
pub use stats::{SnapshotInfo, SnapshotPair, StatsEngine, StatsError, StatsSnapshot, YearStats};
