use clap::{ArgAction, Parser, Subcommand};
use commands::{analyze, clear};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "reelrecap")]
#[command(about = "ReelRecap - A year of your film diary, in numbers")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Config file to use instead of <config dir>/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Also write logs to a daily rolling file in the log directory
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    log_file: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the year-in-review statistics for a user
    #[command(long_about = "Fetch a user's diary for one year, enrich every entry with catalog details, compute the statistics for all movies and for feature-length movies, and export them as JSON. Cached artifacts are reused unless --force-refresh is given.")]
    Analyze {
        /// Catalog username
        #[arg(long)]
        user: String,

        /// Year to analyze
        #[arg(long, default_value_t = 2025)]
        year: i32,

        /// Ignore cached artifacts and fetch everything again
        #[arg(long, action = ArgAction::SetTrue)]
        force_refresh: bool,

        /// Print only the headline numbers
        #[arg(long, action = ArgAction::SetTrue)]
        summary_only: bool,

        /// Debug logging plus per-stage timings
        #[arg(long, action = ArgAction::SetTrue)]
        trace: bool,

        /// Write the stats JSON here instead of the cache directory
        #[arg(long, value_name = "PATH")]
        export: Option<PathBuf>,
    },
    /// Clear cached data
    #[command(long_about = "Remove the cached diary, master lists and stats for a user. Use --year to clear a single year; without it every cached year for the user is removed.")]
    Clear {
        /// Catalog username
        #[arg(long)]
        user: String,

        /// Only clear this year
        #[arg(long)]
        year: Option<i32>,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let trace = matches!(cli.command, Commands::Analyze { trace: true, .. });
    let paths = commands::path_manager()?;
    paths
        .ensure_directories()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create data directories: {}", e))?;
    let log_file = cli.log_file.then(|| paths.log_file());
    logging::init_logging(cli.verbose, cli.quiet, trace, log_file)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);
    let config = commands::load_config(&paths, cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze {
            user,
            year,
            force_refresh,
            summary_only,
            trace,
            export,
        } => {
            let args = analyze::AnalyzeArgs {
                user,
                year,
                force_refresh,
                summary_only,
                trace,
                export,
            };
            analyze::run_analyze(args, config, &paths, &output).await
        }
        Commands::Clear { user, year } => clear::run_clear(&user, year, &config, &paths, &output),
    }
}
