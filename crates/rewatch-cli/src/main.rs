use clap::{ArgAction, Parser, Subcommand};
use commands::{status, sync};
use watch_sync_config::PathManager;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "rewatch")]
#[command(about = "Rewatch - keep an enriched local copy of your Trakt watch history")]
#[command(version)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch new watch history, resolve metadata and rewrite the history files
    #[command(long_about = "Fetch watch history from Trakt (incrementally when a cache exists), merge it with the local cache, resolve seasons, genres, posters and cast for the new records, and write the raw cache and the normalized history file.")]
    Sync {
        /// Fetch at most this many history records (0 for no limit)
        #[arg(long, value_name = "N")]
        limit: Option<usize>,

        /// Skip poster resolution
        #[arg(long, action = ArgAction::SetTrue)]
        no_images: bool,

        /// Skip cast resolution
        #[arg(long, action = ArgAction::SetTrue)]
        no_cast: bool,

        /// Skip show genre/year/rating enrichment
        #[arg(long, action = ArgAction::SetTrue)]
        no_enrichment: bool,

        /// Ignore the cache and fetch the full history
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,

        /// Sync the files of this user instead of the primary user
        #[arg(long, value_name = "NAME")]
        user: Option<String>,
    },
    /// Show what the history files currently contain
    Status {
        #[arg(long, value_name = "NAME")]
        user: Option<String>,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let paths = PathManager::default();

    // The log file lives in the config, so load it before logging is up
    // and report a broken config only afterwards
    let config = commands::config::load_config(&paths);
    let log_file = config.as_ref().ok().and_then(|c| c.logging.file.clone());
    logging::init_logging_with_file(cli.verbose, cli.quiet, log_file)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    let config = config.map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Sync {
            limit,
            no_images,
            no_cast,
            no_enrichment,
            force,
            user,
        } => {
            let args = sync::SyncArgs {
                limit,
                no_images,
                no_cast,
                no_enrichment,
                force,
                user,
            };
            sync::run_sync(args, &config, &paths, &output).await
        }
        Commands::Status { user } => status::run_status(user.as_deref(), &config, &paths, &output),
    }
}
