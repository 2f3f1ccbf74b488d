mod platform;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use navsync_engine::BrowserVariant;
use navsync_logging::{nav_error, LogDestination};

#[derive(Parser)]
#[command(name = "navsync", version, about = "Link organizer companion: sync, capture, enrich, package")]
struct Cli {
    /// Config file (RON).
    #[arg(short, long, global = true, default_value = platform::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Log debug output to the terminal as well as navsync.log.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Fetch the full dataset and replace the local cache.
    Sync,
    /// Print the panel view (cache first).
    List(ListArgs),
    /// Print the context menu built from the cache.
    Menu,
    /// Save a page into a category.
    Capture(CaptureArgs),
    /// Generate missing link descriptions. Ctrl-C stops after the current item.
    Enrich,
    /// Write a browser extension bundle.
    Extension(ExtensionArgs),
    /// Run the background service with one panel, driven from stdin.
    Watch,
}

#[derive(Args)]
pub(crate) struct ListArgs {
    /// Filter by title, URL or description.
    #[arg(short, long)]
    pub query: Option<String>,
    /// Skip the cache and fetch from the server.
    #[arg(short, long)]
    pub refresh: bool,
}

#[derive(Args)]
pub(crate) struct CaptureArgs {
    /// Target category id.
    #[arg(long)]
    pub category: String,
    /// Page URL.
    pub url: String,
    /// Page title.
    #[arg(long)]
    pub title: Option<String>,
    /// Link under the cursor; saved instead of the page when set.
    #[arg(long)]
    pub link: Option<String>,
}

#[derive(Args)]
pub(crate) struct ExtensionArgs {
    /// Output directory.
    #[arg(short, long, default_value = "extension")]
    pub out: PathBuf,
    /// chrome or firefox.
    #[arg(short, long)]
    pub browser: Option<BrowserVariant>,
    #[arg(long)]
    pub title: Option<String>,
    /// PNG used as the toolbar icon.
    #[arg(long)]
    pub icon: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let (destination, level) = if cli.verbose {
        (LogDestination::Both, LevelFilter::Debug)
    } else {
        (LogDestination::File, LevelFilter::Info)
    };
    navsync_logging::initialize(destination, level);

    let result = match platform::load_config(&cli.config) {
        Ok(config) => platform::run(config, cli.command).await,
        Err(err) => Err(err),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            nav_error!("{:#}", err);
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
