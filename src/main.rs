use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use viral_lens::collector::{CollectOptions, DEFAULT_LIMIT, DEFAULT_PAGE_SIZE};
use viral_lens::commands;
use viral_lens::config::load_env;

#[derive(Parser)]
#[command(name = "viral-lens")]
#[command(about = "Export a YouTube channel's uploads to Google Sheets, flagging short-form videos")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a channel's latest uploads and write them to a spreadsheet
    Analyze {
        /// Channel ID (UC...) or @handle; prompted for if omitted
        channel: Option<String>,

        /// Google Spreadsheet URL or ID; prompted for if omitted
        spreadsheet: Option<String>,

        /// Maximum number of videos to fetch
        #[arg(short = 'n', long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,

        /// Playlist page size (1-50)
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: u32,

        /// Print the records as JSON instead of a table
        #[arg(short, long)]
        json: bool,
    },

    /// Print the uploads playlist ID for a channel
    Resolve {
        /// Channel ID (UC...) or @handle
        channel: Option<String>,
    },

    /// Point viral-lens at a service account key file
    Init {
        /// Path to the service account JSON key
        #[arg(short = 'c', long)]
        credentials: Option<String>,

        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load environment variables
    load_env();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            channel,
            spreadsheet,
            limit,
            page_size,
            json,
        } => {
            let options = CollectOptions { limit, page_size };
            commands::analyze::run(channel, spreadsheet, options, json).await
        }
        Commands::Resolve { channel } => commands::resolve::run(channel).await,
        Commands::Init { credentials, force } => commands::init::run(credentials, force).await,
    };

    if let Err(e) = result {
        tracing::debug!(kind = ?e.kind(), "run failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
