//! Orpheus archive command-line entry point
//!
//! Lists the programs of the archive, scans a program into the JSON cache
//! and downloads its records as tagged MP3 files.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use orpheus_core::url::BASE_URL;
use orpheus_core::{ArchiveCache, ClientConfig};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::App;

/// Crawl the Orpheus radio programs archive
#[derive(Parser, Debug)]
#[command(name = "orpheus")]
#[command(version)]
#[command(about = "Crawl the Orpheus radio programs archive", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Directory holding archive.json and programsarchive.json
    #[arg(long, value_name = "DIR", default_value = ".", global = true)]
    cache_dir: PathBuf,

    /// Site origin
    #[arg(long, value_name = "URL", default_value = BASE_URL, global = true)]
    base_url: String,

    /// Maximum requests per second
    #[arg(long, default_value_t = 2.0, global = true)]
    rps: f64,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30, global = true)]
    timeout: u64,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all programs in the archive (default)
    List,

    /// Scan a program's episodes into the cache; `all` scans every program
    Scan {
        /// Program slug, e.g. `eurofest`, or `all`
        program: String,
    },

    /// Download a scanned program's records as tagged MP3 files
    Download {
        /// Program slug
        program: String,

        /// Existing directory; files go to `<PATH>/<program>/`
        path: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = ClientConfig {
        base_url: cli.base_url,
        requests_per_second: cli.rps,
        timeout_secs: cli.timeout,
    };
    let app = App::new(config, ArchiveCache::new(cli.cache_dir))?;

    let mut out = std::io::stdout().lock();

    match cli.command.unwrap_or(Command::List) {
        Command::List => commands::list_programs(&app, &mut out).await?,
        Command::Scan { program } if program == "all" => commands::scan_all(&app, &mut out).await?,
        Command::Scan { program } => commands::scan_program(&app, &program, &mut out).await?,
        Command::Download { program, path } => {
            commands::download_program(&app, &program, &path, &mut out).await?
        }
    }

    Ok(())
}

/// Sets up the tracing subscriber from `RUST_LOG` or the verbosity flags
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            EnvFilter::new("error")
        } else {
            match verbose {
                0 => EnvFilter::new("orpheus_core=info,warn"),
                1 => EnvFilter::new("orpheus_core=debug,info"),
                _ => EnvFilter::new("trace"),
            }
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
