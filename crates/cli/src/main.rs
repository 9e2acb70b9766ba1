//! Searchlight CLI — drive the search overlay from the terminal.
//!
//! Runs the overlay state machine against a built site directory: deferred
//! scripts are resolved under `--site-root`, queries are answered from an
//! index export, and user actions come from stdin or a script file.

mod backend;
mod fetcher;
mod script;
mod surface;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use searchlight_core::gateway::SearchConnector;
use searchlight_core::{load_config, Controller};
use tokio::io::BufReader;
use tracing::{error, info};

use backend::{load_export, StaticIndexConnector, UnreachableConnector};
use fetcher::FsScriptFetcher;
use surface::{OutputFormat, TerminalSurface};

/// Searchlight — search overlay for static blogs, driven from the terminal.
#[derive(Parser)]
#[command(name = "searchlight", version, about)]
struct Cli {
    /// Overlay configuration file
    #[arg(long, default_value = "searchlight.toml")]
    config: PathBuf,

    /// Built site directory the deferred scripts are served from
    #[arg(long, default_value = "public")]
    site_root: PathBuf,

    /// JSON export of the search index records
    #[arg(long)]
    index: Option<PathBuf>,

    /// Read actions from this file instead of stdin
    #[arg(long)]
    script: Option<PathBuf>,

    /// Print results as HTML markup
    #[arg(long, conflicts_with = "json")]
    html: bool,

    /// Print results as JSON render instructions
    #[arg(long)]
    json: bool,
}

/// Language setting of the environment, the terminal's equivalent of the browser language.
fn env_language() -> Option<String> {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|v| !v.is_empty() && v != "C" && v != "POSIX")
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("searchlight=info".parse().expect("static directive")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match load_config(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            error!(path = %cli.config.display(), error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };
    if config.locale.language.is_none() {
        config.locale.language = env_language();
    }

    let connector: Arc<dyn SearchConnector> = match &cli.index {
        Some(path) => match load_export(path) {
            Ok(records) => Arc::new(StaticIndexConnector::new(records)),
            Err(e) => {
                error!(error = %e, "Could not load index export");
                std::process::exit(1);
            }
        },
        None => Arc::new(UnreachableConnector),
    };

    let format = if cli.html {
        OutputFormat::Html
    } else if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let surface = TerminalSurface::new(std::io::stdout(), format);
    let fetcher = Arc::new(FsScriptFetcher::new(cli.site_root.clone()));

    let (controller, rx) = match Controller::new(config, surface, fetcher, connector) {
        Ok(parts) => parts,
        Err(e) => {
            error!(path = %cli.config.display(), error = %e, "Search overlay not installed");
            std::process::exit(1);
        }
    };

    let events = controller.sender();
    match cli.script {
        Some(path) => {
            let file = match tokio::fs::File::open(&path).await {
                Ok(f) => f,
                Err(e) => {
                    error!(path = %path.display(), error = %e, "Could not open script");
                    std::process::exit(1);
                }
            };
            tokio::spawn(script::feed(BufReader::new(file), events));
        }
        None => {
            info!("Reading actions from stdin (click open, key s, search <text>, key esc, quit)");
            tokio::spawn(script::feed(BufReader::new(tokio::io::stdin()), events));
        }
    }

    controller.run(rx).await;
}
