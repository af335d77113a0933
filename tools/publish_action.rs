/// Publish Action — CI entry point that keeps generator pages in sync with issues.
///
/// Usage: publish_action [--event <event.json>] [--out-dir <dir>] [--label <name>] [-v]
///
/// The event file defaults to `$GITHUB_EVENT_PATH`.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use phrasegen::ingest::{self, IngestAction, IssueEvent};
use phrasegen::publish::{PagePublisher, Publisher};

#[derive(Parser)]
#[command(name = "publish_action", about = "Publish or remove a generator page for an issue event", version)]
struct Cli {
    /// Path to the issue event payload
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event: PathBuf,

    /// Directory pages are written to
    #[arg(long, default_value = "docs")]
    out_dir: PathBuf,

    /// Label that marks an issue as a generator definition
    #[arg(long, default_value = ingest::DEFAULT_LABEL)]
    label: String,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let event = IssueEvent::load(&cli.event)
        .with_context(|| format!("reading event from {}", cli.event.display()))?;
    tracing::debug!(action = %event.action, issue = event.issue.number, "loaded event");

    let publisher = PagePublisher::new(&cli.out_dir);
    match ingest::plan(&event, &cli.label)? {
        IngestAction::Publish(config) => {
            let path = publisher.publish(&config, &config.id)?;
            println!("Published '{}' to {}", config.name, path.display());
        }
        IngestAction::Remove(id) => {
            publisher.remove(&id)?;
            println!("Removed page {}", id);
        }
        IngestAction::Skip => {
            println!("Nothing to do for '{}' on issue #{}", event.action, event.issue.number);
        }
    }

    Ok(())
}
