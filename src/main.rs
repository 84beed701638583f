//! Checkpost: check-in submission pipeline with a durable retry queue.
//!
//! Entry point for the operator-driven pipeline. Each invocation submits
//! the supplied scan payloads (plus any backlog retained by earlier runs)
//! to the recording service; with no payloads it runs a retry pass over
//! the backlog alone.

use std::sync::Arc;

use anyhow::{Context, Result};
use checkpost_core::{Clock, RealClock};
use checkpost_submit::{
    record_from_scan, report::duplicate_submission_notice, CheckInEngine, DebounceWindow,
    JsonFileStore, Notifier, PendingQueue, RecordingClient, TracingNotifier,
};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod config;

use config::Config;

#[derive(Debug, Parser)]
#[command(name = "checkpost", about = "Check-in submission pipeline with a durable retry queue")]
struct Cli {
    /// Decoded scan payloads or query-style record strings
    /// (`name=ada&id=badge-7`).
    scans: Vec<String>,

    /// Submit a checkout (uncheck) for the given name instead of checking
    /// in.
    #[arg(long, value_name = "NAME", conflicts_with_all = ["scans", "names"])]
    uncheck: Option<String>,

    /// List the identity names known to the recording service.
    #[arg(long, conflicts_with = "scans")]
    names: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::load()?;
    info!(
        service_url = %config.service_url,
        queue_path = %config.queue_path,
        "configuration loaded"
    );

    let clock: Arc<dyn Clock> = Arc::new(RealClock);
    let client = Arc::new(
        RecordingClient::new(config.to_client_config()).context("failed to build client")?,
    );
    let queue = PendingQueue::new(Arc::new(JsonFileStore::new(&config.queue_path)));
    let notifier = Arc::new(TracingNotifier);
    let mut engine = CheckInEngine::new(
        client.clone(),
        queue,
        notifier.clone(),
        clock.clone(),
        config.to_engine_config(),
    );

    if cli.names {
        let names = client.known_names().await.context("failed to fetch known names")?;
        for name in names {
            println!("{name}");
        }
        return Ok(());
    }

    if let Some(name) = cli.uncheck {
        engine.submit_uncheck(&name).await.with_context(|| format!("checkout of {name} failed"))?;
        return Ok(());
    }

    if cli.scans.is_empty() {
        let retained = engine.run_pass().await.context("retry pass failed")?;
        info!(retained, "retry pass complete");
        return Ok(());
    }

    let mut debounce = DebounceWindow::new(clock, config.debounce_window());
    for payload in &cli.scans {
        let Some(record) = record_from_scan(payload) else {
            debug!(payload, "payload carried no record, skipped");
            continue;
        };

        if !debounce.should_submit(&record.name) {
            notifier.notify(duplicate_submission_notice(&record.name));
            continue;
        }

        let retained = engine
            .check_in_and_save(record)
            .await
            .with_context(|| format!("check-in pass for {payload:?} failed"))?;
        debug!(retained, "pass complete");
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
