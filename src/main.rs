//! Trend Monitor — Binary Entrypoint
//! One batch pass: warm up the feed hub, fan out over the configured sources,
//! filter new items against keywords and history, deliver, persist.

use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use trend_monitor::config;
use trend_monitor::filter;
use trend_monitor::history::HistoryStore;
use trend_monitor::ingest::transport::{warmup, HttpTransport};
use trend_monitor::ingest::Fetcher;
use trend_monitor::notify;
use trend_monitor::{MirrorRouter, TelegramNotifier};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let started = Instant::now();

    // Load .env in local/dev; no-op in CI and production.
    let _ = dotenvy::dotenv();
    init_tracing();
    info!("trend monitor starting");

    let mirror = Arc::new(MirrorRouter::from_env()?);
    info!(primary = %mirror.primary(), "feed hub configured");

    warmup(mirror.primary()).await;

    let sources = config::load_sources(&config::sources_path())?;
    info!(count = sources.len(), "loaded sources");

    let groups = config::load_keyword_groups(&config::keywords_path());
    info!(count = groups.len(), "loaded keyword groups");

    let store = HistoryStore::new(config::history_path());
    let known = store.load_urls();
    info!(count = known.len(), "loaded history urls");

    let fetcher = Fetcher::new(Arc::new(HttpTransport::new()), Arc::clone(&mirror));
    let result = fetcher.fetch_all(&sources).await;
    info!(
        success = result.success_count,
        failed = result.fail_count,
        "fetch complete"
    );

    let new_items = filter::select_new_items(&result, &groups, &known);
    info!(count = new_items.len(), "new items after filtering");

    if new_items.is_empty() {
        info!("no new items to send");
    } else if let Some(notifier) = TelegramNotifier::from_env() {
        let sent = notify::deliver_batches(&notifier, &new_items).await;
        info!(batches = sent, "delivery finished");

        // History records only what was forwarded; a dry run leaves it
        // untouched so the same items come back as new next run.
        if let Err(e) = store.append(&new_items, &known) {
            error!(error = ?e, "failed to persist history");
        }
    } else {
        notify::log_dry_run(&new_items);
    }

    info!(elapsed = ?started.elapsed(), "run complete");
    Ok(())
}
