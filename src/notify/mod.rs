// src/notify/mod.rs
pub mod telegram;

use std::time::Duration;

use anyhow::Result;

use crate::ingest::types::FeedItem;

/// At most this many items per delivery call.
pub const BATCH_SIZE: usize = 10;

/// Pacing delay between consecutive batches.
pub const BATCH_PACING: Duration = Duration::from_secs(3);

/// How many candidates a dry run prints before truncating.
pub const DRY_RUN_PREVIEW: usize = 10;

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<()>;
}

/// Escape the characters that would break a Markdown link label.
fn escape_title(title: &str) -> String {
    title.replace('[', "\\[").replace(']', "\\]")
}

/// One batch as a Markdown message: positional numbering (restarting at 1 per
/// batch) with `N. [title](url)` lines.
pub fn format_batch(items: &[FeedItem]) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        out.push_str(&format!(
            "{}. [{}]({})\n\n",
            i + 1,
            escape_title(&item.title),
            item.url
        ));
    }
    out
}

/// Deliver everything in paced batches. Per-batch errors are logged and do
/// not block later batches. Returns the number of batches that went through.
pub async fn deliver_batches<N: Notifier + ?Sized>(notifier: &N, items: &[FeedItem]) -> usize {
    let total_batches = items.len().div_ceil(BATCH_SIZE);
    let mut sent = 0usize;

    for (batch_no, batch) in items.chunks(BATCH_SIZE).enumerate() {
        let message = format_batch(batch);
        match notifier.send(&message).await {
            Ok(()) => {
                sent += 1;
                tracing::info!(batch = batch_no + 1, total = total_batches, items = batch.len(), "batch sent");
            }
            Err(e) => {
                tracing::error!(batch = batch_no + 1, error = %e, "batch delivery failed");
            }
        }
        if batch_no + 1 < total_batches {
            tokio::time::sleep(BATCH_PACING).await;
        }
    }

    sent
}

/// Degraded mode when credentials are absent: log the first few candidates
/// with a truncation note instead of delivering.
pub fn log_dry_run(items: &[FeedItem]) {
    tracing::warn!("notifier not configured, dry run mode");
    for (i, item) in items.iter().take(DRY_RUN_PREVIEW).enumerate() {
        tracing::info!("  {}. {}", i + 1, item.title);
    }
    if items.len() > DRY_RUN_PREVIEW {
        tracing::info!("... and {} more items", items.len() - DRY_RUN_PREVIEW);
    }
}
