// src/ingest/mod.rs
pub mod mirror;
pub mod parse;
pub mod retry;
pub mod transport;
pub mod types;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::Rng;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

use crate::ingest::mirror::MirrorRouter;
use crate::ingest::transport::Transport;
use crate::ingest::types::{FeedItem, FetchError, RunResult, Source};

/// Admission cap: at most this many fetches in flight at once; excess tasks
/// wait for a permit.
pub const MAX_CONCURRENT_FETCHES: usize = 5;

/// Pre-fetch load-shaping delay, uniform in [0, cap), so the sources do not
/// hit the hub as a thundering herd.
pub const DEFAULT_JITTER_MS: u64 = 1000;

/// Fans one fetch task out per source and collects a per-source result map
/// plus success/fail counters behind a fan-in barrier.
#[derive(Clone)]
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    mirror: Arc<MirrorRouter>,
    max_attempts: u32,
    jitter_ms: u64,
}

impl Fetcher {
    pub fn new(transport: Arc<dyn Transport>, mirror: Arc<MirrorRouter>) -> Self {
        Self {
            transport,
            mirror,
            max_attempts: retry::DEFAULT_MAX_ATTEMPTS,
            jitter_ms: DEFAULT_JITTER_MS,
        }
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_jitter_ms(mut self, ms: u64) -> Self {
        self.jitter_ms = ms;
        self
    }

    /// Run the whole fan-out. Returns only after every task has completed;
    /// there is no cancellation and no orchestrator-level timeout beyond each
    /// task's own retry budget.
    pub async fn fetch_all(&self, sources: &[Source]) -> RunResult {
        let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT_FETCHES));
        let state = Arc::new(Mutex::new(RunResult::default()));
        let mut tasks = JoinSet::new();

        for source in sources.iter().cloned() {
            let fetcher = self.clone();
            let semaphore = Arc::clone(&semaphore);
            let state = Arc::clone(&state);

            tasks.spawn(async move {
                // Permit is held for the task's whole lifetime and released by
                // drop on every exit path, panics included.
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("fetch semaphore closed");

                if fetcher.jitter_ms > 0 {
                    let delay = rand::rng().random_range(0..fetcher.jitter_ms);
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }

                let outcome = fetcher.fetch_source(&source).await;

                // Never held across an await.
                let mut st = state.lock().expect("run state mutex poisoned");
                match outcome {
                    Ok(items) => {
                        tracing::info!(source = %source.name, items = items.len(), "source fetched");
                        st.per_source.insert(source.name, items);
                        st.success_count += 1;
                    }
                    Err(e) => {
                        tracing::warn!(source = %source.name, error = %e, "source failed");
                        st.fail_count += 1;
                    }
                }
            });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                tracing::error!(error = %e, "fetch task aborted");
            }
        }

        let mut st = state.lock().expect("run state mutex poisoned");
        std::mem::take(&mut *st)
    }

    /// Mirror-aware retrying fetch for one source. On exhausted retries
    /// against a hub URL the router rotates and the rewritten URL is retried
    /// exactly once; a structurally empty feed is an error but never
    /// escalates, parsing the same bytes again cannot help.
    async fn fetch_source(&self, source: &Source) -> Result<Vec<FeedItem>, FetchError> {
        let base = Url::parse(&source.url)?;
        let mut target = self.mirror.rewrite_to_active(&base);
        let mut escalated = false;

        loop {
            match retry::fetch_with_retry(self.transport.as_ref(), &target, self.max_attempts)
                .await
            {
                Ok(body) => {
                    let items = parse::parse_feed(&body);
                    if items.is_empty() {
                        return Err(FetchError::NoItems);
                    }
                    return Ok(items);
                }
                Err(e) => {
                    if !escalated && self.mirror.routes(&target) {
                        escalated = true;
                        self.mirror.switch_to_next();
                        target = self.mirror.rewrite_to_active(&base);
                        tracing::warn!(source = %source.name, retry_url = %target, "retrying via mirror");
                        continue;
                    }
                    return Err(e);
                }
            }
        }
    }
}
