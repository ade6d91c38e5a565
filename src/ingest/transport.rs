// src/ingest/transport.rs
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use rand::Rng;
use reqwest::{header, Client, StatusCode};
use url::Url;

use crate::ingest::types::FetchError;

/// Identity pool; one entry is picked uniformly at random per request so
/// consecutive calls are not guaranteed the same User-Agent.
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const POOL_MAX_IDLE_PER_HOST: usize = 10;
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

// One connection pool for the whole process; `Client` clones share it.
static SHARED_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .pool_idle_timeout(POOL_IDLE_TIMEOUT)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "http client builder failed, using defaults");
            Client::new()
        })
});

fn random_user_agent() -> &'static str {
    let idx = rand::rng().random_range(0..USER_AGENTS.len());
    USER_AGENTS[idx]
}

/// Single-request transport seam. Mocked in tests; `HttpTransport` in the
/// binary.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<Vec<u8>, FetchError>;
}

#[derive(Clone, Copy, Default)]
pub struct HttpTransport;

impl HttpTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let resp = SHARED_CLIENT
            .get(url.clone())
            .header(header::USER_AGENT, random_user_agent())
            .header(header::ACCEPT, "application/xml, text/xml, */*")
            .send()
            .await?;

        if resp.status() != StatusCode::OK {
            return Err(FetchError::Status(resp.status()));
        }

        Ok(resp.bytes().await?.to_vec())
    }
}

const WARMUP_TIMEOUT: Duration = Duration::from_secs(90);
const WARMUP_ATTEMPTS: u32 = 3;
const WARMUP_PAUSE: Duration = Duration::from_secs(10);

/// Liveness poll against the hub primary before the run starts. Cold starts on
/// free hosting can take close to a minute, hence the long dedicated timeout.
/// Best-effort: failure is logged, never fatal.
pub async fn warmup(primary: &Url) {
    tracing::info!(hub = %primary, "warming up feed hub");

    let client = match Client::builder().timeout(WARMUP_TIMEOUT).build() {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(error = %e, "warmup client unavailable, skipping warmup");
            return;
        }
    };

    for attempt in 1..=WARMUP_ATTEMPTS {
        tracing::debug!(attempt, "warmup attempt");
        match client
            .get(primary.clone())
            .header(header::USER_AGENT, random_user_agent())
            .send()
            .await
        {
            Ok(resp) if resp.status() == StatusCode::OK => {
                tracing::info!("feed hub warmup successful");
                return;
            }
            Ok(resp) => {
                tracing::warn!(attempt, status = %resp.status(), "warmup returned non-200");
            }
            Err(e) => {
                tracing::warn!(attempt, error = %e, "warmup attempt failed");
            }
        }
        if attempt < WARMUP_ATTEMPTS {
            tokio::time::sleep(WARMUP_PAUSE).await;
        }
    }

    tracing::warn!("feed hub warmup failed, will fail over to mirrors if needed");
}
