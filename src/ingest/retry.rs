// src/ingest/retry.rs
use std::time::Duration;

use url::Url;

use crate::ingest::transport::Transport;
use crate::ingest::types::FetchError;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Linear backoff: 2s after the first failed attempt, 4s after the second, …
/// No jitter here; the per-task pre-fetch delay and the randomized User-Agent
/// are the only randomness in the pipeline.
fn backoff_after(attempt: u32) -> Duration {
    Duration::from_secs(u64::from(attempt) * 2)
}

/// Fetch `url` up to `max_attempts` times, sleeping between attempts. Returns
/// the first successful body, or `Exhausted` carrying the last cause.
pub async fn fetch_with_retry<T>(
    transport: &T,
    url: &Url,
    max_attempts: u32,
) -> Result<Vec<u8>, FetchError>
where
    T: Transport + ?Sized,
{
    let max_attempts = max_attempts.max(1);
    let mut last: Option<FetchError> = None;

    for attempt in 1..=max_attempts {
        match transport.get(url).await {
            Ok(body) => return Ok(body),
            Err(e) => {
                tracing::warn!(%url, attempt, error = %e, "fetch attempt failed");
                last = Some(e);
                if attempt < max_attempts {
                    tokio::time::sleep(backoff_after(attempt)).await;
                }
            }
        }
    }

    // The loop runs at least once, so a cause is always recorded.
    let cause = last.expect("at least one fetch attempt runs");
    Err(FetchError::Exhausted {
        attempts: max_attempts,
        last: Box::new(cause),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_grows_linearly() {
        assert_eq!(backoff_after(1), Duration::from_secs(2));
        assert_eq!(backoff_after(2), Duration::from_secs(4));
        assert_eq!(backoff_after(3), Duration::from_secs(6));
    }
}
