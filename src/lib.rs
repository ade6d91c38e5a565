// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod config;
pub mod filter;
pub mod history;
pub mod ingest;
pub mod notify;

// ---- Re-exports for stable public API ----
pub use crate::history::{HistoryRecord, HistoryStore};
pub use crate::ingest::mirror::MirrorRouter;
pub use crate::ingest::types::{FeedItem, FetchError, RunResult, Source};
pub use crate::ingest::Fetcher;
pub use crate::notify::{Notifier, telegram::TelegramNotifier};
