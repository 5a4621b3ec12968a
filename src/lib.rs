// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod config;
pub mod error;
pub mod ingest;
pub mod matcher;
pub mod notify;
pub mod pipeline;
pub mod telemetry;
pub mod trigger;
pub mod types;
pub mod window;

// ---- Re-exports for stable public API ----
pub use crate::error::{DeliveryError, FetchError, LookupError};
pub use crate::ingest::types::{FeedFetcher, FeedTarget};
pub use crate::notify::{NotificationMessage, Notifier};
pub use crate::pipeline::{Pipeline, RunOutcome, RunReport};
pub use crate::trigger::InvocationContext;
pub use crate::types::{
    AnnouncementRecord, MatchedRecord, Mode, ScanRequest, Scope, TriggerKind, Watchlist,
    WatchlistEntry,
};
