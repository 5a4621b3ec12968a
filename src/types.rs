// src/types.rs
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// BSE publishes filing times in IST (UTC+05:30, no DST).
pub const FEED_UTC_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

pub fn feed_offset() -> FixedOffset {
    FixedOffset::east_opt(FEED_UTC_OFFSET_SECS).expect("IST offset is within ±24h")
}

/// Current wall-clock time in the feed's timezone.
pub fn feed_now() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&feed_offset())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    /// Upper-cased company name used for substring matching.
    pub display_name: String,
    /// BSE scrip code; exact-match key when present.
    pub exchange_code: Option<String>,
}

impl WatchlistEntry {
    pub fn new(display_name: impl Into<String>, exchange_code: Option<&str>) -> Self {
        Self {
            display_name: display_name.into(),
            exchange_code: exchange_code.map(str::to_string),
        }
    }
}

/// Ordered watchlist. Iteration order is the first-match-wins order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Watchlist {
    entries: Vec<WatchlistEntry>,
}

impl Watchlist {
    pub fn new(entries: Vec<WatchlistEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[WatchlistEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WatchlistEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One announcement as produced by a feed fetcher. Read-only after the fetch boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementRecord {
    pub raw_id: String,
    pub company_name: String,
    pub scrip_code: Option<String>,
    pub subject: String,
    /// `None` when upstream sent no timestamp or one we could not parse.
    pub filed_at: Option<DateTime<FixedOffset>>,
    pub attachment_url: Option<String>,
}

/// A record paired with the watchlist entry it matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedRecord {
    pub entry: WatchlistEntry,
    pub record: AnnouncementRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    Scheduled,
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Live,
    History,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    All,
    Single(WatchlistEntry),
}

impl Scope {
    /// Human label used in digest headers and log lines.
    pub fn label(&self) -> &str {
        match self {
            Scope::All => "Watchlist",
            Scope::Single(e) => &e.display_name,
        }
    }
}

/// What a single run scans and how it reports. Built once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    pub trigger: TriggerKind,
    pub scope: Scope,
    pub mode: Mode,
}
