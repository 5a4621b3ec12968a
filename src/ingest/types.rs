// src/ingest/types.rs
use crate::error::FetchError;
use crate::types::{AnnouncementRecord, Mode, Scope};

/// What the fetcher should pull: the exchange-wide feed or one scrip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedTarget {
    Global,
    Company { code: String, name: String },
}

impl FeedTarget {
    /// A single-company scope narrows the fetch only when the entry has a code.
    pub fn for_scope(scope: &Scope) -> Self {
        match scope {
            Scope::Single(e) => match &e.exchange_code {
                Some(code) => FeedTarget::Company {
                    code: code.clone(),
                    name: e.display_name.clone(),
                },
                None => FeedTarget::Global,
            },
            Scope::All => FeedTarget::Global,
        }
    }
}

/// A feed strategy. Returns records newest first.
///
/// `mode` sizes the lookup: LIVE only needs the last day of filings,
/// HISTORY reaches back as far as the strategy allows.
#[async_trait::async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch(
        &self,
        target: &FeedTarget,
        mode: Mode,
    ) -> Result<Vec<AnnouncementRecord>, FetchError>;
    fn name(&self) -> &'static str;
}
