// src/ingest/providers/mod.rs
pub mod bse_api;
pub mod bse_html;

use crate::config::{FeedConfig, FeedStrategy};
use crate::ingest::types::FeedFetcher;

pub use bse_api::BseApiFetcher;
pub use bse_html::BseHtmlFetcher;

/// Pick the fetcher for the configured strategy.
pub fn build_fetcher(cfg: &FeedConfig, client: reqwest::Client) -> Box<dyn FeedFetcher> {
    match cfg.strategy {
        FeedStrategy::Api => Box::new(BseApiFetcher::new(cfg, client)),
        FeedStrategy::Html => Box::new(BseHtmlFetcher::new(cfg, client)),
    }
}
