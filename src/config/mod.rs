// src/config/mod.rs
pub mod monitor;
pub mod watchlist;

pub use monitor::{
    FeedConfig, FeedStrategy, FilterConfig, MonitorConfig, TelegramConfig, MAX_HISTORY_DAYS,
    MAX_LOOKBACK_MINUTES,
};
pub use watchlist::{builtin_watchlist, load_watchlist_default, load_watchlist_from};
