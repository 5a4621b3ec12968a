// src/config/monitor.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

pub const ENV_CONFIG_PATH: &str = "MONITOR_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/monitor.toml";

const DEFAULT_API_URL: &str = "https://api.bseindia.com/BseIndiaAPI/api/AnnSubCategoryGetData/w";
const DEFAULT_PAGE_URL: &str = "https://www.bseindia.com/corporates/ann.aspx";
const DEFAULT_ATTACHMENT_BASE: &str = "https://www.bseindia.com/xml-data/corpfiling/AttachLive";
const DEFAULT_TELEGRAM_API: &str = "https://api.telegram.org";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedStrategy {
    /// Structured JSON endpoint (preferred).
    Api,
    /// Server-rendered announcements table.
    Html,
}

impl FeedStrategy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "api" | "json" => Some(Self::Api),
            "html" | "page" | "scrape" => Some(Self::Html),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub strategy: FeedStrategy,
    pub api_url: String,
    pub page_url: String,
    pub attachment_base: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Upper bound on records handed to the matcher.
    pub max_records: usize,
    /// How many days back the HISTORY date range reaches.
    pub history_days: i64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            strategy: FeedStrategy::Api,
            api_url: DEFAULT_API_URL.to_string(),
            page_url: DEFAULT_PAGE_URL.to_string(),
            attachment_base: DEFAULT_ATTACHMENT_BASE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 10,
            max_records: 50,
            history_days: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    pub api_base: String,
    pub token: Option<String>,
    pub chat_id: Option<String>,
    pub timeout_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_TELEGRAM_API.to_string(),
            token: None,
            chat_id: None,
            timeout_secs: 10,
        }
    }
}

/// Upper bound for the live window: one day.
pub const MAX_LOOKBACK_MINUTES: i64 = 24 * 60;
/// Upper bound for the history date range.
pub const MAX_HISTORY_DAYS: i64 = 365;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub lookback_minutes: i64,
    pub top_n: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            lookback_minutes: 15,
            top_n: 5,
        }
    }
}

/// Immutable run configuration, built once in `main` and passed down.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub feed: FeedConfig,
    pub telegram: TelegramConfig,
    pub filter: FilterConfig,
    /// Log messages instead of sending them.
    pub dry_run: bool,
}

impl MonitorConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading monitor config from {}", path.display()))?;
        let cfg: MonitorConfig = toml::from_str(&data)
            .with_context(|| format!("parsing monitor config {}", path.display()))?;
        Ok(cfg.sanitized())
    }

    /// File (env path, then `config/monitor.toml`, then defaults) plus env overrides.
    pub fn load() -> Result<Self> {
        let base = match std::env::var(ENV_CONFIG_PATH) {
            Ok(p) => Self::load_from_file(PathBuf::from(p))?,
            Err(_) => {
                let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
                if default_p.exists() {
                    Self::load_from_file(&default_p)?
                } else {
                    Self::default()
                }
            }
        };
        Ok(base.with_env_overrides(|k| std::env::var(k).ok()))
    }

    /// Apply overrides from a key lookup (the process env in production).
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(t) = get("TELEGRAM_TOKEN") {
            self.telegram.token = Some(t);
        }
        if let Some(c) = get("TELEGRAM_CHAT_ID") {
            self.telegram.chat_id = Some(c);
        }
        if let Some(s) = get("FEED_STRATEGY") {
            match FeedStrategy::parse(&s) {
                Some(st) => self.feed.strategy = st,
                None => tracing::warn!(value = %s, "unknown FEED_STRATEGY, keeping {:?}", self.feed.strategy),
            }
        }
        if let Some(v) = get("LOOKBACK_MINUTES").and_then(|v| v.parse().ok()) {
            self.filter.lookback_minutes = v;
        }
        if let Some(v) = get("HISTORY_TOP_N").and_then(|v| v.parse().ok()) {
            self.filter.top_n = v;
        }
        if let Some(v) = get("HTTP_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.feed.timeout_secs = v;
            self.telegram.timeout_secs = v;
        }
        if let Some(v) = get("NOTIFY_DRY_RUN") {
            self.dry_run = matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        self.sanitized()
    }

    fn sanitized(mut self) -> Self {
        if self.filter.lookback_minutes < 1 {
            self.filter.lookback_minutes = FilterConfig::default().lookback_minutes;
        }
        if self.filter.lookback_minutes > MAX_LOOKBACK_MINUTES {
            tracing::warn!(
                value = self.filter.lookback_minutes,
                max = MAX_LOOKBACK_MINUTES,
                "lookback too large, capped"
            );
            self.filter.lookback_minutes = MAX_LOOKBACK_MINUTES;
        }
        if self.filter.top_n == 0 {
            self.filter.top_n = FilterConfig::default().top_n;
        }
        self.feed.timeout_secs = self.feed.timeout_secs.max(1);
        self.telegram.timeout_secs = self.telegram.timeout_secs.max(1);
        self.feed.max_records = self.feed.max_records.max(1);
        self.feed.history_days = self.feed.history_days.clamp(0, MAX_HISTORY_DAYS);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_match_canonical_values() {
        let cfg = MonitorConfig::default();
        assert_eq!(cfg.filter.lookback_minutes, 15);
        assert_eq!(cfg.filter.top_n, 5);
        assert_eq!(cfg.feed.strategy, FeedStrategy::Api);
        assert!(!cfg.dry_run);
    }

    #[test]
    fn env_overrides_and_sanitizes() {
        let env = env_of(&[
            ("TELEGRAM_TOKEN", " abc "),
            ("TELEGRAM_CHAT_ID", "42"),
            ("FEED_STRATEGY", "HTML"),
            ("LOOKBACK_MINUTES", "0"),
            ("HISTORY_TOP_N", "3"),
            ("HTTP_TIMEOUT_SECS", "7"),
            ("NOTIFY_DRY_RUN", "true"),
        ]);
        let cfg = MonitorConfig::default().with_env_overrides(|k| env.get(k).cloned());
        assert_eq!(cfg.telegram.token.as_deref(), Some("abc"));
        assert_eq!(cfg.telegram.chat_id.as_deref(), Some("42"));
        assert_eq!(cfg.feed.strategy, FeedStrategy::Html);
        // zero lookback falls back to the default window
        assert_eq!(cfg.filter.lookback_minutes, 15);
        assert_eq!(cfg.filter.top_n, 3);
        assert_eq!(cfg.feed.timeout_secs, 7);
        assert!(cfg.dry_run);
    }

    #[test]
    fn huge_windows_are_capped() {
        let env = env_of(&[("LOOKBACK_MINUTES", "9223372036854775807")]);
        let cfg = MonitorConfig::default().with_env_overrides(|k| env.get(k).cloned());
        assert_eq!(cfg.filter.lookback_minutes, MAX_LOOKBACK_MINUTES);

        let cfg: MonitorConfig = toml::from_str("[feed]\nhistory_days = 100000000\n").unwrap();
        assert_eq!(cfg.sanitized().feed.history_days, MAX_HISTORY_DAYS);
    }

    #[test]
    fn junk_values_keep_defaults() {
        let env = env_of(&[("FEED_STRATEGY", "selenium"), ("HISTORY_TOP_N", "five")]);
        let cfg = MonitorConfig::default().with_env_overrides(|k| env.get(k).cloned());
        assert_eq!(cfg.feed.strategy, FeedStrategy::Api);
        assert_eq!(cfg.filter.top_n, 5);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let s = r#"
            [filter]
            lookback_minutes = 20

            [feed]
            strategy = "html"
        "#;
        let cfg: MonitorConfig = toml::from_str(s).unwrap();
        assert_eq!(cfg.filter.lookback_minutes, 20);
        assert_eq!(cfg.filter.top_n, 5);
        assert_eq!(cfg.feed.strategy, FeedStrategy::Html);
        assert_eq!(cfg.feed.api_url, DEFAULT_API_URL);
    }
}
