// src/ingest/providers/bse_api.rs
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveDate};
use reqwest::header::{ACCEPT, ORIGIN, REFERER, USER_AGENT};
use serde::Deserialize;
use std::time::Duration;

use crate::config::{FeedConfig, MAX_HISTORY_DAYS};
use crate::error::FetchError;
use crate::ingest::types::{FeedFetcher, FeedTarget};
use crate::ingest::{normalize_text, parse_feed_timestamp};
use crate::types::{feed_now, AnnouncementRecord, Mode};

const BSE_SITE: &str = "https://www.bseindia.com";

#[derive(Debug, Deserialize)]
struct AnnResponse {
    #[serde(rename = "Table", default)]
    table: Vec<AnnRow>,
}

#[derive(Debug, Deserialize)]
struct AnnRow {
    #[serde(rename = "NEWSID")]
    news_id: Option<serde_json::Value>,
    #[serde(rename = "SCRIP_CD")]
    scrip_cd: Option<serde_json::Value>,
    #[serde(rename = "SLONGNAME")]
    long_name: Option<String>,
    #[serde(rename = "NEWSSUB")]
    news_sub: Option<String>,
    #[serde(rename = "HEADLINE")]
    headline: Option<String>,
    #[serde(rename = "NEWS_DT")]
    news_dt: Option<String>,
    #[serde(rename = "DissemDT")]
    dissem_dt: Option<String>,
    #[serde(rename = "ATTACHMENTNAME")]
    attachment: Option<String>,
}

/// Numbers and strings both show up for id/code fields.
fn value_to_string(v: &serde_json::Value) -> Option<String> {
    match v {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Structured announcements endpoint (`AnnSubCategoryGetData`).
pub struct BseApiFetcher {
    source: Source,
    attachment_base: String,
}

enum Source {
    Fixture(String),
    Http {
        url: String,
        user_agent: String,
        timeout: Duration,
        history_days: i64,
        client: reqwest::Client,
    },
}

impl BseApiFetcher {
    pub fn new(cfg: &FeedConfig, client: reqwest::Client) -> Self {
        Self {
            source: Source::Http {
                url: cfg.api_url.clone(),
                user_agent: cfg.user_agent.clone(),
                timeout: Duration::from_secs(cfg.timeout_secs),
                history_days: cfg.history_days.clamp(0, MAX_HISTORY_DAYS),
                client,
            },
            attachment_base: cfg.attachment_base.clone(),
        }
    }

    /// Serve a canned response body instead of calling the endpoint.
    pub fn from_fixture_str(body: &str, attachment_base: &str) -> Self {
        Self {
            source: Source::Fixture(body.to_string()),
            attachment_base: attachment_base.to_string(),
        }
    }

    /// Query string for a target. HISTORY reaches back `history_days`;
    /// LIVE covers yesterday and today so a run just after midnight still
    /// sees the late-evening filings.
    fn query_for(
        target: &FeedTarget,
        mode: Mode,
        today: NaiveDate,
        history_days: i64,
    ) -> Vec<(&'static str, String)> {
        let scrip = match target {
            FeedTarget::Company { code, .. } => code.clone(),
            FeedTarget::Global => String::new(),
        };
        let days_back = match mode {
            Mode::Live => 1,
            Mode::History => history_days,
        };
        let from = today - ChronoDuration::days(days_back);
        vec![
            ("pageno", "1".to_string()),
            ("strCat", "-1".to_string()),
            ("strPrevDate", from.format("%Y%m%d").to_string()),
            ("strScrip", scrip),
            ("strSearch", "P".to_string()),
            ("strToDate", today.format("%Y%m%d").to_string()),
            ("strType", "C".to_string()),
            ("subcategory", "-1".to_string()),
        ]
    }

    pub fn parse_body(body: &str, attachment_base: &str) -> Result<Vec<AnnouncementRecord>, FetchError> {
        let resp: AnnResponse = serde_json::from_str(body.trim())
            .map_err(|e| FetchError::Parse(format!("announcement json: {e}")))?;

        let base = attachment_base.trim_end_matches('/');
        let mut out = Vec::with_capacity(resp.table.len());
        for (i, row) in resp.table.into_iter().enumerate() {
            let subject = non_empty(row.news_sub.as_deref())
                .or(non_empty(row.headline.as_deref()))
                .map(normalize_text)
                .unwrap_or_default();
            let filed_at = non_empty(row.news_dt.as_deref())
                .and_then(parse_feed_timestamp)
                .or_else(|| non_empty(row.dissem_dt.as_deref()).and_then(parse_feed_timestamp));
            let attachment_url =
                non_empty(row.attachment.as_deref()).map(|name| format!("{base}/{name}"));

            out.push(AnnouncementRecord {
                raw_id: row
                    .news_id
                    .as_ref()
                    .and_then(value_to_string)
                    .unwrap_or_else(|| format!("row-{i}")),
                company_name: row
                    .long_name
                    .as_deref()
                    .map(normalize_text)
                    .unwrap_or_default(),
                scrip_code: row.scrip_cd.as_ref().and_then(value_to_string),
                subject,
                filed_at,
                attachment_url,
            });
        }
        Ok(out)
    }
}

#[async_trait]
impl FeedFetcher for BseApiFetcher {
    async fn fetch(
        &self,
        target: &FeedTarget,
        mode: Mode,
    ) -> Result<Vec<AnnouncementRecord>, FetchError> {
        match &self.source {
            Source::Fixture(s) => Self::parse_body(s, &self.attachment_base),
            Source::Http {
                url,
                user_agent,
                timeout,
                history_days,
                client,
            } => {
                let query = Self::query_for(target, mode, feed_now().date_naive(), *history_days);
                let resp = client
                    .get(url)
                    .query(&query)
                    .header(USER_AGENT, user_agent)
                    .header(REFERER, format!("{BSE_SITE}/"))
                    .header(ORIGIN, BSE_SITE)
                    .header(ACCEPT, "application/json, text/plain, */*")
                    .timeout(*timeout)
                    .send()
                    .await?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(FetchError::Status {
                        status: status.as_u16(),
                    });
                }
                let body = resp.text().await?;
                Self::parse_body(&body, &self.attachment_base)
            }
        }
    }

    fn name(&self) -> &'static str {
        "bse-api"
    }
}
