// src/ingest/providers/bse_html.rs
//! Scraper for the announcements page table (`table#lblann`).
//!
//! Row layout: the first non-empty cell reads `COMPANY - CODE - SUBJECT`,
//! somewhere in the row sits `dd-mm-yyyy HH:MM:SS`, and the first link is the
//! filing PDF.

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use reqwest::header::USER_AGENT;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;

use crate::config::FeedConfig;
use crate::error::FetchError;
use crate::ingest::types::{FeedFetcher, FeedTarget};
use crate::ingest::{normalize_text, parse_feed_timestamp};
use crate::types::{AnnouncementRecord, Mode};

/// Rows shorter than this are spacer/pager rows.
const MIN_ROW_TEXT: usize = 10;

pub struct BseHtmlFetcher {
    source: Source,
    page_url: String,
}

enum Source {
    Fixture(String),
    Http {
        user_agent: String,
        timeout: Duration,
        client: reqwest::Client,
    },
}

fn selector(s: &str) -> Result<Selector, FetchError> {
    Selector::parse(s).map_err(|e| FetchError::Parse(format!("selector {s}: {e:?}")))
}

fn cell_text(el: ElementRef<'_>) -> String {
    normalize_text(&el.text().collect::<Vec<_>>().join(" "))
}

fn find_timestamp(text: &str) -> Option<&str> {
    static RE_TS: OnceCell<regex::Regex> = OnceCell::new();
    let re = RE_TS.get_or_init(|| {
        regex::Regex::new(r"\d{2}[-/]\d{2}[-/]\d{4} \d{2}:\d{2}(:\d{2})?").unwrap()
    });
    re.find(text).map(|m| m.as_str())
}

/// Split `COMPANY - CODE - SUBJECT`. Anything else is kept whole as both
/// company and subject so substring matching still sees the full line.
fn split_headline(line: &str) -> (String, Option<String>, String) {
    let parts: Vec<&str> = line.splitn(3, " - ").map(str::trim).collect();
    match parts.as_slice() {
        [company, code, subject]
            if !code.is_empty() && code.chars().all(|c| c.is_ascii_digit()) =>
        {
            (company.to_string(), Some(code.to_string()), subject.to_string())
        }
        [company, subject] => (company.to_string(), None, subject.to_string()),
        _ => (line.to_string(), None, line.to_string()),
    }
}

impl BseHtmlFetcher {
    pub fn new(cfg: &FeedConfig, client: reqwest::Client) -> Self {
        Self {
            source: Source::Http {
                user_agent: cfg.user_agent.clone(),
                timeout: Duration::from_secs(cfg.timeout_secs),
                client,
            },
            page_url: cfg.page_url.clone(),
        }
    }

    /// Serve a canned page instead of calling the site. `page_url` resolves relative links.
    pub fn from_fixture_str(html: &str, page_url: &str) -> Self {
        Self {
            source: Source::Fixture(html.to_string()),
            page_url: page_url.to_string(),
        }
    }

    pub fn parse_page(html: &str, page_url: &str) -> Result<Vec<AnnouncementRecord>, FetchError> {
        let doc = Html::parse_document(html);
        let table_sel = selector("table#lblann")?;
        let row_sel = selector("tr")?;
        let cell_sel = selector("td")?;
        let link_sel = selector("a[href]")?;
        let base = Url::parse(page_url).ok();

        let Some(table) = doc.select(&table_sel).next() else {
            return Err(FetchError::Parse("announcement table not found".into()));
        };

        let mut out = Vec::new();
        for (i, row) in table.select(&row_sel).enumerate() {
            let row_text = cell_text(row);
            if row_text.chars().count() < MIN_ROW_TEXT {
                continue;
            }
            let Some(headline) = row
                .select(&cell_sel)
                .map(cell_text)
                .find(|t| !t.is_empty())
            else {
                continue;
            };

            let (company_name, scrip_code, subject) = split_headline(&headline);
            let filed_at = find_timestamp(&row_text).and_then(parse_feed_timestamp);
            let attachment_url = row
                .select(&link_sel)
                .filter_map(|a| a.value().attr("href"))
                .map(str::trim)
                .find(|h| !h.is_empty() && !h.starts_with('#') && !h.starts_with("javascript:"))
                .map(|h| match &base {
                    Some(b) => b.join(h).map(|u| u.to_string()).unwrap_or_else(|_| h.to_string()),
                    None => h.to_string(),
                });

            let raw_id = attachment_url
                .as_deref()
                .and_then(|u| u.rsplit('/').next())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("row-{i}"));

            out.push(AnnouncementRecord {
                raw_id,
                company_name,
                scrip_code,
                subject,
                filed_at,
                attachment_url,
            });
        }
        Ok(out)
    }
}

#[async_trait]
impl FeedFetcher for BseHtmlFetcher {
    /// The page has no date filter; both modes read whatever it lists.
    async fn fetch(
        &self,
        target: &FeedTarget,
        _mode: Mode,
    ) -> Result<Vec<AnnouncementRecord>, FetchError> {
        match &self.source {
            Source::Fixture(s) => Self::parse_page(s, &self.page_url),
            Source::Http {
                user_agent,
                timeout,
                client,
            } => {
                let mut req = client
                    .get(&self.page_url)
                    .header(USER_AGENT, user_agent)
                    .timeout(*timeout);
                if let FeedTarget::Company { code, .. } = target {
                    req = req.query(&[("scripcd", code.as_str())]);
                }
                let resp = req.send().await?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(FetchError::Status {
                        status: status.as_u16(),
                    });
                }
                let body = resp.text().await?;
                Self::parse_page(&body, &self.page_url)
            }
        }
    }

    fn name(&self) -> &'static str {
        "bse-html"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headline_split_variants() {
        assert_eq!(
            split_headline("TIPS MUSIC LTD - 532375 - Board Meeting - Q3"),
            (
                "TIPS MUSIC LTD".to_string(),
                Some("532375".to_string()),
                "Board Meeting - Q3".to_string()
            )
        );
        assert_eq!(
            split_headline("WONDERLA HOLIDAYS LTD - Outcome"),
            ("WONDERLA HOLIDAYS LTD".to_string(), None, "Outcome".to_string())
        );
        let whole = "Some unstructured line";
        assert_eq!(
            split_headline(whole),
            (whole.to_string(), None, whole.to_string())
        );
    }

    #[test]
    fn timestamp_is_found_inside_row_text() {
        let t = "Exchange Received Time 14-03-2025 14:55:12 Exchange Disseminated Time 14-03-2025 14:55:40";
        assert_eq!(find_timestamp(t), Some("14-03-2025 14:55:12"));
        assert_eq!(find_timestamp("no time here"), None);
    }

    #[test]
    fn missing_table_is_parse_error() {
        let err = BseHtmlFetcher::parse_page("<html><body></body></html>", "https://x.test/")
            .unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }
}
