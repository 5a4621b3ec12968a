// src/ingest/mod.rs
pub mod providers;
pub mod types;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;

use crate::error::FetchError;
use crate::ingest::types::{FeedFetcher, FeedTarget};
use crate::types::{feed_offset, AnnouncementRecord, Mode};

/// One-time metrics registration (so series show up in the exposition dump).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "monitor_records_fetched_total",
            "Records accepted at the fetch boundary."
        );
        describe_counter!(
            "monitor_records_dropped_total",
            "Records rejected at the fetch boundary (missing company/subject)."
        );
        describe_counter!("monitor_fetch_errors_total", "Feed fetch/parse errors.");
        describe_histogram!("monitor_fetch_ms", "Feed fetch time in milliseconds.");
    });
}

/// Normalize text: decode entities, strip tags, collapse whitespace.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Normalize “ ” ‘ ’ to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace (incl. nbsp)
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").trim().to_string();

    // 5) Length cap: 1000 chars
    if out.chars().count() > 1000 {
        out = out.chars().take(1000).collect();
    }

    out
}

/// Parse a feed timestamp (IST wall clock) in any of the formats BSE emits.
pub fn parse_feed_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    const FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%d-%m-%Y %H:%M:%S",
        "%d/%m/%Y %H:%M:%S",
        "%d-%m-%Y %H:%M",
        "%d/%m/%Y %H:%M",
    ];
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .and_then(|naive| feed_offset().from_local_datetime(&naive).single())
}

/// Fetch boundary: drop malformed records and cap the list.
/// Returns (kept, dropped_count).
pub fn validate_records(
    raw: Vec<AnnouncementRecord>,
    max_records: usize,
) -> (Vec<AnnouncementRecord>, usize) {
    let mut dropped = 0usize;
    let mut kept = Vec::with_capacity(raw.len().min(max_records));
    for rec in raw {
        if rec.company_name.trim().is_empty() || rec.subject.trim().is_empty() {
            tracing::debug!(id = %rec.raw_id, "record missing company or subject, dropped");
            dropped += 1;
            continue;
        }
        if kept.len() < max_records {
            kept.push(rec);
        }
    }
    (kept, dropped)
}

/// Run the fetcher once. Failures become an empty list plus the error,
/// so the pipeline can decide whether to report it.
pub async fn fetch_or_empty(
    fetcher: &dyn FeedFetcher,
    target: &FeedTarget,
    mode: Mode,
    max_records: usize,
) -> (Vec<AnnouncementRecord>, Option<FetchError>) {
    ensure_metrics_described();

    let t0 = std::time::Instant::now();
    let res = fetcher.fetch(target, mode).await;
    histogram!("monitor_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

    match res {
        Ok(raw) => {
            let (kept, dropped) = validate_records(raw, max_records);
            counter!("monitor_records_fetched_total").increment(kept.len() as u64);
            counter!("monitor_records_dropped_total").increment(dropped as u64);
            tracing::info!(
                target: "ingest",
                provider = fetcher.name(),
                kept = kept.len(),
                dropped,
                "feed fetched"
            );
            (kept, None)
        }
        Err(e) => {
            tracing::warn!(error = %e, provider = fetcher.name(), "feed fetch failed");
            counter!("monitor_fetch_errors_total").increment(1);
            (Vec::new(), Some(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn normalize_text_collapses_ws_and_entities() {
        let s = "  Board&nbsp;&nbsp; Meeting <b>Intimation</b>  ";
        assert_eq!(normalize_text(s), "Board Meeting Intimation");
    }

    #[test]
    fn parses_api_and_table_formats_as_ist() {
        let a = parse_feed_timestamp("2025-03-14T14:55:12.53").unwrap();
        assert_eq!(a.offset(), &feed_offset());
        assert_eq!((a.hour(), a.minute(), a.second()), (14, 55, 12));

        let b = parse_feed_timestamp("14-03-2025 14:55:12").unwrap();
        assert_eq!(a.with_nanosecond(0).unwrap(), b);

        assert!(parse_feed_timestamp("14/03/2025 09:01").is_some());
        assert!(parse_feed_timestamp("2025-03-14T09:25:00Z").is_some());
    }

    #[test]
    fn unparseable_timestamp_is_none() {
        assert!(parse_feed_timestamp("").is_none());
        assert!(parse_feed_timestamp("yesterday").is_none());
        assert!(parse_feed_timestamp("2025-13-45T99:00:00").is_none());
    }

    #[test]
    fn validate_drops_blank_and_caps() {
        let mk = |id: &str, company: &str, subject: &str| AnnouncementRecord {
            raw_id: id.into(),
            company_name: company.into(),
            scrip_code: None,
            subject: subject.into(),
            filed_at: None,
            attachment_url: None,
        };
        let raw = vec![
            mk("1", "A", "x"),
            mk("2", " ", "x"),
            mk("3", "B", ""),
            mk("4", "C", "y"),
            mk("5", "D", "z"),
        ];
        let (kept, dropped) = validate_records(raw, 2);
        assert_eq!(dropped, 2);
        let ids: Vec<_> = kept.iter().map(|r| r.raw_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "4"]);
    }
}
