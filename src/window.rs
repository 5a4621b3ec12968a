// src/window.rs
//! Mode-specific trimming of matched records. The one policy switch in the pipeline.

use chrono::{DateTime, Duration, FixedOffset};

use crate::config::{FilterConfig, MAX_LOOKBACK_MINUTES};
use crate::types::{MatchedRecord, Mode};

#[derive(Debug, Clone, Copy)]
pub struct WindowPolicy {
    pub lookback: Duration,
    pub top_n: usize,
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self::from(&FilterConfig::default())
    }
}

impl From<&FilterConfig> for WindowPolicy {
    fn from(cfg: &FilterConfig) -> Self {
        Self {
            lookback: Duration::minutes(cfg.lookback_minutes.clamp(1, MAX_LOOKBACK_MINUTES)),
            top_n: cfg.top_n,
        }
    }
}

/// Live: keep `filed_at > now - lookback`, drop records without a timestamp.
/// History: keep the first `top_n` in feed order.
pub fn apply(
    mode: Mode,
    now: DateTime<FixedOffset>,
    matched: Vec<MatchedRecord>,
    policy: &WindowPolicy,
) -> Vec<MatchedRecord> {
    match mode {
        Mode::Live => {
            let cutoff = now - policy.lookback;
            matched
                .into_iter()
                .filter(|m| match m.record.filed_at {
                    Some(ts) => ts > cutoff,
                    None => {
                        tracing::debug!(id = %m.record.raw_id, "no usable timestamp, dropped");
                        false
                    }
                })
                .collect()
        }
        Mode::History => matched.into_iter().take(policy.top_n).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{feed_offset, AnnouncementRecord, WatchlistEntry};
    use chrono::TimeZone;

    fn now() -> DateTime<FixedOffset> {
        feed_offset().with_ymd_and_hms(2025, 3, 14, 15, 0, 0).unwrap()
    }

    fn at(ts: Option<DateTime<FixedOffset>>, id: &str) -> MatchedRecord {
        MatchedRecord {
            entry: WatchlistEntry::new("TIPS MUSIC", Some("532375")),
            record: AnnouncementRecord {
                raw_id: id.into(),
                company_name: "TIPS MUSIC LTD".into(),
                scrip_code: None,
                subject: "Board Meeting".into(),
                filed_at: ts,
                attachment_url: None,
            },
        }
    }

    #[test]
    fn live_boundary_is_exclusive() {
        let p = WindowPolicy::default();
        let cutoff = now() - Duration::minutes(15);
        let recs = vec![
            at(Some(cutoff), "exact"),
            at(Some(cutoff + Duration::seconds(1)), "inside"),
            at(Some(cutoff - Duration::seconds(1)), "outside"),
        ];
        let out = apply(Mode::Live, now(), recs, &p);
        let ids: Vec<_> = out.iter().map(|m| m.record.raw_id.as_str()).collect();
        assert_eq!(ids, vec!["inside"]);
    }

    #[test]
    fn live_drops_missing_timestamps() {
        let out = apply(
            Mode::Live,
            now(),
            vec![at(None, "x"), at(Some(now()), "y")],
            &WindowPolicy::default(),
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].record.raw_id, "y");
    }

    #[test]
    fn live_compares_across_offsets() {
        // 09:25 UTC == 14:55 IST, five minutes before `now`
        let utc_ts = chrono::Utc
            .with_ymd_and_hms(2025, 3, 14, 9, 25, 0)
            .unwrap()
            .fixed_offset();
        let out = apply(Mode::Live, now(), vec![at(Some(utc_ts), "z")], &WindowPolicy::default());
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn oversized_lookback_is_capped_to_a_day() {
        let cfg = FilterConfig {
            lookback_minutes: i64::MAX,
            top_n: 5,
        };
        let p = WindowPolicy::from(&cfg);
        assert_eq!(p.lookback, Duration::minutes(MAX_LOOKBACK_MINUTES));
        let recs = vec![
            at(Some(now() - Duration::hours(23)), "today"),
            at(Some(now() - Duration::hours(25)), "stale"),
        ];
        let out = apply(Mode::Live, now(), recs, &p);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].record.raw_id, "today");
    }

    #[test]
    fn history_caps_and_ignores_age() {
        let old = now() - Duration::days(40);
        let recs: Vec<_> = (0..7).map(|i| at(Some(old), &i.to_string())).collect();
        let out = apply(Mode::History, now(), recs, &WindowPolicy::default());
        let ids: Vec<_> = out.iter().map(|m| m.record.raw_id.as_str()).collect();
        assert_eq!(ids, vec!["0", "1", "2", "3", "4"]);
    }

    #[test]
    fn history_keeps_undated_records() {
        let out = apply(
            Mode::History,
            now(),
            vec![at(None, "a")],
            &WindowPolicy::default(),
        );
        assert_eq!(out.len(), 1);
    }
}
