//! # Watchlist Matcher
//! Pure filtering of fetched records against the watchlist or a single target.
//!
//! Rule: a record relates to an entry when its scrip code equals the entry's
//! exchange code, or its upper-cased company name contains the entry's display
//! name. Entries are tried in watchlist order and the first hit wins, so two
//! overlapping names ("PRECISION WIRES" / "PRECISION WIRES II") resolve to
//! whichever is listed first.

use crate::types::{AnnouncementRecord, MatchedRecord, Scope, Watchlist, WatchlistEntry};

pub fn entry_matches(record: &AnnouncementRecord, entry: &WatchlistEntry) -> bool {
    if let (Some(rc), Some(ec)) = (record.scrip_code.as_deref(), entry.exchange_code.as_deref()) {
        if rc.trim() == ec {
            return true;
        }
    }
    let name = entry.display_name.trim();
    !name.is_empty() && record.company_name.to_uppercase().contains(&name.to_uppercase())
}

/// First watchlist entry the record relates to.
pub fn match_entry<'w>(
    record: &AnnouncementRecord,
    watchlist: &'w Watchlist,
) -> Option<&'w WatchlistEntry> {
    watchlist.iter().find(|e| entry_matches(record, e))
}

/// Keep records relating to the scope, in feed order.
pub fn filter_by_scope(
    scope: &Scope,
    records: Vec<AnnouncementRecord>,
    watchlist: &Watchlist,
) -> Vec<MatchedRecord> {
    let mut out = Vec::with_capacity(records.len());
    for record in records {
        let entry = match scope {
            Scope::All => match_entry(&record, watchlist),
            Scope::Single(target) => Some(target).filter(|t| entry_matches(&record, t)),
        };
        match entry {
            Some(e) => {
                tracing::debug!(company = %record.company_name, entry = %e.display_name, "matched");
                out.push(MatchedRecord {
                    entry: e.clone(),
                    record,
                });
            }
            None => tracing::trace!(company = %record.company_name, "not on watchlist"),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(company: &str, code: Option<&str>) -> AnnouncementRecord {
        AnnouncementRecord {
            raw_id: company.to_string(),
            company_name: company.to_string(),
            scrip_code: code.map(str::to_string),
            subject: "Board Meeting".into(),
            filed_at: None,
            attachment_url: None,
        }
    }

    fn wl() -> Watchlist {
        Watchlist::new(vec![
            WatchlistEntry::new("TIPS MUSIC", Some("532375")),
            WatchlistEntry::new("PRECISION WIRES", Some("523539")),
            WatchlistEntry::new("WONDERLA", None),
        ])
    }

    #[test]
    fn substring_match_is_case_insensitive() {
        let w = wl();
        let e = match_entry(&rec("Tips Music Ltd", None), &w).unwrap();
        assert_eq!(e.display_name, "TIPS MUSIC");
        assert!(match_entry(&rec("Wonderla Holidays Limited", None), &w).is_some());
        assert!(match_entry(&rec("Reliance Industries", None), &w).is_none());
    }

    #[test]
    fn exact_code_matches_even_with_different_name() {
        let w = wl();
        let e = match_entry(&rec("PWIL", Some("523539")), &w).unwrap();
        assert_eq!(e.display_name, "PRECISION WIRES");
    }

    #[test]
    fn first_entry_wins_on_overlap() {
        let w = Watchlist::new(vec![
            WatchlistEntry::new("PRECISION WIRES", None),
            WatchlistEntry::new("PRECISION WIRES II", None),
        ]);
        let e = match_entry(&rec("PRECISION WIRES II LTD", None), &w).unwrap();
        assert_eq!(e.display_name, "PRECISION WIRES");
    }

    #[test]
    fn single_scope_keeps_only_target() {
        let w = wl();
        let target = w.entries()[2].clone();
        let records = vec![
            rec("TIPS MUSIC LTD", Some("532375")),
            rec("WONDERLA HOLIDAYS LTD", Some("538268")),
            rec("ACME", None),
        ];
        let out = filter_by_scope(&Scope::Single(target), records, &w);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].record.company_name, "WONDERLA HOLIDAYS LTD");
        assert_eq!(out[0].entry.display_name, "WONDERLA");
    }

    #[test]
    fn all_scope_preserves_feed_order() {
        let w = wl();
        let records = vec![
            rec("WONDERLA HOLIDAYS LTD", None),
            rec("ACME", None),
            rec("TIPS MUSIC LTD", None),
        ];
        let out = filter_by_scope(&Scope::All, records, &w);
        let names: Vec<_> = out.iter().map(|m| m.entry.display_name.as_str()).collect();
        assert_eq!(names, vec!["WONDERLA", "TIPS MUSIC"]);
    }
}
