// src/notify/format.rs
//! Message text for each notification kind. Markdown here means Telegram's
//! legacy `Markdown` parse mode (`*bold*`, `[text](url)`).

use chrono::{DateTime, FixedOffset};

use super::NotificationMessage;
use crate::error::{FetchError, LookupError};
use crate::types::{MatchedRecord, Scope};

/// Subject text longer than this is cut with an ellipsis.
pub const SUBJECT_MAX_CHARS: usize = 200;

/// Escape Telegram legacy-Markdown control characters in free text.
pub fn escape_markdown(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Text placed inside a `*bold*` span. Legacy Markdown ignores `\` escapes
/// within an entity, so the one character that would close the span is dropped.
fn bold_text(s: &str) -> String {
    s.chars().filter(|c| *c != '*').collect()
}

pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn filed_label(ts: Option<DateTime<FixedOffset>>) -> String {
    match ts {
        Some(t) => t.format("%d-%m-%Y %H:%M").to_string(),
        None => "time n/a".to_string(),
    }
}

fn pdf_line(url: Option<&str>) -> Option<String> {
    url.map(|u| format!("🔗 [View PDF]({u})"))
}

pub fn live_alert(m: &MatchedRecord) -> NotificationMessage {
    let r = &m.record;
    let mut lines = vec![
        format!("🚨 *LIVE: {}*", bold_text(&m.entry.display_name)),
        format!(
            "{}: {}",
            escape_markdown(&r.company_name),
            escape_markdown(&truncate_chars(&r.subject, SUBJECT_MAX_CHARS))
        ),
        format!("🕒 {}", filed_label(r.filed_at)),
    ];
    lines.extend(pdf_line(r.attachment_url.as_deref()));
    NotificationMessage::markdown(lines.join("\n"))
}

/// One message for the whole history result. Empty input → the none-found notice.
pub fn digest(scope: &Scope, matched: &[MatchedRecord]) -> NotificationMessage {
    if matched.is_empty() {
        return none_found(scope);
    }
    let mut blocks = Vec::with_capacity(matched.len());
    for m in matched {
        let r = &m.record;
        let mut block = format!(
            "🔹 {} · {}\n{}",
            filed_label(r.filed_at),
            escape_markdown(&r.company_name),
            escape_markdown(&truncate_chars(&r.subject, SUBJECT_MAX_CHARS))
        );
        if let Some(link) = pdf_line(r.attachment_url.as_deref()) {
            block.push('\n');
            block.push_str(&link);
        }
        blocks.push(block);
    }
    NotificationMessage::markdown(format!(
        "📂 *Official Filings: {}*\n\n{}",
        bold_text(scope.label()),
        blocks.join("\n\n")
    ))
}

pub fn none_found(scope: &Scope) -> NotificationMessage {
    NotificationMessage::plain(format!("⚠️ No recent filings found for {}.", scope.label()))
}

pub fn lookup_error(err: &LookupError) -> NotificationMessage {
    let LookupError::UnknownCompany { query, suggestion } = err;
    let mut text = format!("❌ Unknown Company: {query}");
    if let Some(s) = suggestion {
        text.push_str(&format!("\nDid you mean {s}?"));
    }
    NotificationMessage::plain(text)
}

pub fn fetch_error(err: &FetchError) -> NotificationMessage {
    NotificationMessage::plain(format!("⚠️ System Error: {err}"))
}
