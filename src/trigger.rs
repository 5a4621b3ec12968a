// src/trigger.rs
//! Trigger Resolver: invocation context → `ScanRequest`.

use strsim::normalized_levenshtein;

use crate::error::LookupError;
use crate::types::{Mode, ScanRequest, Scope, TriggerKind, Watchlist, WatchlistEntry};

/// Below this similarity no "did you mean" hint is offered.
const SUGGESTION_MIN_SIMILARITY: f64 = 0.5;

/// Raw invocation inputs, as read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationContext {
    pub trigger: TriggerKind,
    pub company: Option<String>,
    pub mode: Option<String>,
}

impl InvocationContext {
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// `MONITOR_TRIGGER` wins over `GITHUB_EVENT_NAME`. Without either flag,
    /// any manual input makes the run manual; otherwise it is a scheduled tick.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let company = get("INPUT_COMPANY").map(|c| c.to_uppercase());
        let mode = get("INPUT_MODE");

        let trigger = match get("MONITOR_TRIGGER").or_else(|| get("GITHUB_EVENT_NAME")) {
            Some(v) => parse_trigger(&v),
            None if company.is_some() || mode.is_some() => TriggerKind::Manual,
            None => TriggerKind::Scheduled,
        };

        Self {
            trigger,
            company,
            mode,
        }
    }
}

fn parse_trigger(s: &str) -> TriggerKind {
    match s.to_ascii_lowercase().as_str() {
        "schedule" | "scheduled" | "cron" => TriggerKind::Scheduled,
        _ => TriggerKind::Manual,
    }
}

/// `LIVE`/`HISTORY`, case-insensitive; anything else is LIVE.
pub fn parse_mode(s: Option<&str>) -> Mode {
    match s.map(|v| v.trim().to_ascii_uppercase()) {
        None => Mode::Live,
        Some(v) if v.is_empty() || v == "LIVE" => Mode::Live,
        Some(v) if v == "HISTORY" => Mode::History,
        Some(v) => {
            tracing::warn!(mode = %v, "unrecognized mode, using LIVE");
            Mode::Live
        }
    }
}

/// First entry whose name contains the query, or whose code equals it.
pub fn lookup<'w>(query: &str, watchlist: &'w Watchlist) -> Result<&'w WatchlistEntry, LookupError> {
    let q = query.trim().to_uppercase();
    if !q.is_empty() {
        let hit = watchlist.iter().find(|e| {
            e.display_name.to_uppercase().contains(&q) || e.exchange_code.as_deref() == Some(q.as_str())
        });
        if let Some(e) = hit {
            return Ok(e);
        }
    }
    Err(LookupError::UnknownCompany {
        query: q.clone(),
        suggestion: closest_name(&q, watchlist),
    })
}

fn closest_name(q: &str, watchlist: &Watchlist) -> Option<String> {
    if q.is_empty() {
        return None;
    }
    watchlist
        .iter()
        .map(|e| (normalized_levenshtein(q, &e.display_name), e))
        .filter(|(sim, _)| *sim >= SUGGESTION_MIN_SIMILARITY)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, e)| e.display_name.clone())
}

pub fn resolve(ctx: &InvocationContext, watchlist: &Watchlist) -> Result<ScanRequest, LookupError> {
    if ctx.trigger == TriggerKind::Scheduled {
        if ctx.company.is_some() || ctx.mode.is_some() {
            tracing::warn!(
                company = ctx.company.as_deref().unwrap_or(""),
                mode = ctx.mode.as_deref().unwrap_or(""),
                "scheduled run, manual inputs ignored"
            );
        }
        return Ok(ScanRequest {
            trigger: TriggerKind::Scheduled,
            scope: Scope::All,
            mode: Mode::Live,
        });
    }

    let mode = parse_mode(ctx.mode.as_deref());
    let scope = match ctx.company.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        Some(name) => Scope::Single(lookup(name, watchlist)?.clone()),
        None => Scope::All,
    };
    Ok(ScanRequest {
        trigger: TriggerKind::Manual,
        scope,
        mode,
    })
}
