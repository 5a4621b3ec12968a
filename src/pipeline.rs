//! # Pipeline
//! One run: Trigger Resolver → Feed Fetcher → Watchlist Matcher →
//! Time Window Filter → Notifier. Nothing survives between runs.
//!
//! Error policy per stage:
//! - unknown company: one plain error message, no fetch, run ends;
//! - fetch failure: empty record set; the error is reported only on manual
//!   triggers, and no digest follows it;
//! - delivery failure: logged and counted inside `notify`, never aborts.

use chrono::{DateTime, FixedOffset};
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;

use crate::config::MonitorConfig;
use crate::ingest::types::{FeedFetcher, FeedTarget};
use crate::notify::{self, format, DeliveryReport, Notifier};
use crate::trigger::{self, InvocationContext};
use crate::types::{Mode, ScanRequest, TriggerKind, Watchlist};
use crate::window::{self, WindowPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    UnknownCompany,
    FetchFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub request: Option<ScanRequest>,
    pub fetched: usize,
    pub matched: usize,
    pub kept: usize,
    pub delivery: DeliveryReport,
}

impl RunReport {
    fn empty(outcome: RunOutcome, request: Option<ScanRequest>, delivery: DeliveryReport) -> Self {
        Self {
            outcome,
            request,
            fetched: 0,
            matched: 0,
            kept: 0,
            delivery,
        }
    }
}

pub struct Pipeline<'a> {
    watchlist: &'a Watchlist,
    fetcher: &'a dyn FeedFetcher,
    notifier: &'a dyn Notifier,
    policy: WindowPolicy,
    max_records: usize,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        cfg: &MonitorConfig,
        watchlist: &'a Watchlist,
        fetcher: &'a dyn FeedFetcher,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            watchlist,
            fetcher,
            notifier,
            policy: WindowPolicy::from(&cfg.filter),
            max_records: cfg.feed.max_records,
        }
    }

    pub fn with_policy(mut self, policy: WindowPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub async fn run(&self, ctx: &InvocationContext, now: DateTime<FixedOffset>) -> RunReport {
        static ONCE: OnceCell<()> = OnceCell::new();
        ONCE.get_or_init(|| {
            describe_counter!(
                "monitor_records_matched_total",
                "Records that matched the watchlist scope."
            );
        });

        // 1) Trigger
        let request = match trigger::resolve(ctx, self.watchlist) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "company lookup failed, ending run");
                let d = notify::deliver(self.notifier, &format::lookup_error(&e)).await;
                return RunReport::empty(RunOutcome::UnknownCompany, None, d);
            }
        };
        tracing::info!(
            trigger = ?request.trigger,
            mode = ?request.mode,
            scope = request.scope.label(),
            "scan resolved"
        );

        // 2) Fetch
        let target = FeedTarget::for_scope(&request.scope);
        let (records, fetch_err) =
            crate::ingest::fetch_or_empty(self.fetcher, &target, request.mode, self.max_records).await;
        if let Some(e) = fetch_err {
            let d = if request.trigger == TriggerKind::Manual {
                notify::deliver(self.notifier, &format::fetch_error(&e)).await
            } else {
                DeliveryReport::default()
            };
            return RunReport::empty(RunOutcome::FetchFailed, Some(request), d);
        }
        let fetched = records.len();

        // 3) Match
        let matched = crate::matcher::filter_by_scope(&request.scope, records, self.watchlist);
        let matched_cnt = matched.len();
        counter!("monitor_records_matched_total").increment(matched_cnt as u64);

        // 4) Window
        let kept = window::apply(request.mode, now, matched, &self.policy);

        // 5) Notify
        let delivery = match request.mode {
            Mode::Live => notify::deliver_live(self.notifier, &kept).await,
            Mode::History => notify::deliver_digest(self.notifier, &request.scope, &kept).await,
        };

        tracing::info!(
            fetched,
            matched = matched_cnt,
            kept = kept.len(),
            sent = delivery.sent,
            failed = delivery.failed,
            "run complete"
        );

        RunReport {
            outcome: RunOutcome::Completed,
            fetched,
            matched: matched_cnt,
            kept: kept.len(),
            delivery,
            request: Some(request),
        }
    }
}
