//! BSE filings monitor: binary entrypoint.
//! One invocation = one scan (cron tick or manual dispatch), then exit.

use anyhow::Context;
use bse_filings_monitor::config::{load_watchlist_default, MonitorConfig};
use bse_filings_monitor::ingest::providers::build_fetcher;
use bse_filings_monitor::notify::{MemoryNotifier, Notifier, TelegramNotifier};
use bse_filings_monitor::telemetry::Metrics;
use bse_filings_monitor::types::feed_now;
use bse_filings_monitor::{InvocationContext, Pipeline};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact logs by default; `LOG_FORMAT=json` for machine-readable CI logs.
fn init_tracing() {
    let json = std::env::var("LOG_FORMAT")
        .ok()
        .is_some_and(|v| v.eq_ignore_ascii_case("json"));
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        tracing_subscriber::registry()
            .with(filter())
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter())
            .with(fmt::layer().compact())
            .init();
    }
}

fn env_flag(key: &str) -> bool {
    std::env::var(key).ok().is_some_and(|v| v == "1")
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load .env locally; no-op in CI where secrets come from the environment.
    let _ = dotenvy::dotenv();
    init_tracing();

    let metrics = if env_flag("METRICS_LOG") {
        match Metrics::init() {
            Ok(m) => Some(m),
            Err(e) => {
                tracing::warn!(error = %e, "metrics recorder not installed");
                None
            }
        }
    } else {
        None
    };

    let cfg = MonitorConfig::load().context("loading monitor config")?;
    let watchlist = load_watchlist_default().context("loading watchlist")?;
    let client = reqwest::Client::builder()
        .build()
        .context("building http client")?;

    let fetcher = build_fetcher(&cfg.feed, client.clone());
    let notifier: Box<dyn Notifier> = if cfg.dry_run {
        Box::new(MemoryNotifier::new())
    } else {
        let tg = TelegramNotifier::new(&cfg.telegram, client);
        if !tg.is_enabled() {
            tracing::warn!("TELEGRAM_TOKEN/TELEGRAM_CHAT_ID not set, messages will be dropped");
        }
        Box::new(tg)
    };

    let ctx = InvocationContext::from_env();
    tracing::info!(
        strategy = ?cfg.feed.strategy,
        companies = watchlist.len(),
        trigger = ?ctx.trigger,
        "monitor starting"
    );

    let report = Pipeline::new(&cfg, &watchlist, fetcher.as_ref(), notifier.as_ref())
        .run(&ctx, feed_now())
        .await;
    tracing::info!(outcome = ?report.outcome, sent = report.delivery.sent, "monitor finished");

    if let Some(m) = metrics {
        m.log_snapshot();
    }
    Ok(())
}
