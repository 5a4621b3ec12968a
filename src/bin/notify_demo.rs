//! Sends a sample live alert and digest, to check bot credentials and message layout.
//! Falls back to log-only output when Telegram is not configured.

use bse_filings_monitor::config::MonitorConfig;
use bse_filings_monitor::notify::{self, format, MemoryNotifier, Notifier, TelegramNotifier};
use bse_filings_monitor::types::{feed_now, AnnouncementRecord, MatchedRecord, Scope, WatchlistEntry};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_target(false).init();

    let cfg = MonitorConfig::load()?;
    let tg = TelegramNotifier::new(&cfg.telegram, reqwest::Client::new());
    let notifier: Box<dyn Notifier> = if tg.is_enabled() && !cfg.dry_run {
        Box::new(tg)
    } else {
        Box::new(MemoryNotifier::new())
    };

    let entry = WatchlistEntry::new("TIPS MUSIC", Some("532375"));
    let sample = MatchedRecord {
        entry: entry.clone(),
        record: AnnouncementRecord {
            raw_id: "demo-1".into(),
            company_name: "TIPS MUSIC LTD".into(),
            scrip_code: Some("532375".into()),
            subject: "Board Meeting Intimation (demo)".into(),
            filed_at: Some(feed_now()),
            attachment_url: None,
        },
    };

    let live = notify::deliver(notifier.as_ref(), &format::live_alert(&sample)).await;
    let digest = notify::deliver_digest(notifier.as_ref(), &Scope::Single(entry), &[sample]).await;
    let r = live.merge(digest);

    println!("notify-demo done: sent={} failed={}", r.sent, r.failed);
    Ok(())
}
