// tests/providers_bse_html.rs
use bse_filings_monitor::config::FeedConfig;
use bse_filings_monitor::ingest::providers::bse_html::BseHtmlFetcher;
use bse_filings_monitor::ingest::types::{FeedFetcher, FeedTarget};
use bse_filings_monitor::types::Mode;
use chrono::Timelike;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

const ANN_HTML: &str = include_str!("fixtures/bse_ann.html");
const PAGE: &str = "https://www.bseindia.com/corporates/ann.aspx";

#[tokio::test]
async fn table_rows_become_records() {
    let p = BseHtmlFetcher::from_fixture_str(ANN_HTML, PAGE);
    let recs = p.fetch(&FeedTarget::Global, Mode::Live).await.expect("parse ok");

    // spacer and pager rows are skipped
    assert_eq!(recs.len(), 3);

    let tips = &recs[0];
    assert_eq!(tips.company_name, "TIPS MUSIC LTD");
    assert_eq!(tips.scrip_code.as_deref(), Some("532375"));
    assert_eq!(tips.subject, "Board Meeting Intimation for Quarterly Results");
    let ts = tips.filed_at.expect("timestamp");
    assert_eq!((ts.hour(), ts.minute(), ts.second()), (14, 55, 12));
    assert_eq!(
        tips.attachment_url.as_deref(),
        Some("https://www.bseindia.com/xml-data/corpfiling/AttachLive/5f0e1d2c-tips.pdf")
    );
    assert_eq!(tips.raw_id, "5f0e1d2c-tips.pdf");
}

#[tokio::test]
async fn script_links_and_missing_times_are_tolerated() {
    let p = BseHtmlFetcher::from_fixture_str(ANN_HTML, PAGE);
    let recs = p.fetch(&FeedTarget::Global, Mode::Live).await.unwrap();

    let wonderla = &recs[1];
    assert!(wonderla.subject.contains("Meet & Con. Call"));
    assert!(wonderla.attachment_url.is_none());
    assert!(wonderla.filed_at.is_some());

    let ril = &recs[2];
    assert!(ril.filed_at.is_none());
    assert!(ril.attachment_url.as_deref().unwrap().ends_with("ril.pdf"));
}

#[tokio::test]
async fn company_target_queries_by_scrip() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/corporates/ann.aspx"))
        .and(query_param("scripcd", "532375"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ANN_HTML))
        .expect(1)
        .mount(&server)
        .await;

    let cfg = FeedConfig {
        page_url: format!("{}/corporates/ann.aspx", server.uri()),
        ..FeedConfig::default()
    };
    let p = BseHtmlFetcher::new(&cfg, reqwest::Client::new());
    let target = FeedTarget::Company {
        code: "532375".into(),
        name: "TIPS MUSIC".into(),
    };
    let recs = p.fetch(&target, Mode::History).await.expect("http ok");
    // relative links resolve against the configured page
    assert!(recs[0]
        .attachment_url
        .as_deref()
        .unwrap()
        .starts_with(&server.uri()));
}
