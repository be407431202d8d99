//! End-to-end runs against a mocked forum and status endpoint.

use chrono::NaiveDate;
use devtracker::error::AppError;
use devtracker::models::Config;
use devtracker::pipeline::{RunOptions, run_tracker};
use devtracker::services::TwitterPublisher;
use devtracker::storage::{LocalWatermark, WatermarkStorage};
use devtracker::utils::date::{local_timestamp, parse_posted_at};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STATUS_PATH: &str = "/1.1/statuses/update.json";

fn card(id: u32, minute: u32, forum: bool) -> String {
    let forum_link = if forum {
        r#"<a href="forumdisplay.php?f=521">Bug Reports</a>"#
    } else {
        ""
    };
    format!(
        r#"<div class="trackerbit"><div class="dev-tracker-row">
  <div class="threadtitle">
    <a href="showthread.php?goto=newpost&t={id}"><img src="firstnew.png"></a>
    <a href="showthread.php?&postid={id}#post{id}">Dev post {id}</a>
  </div>
  <div class="threadstatus">
    11-21-2018 <span class="time">09:{minute:02} AM</span><br />
    by SSG_Tester
  </div>
  <div class="threadforum">{forum_link}</div>
</div></div>"#
    )
}

fn timestamp(minute: u32) -> f64 {
    let today = NaiveDate::from_ymd_opt(2018, 11, 23).unwrap();
    let at = parse_posted_at(&format!("11-21-2018 09:{minute:02} AM"), today).unwrap();
    local_timestamp(at).unwrap()
}

/// Newest first, as the forum lists them.
fn page(cards: &[String]) -> String {
    format!("<html><body>{}</body></html>", cards.concat())
}

fn five_cards() -> Vec<String> {
    (1..=5).rev().map(|i| card(i, i, true)).collect()
}

fn config(server: &MockServer) -> Config {
    let mut config = Config::parse(&format!(
        r#"[Tracker]
baseurl = "{uri}/forums/"
api_url = "{uri}{STATUS_PATH}"
publish_delay_ms = 0
consumer_key = "ck"
consumer_secret = "cs"
access_key = "ak"
access_secret = "as"
"#,
        uri = server.uri()
    ))
    .unwrap();
    config.timeout_secs = 5;
    config
}

async fn mount_tracker(server: &MockServer, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path("/forums/post_tracker.php"))
        .and(query_param("tracker", "devtracker"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

async fn posted_statuses(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() == STATUS_PATH)
        .map(|r| String::from_utf8(r.body).unwrap())
        .collect()
}

#[tokio::test]
async fn publishes_new_posts_and_saves_watermark() {
    let server = MockServer::start().await;
    mount_tracker(&server, 200, page(&five_cards())).await;
    Mock::given(method("POST"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(3)
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let storage = LocalWatermark::new(tmp.path().join(".lotro_devtracker_ts"));
    storage.save(timestamp(2)).await.unwrap();

    let config = config(&server);
    let publisher = TwitterPublisher::new(&config).unwrap();
    let summary = run_tracker(&config, &storage, &publisher, RunOptions::default())
        .await
        .unwrap();

    assert_eq!(summary.cards, 5);
    assert_eq!(summary.published, 3);
    assert_eq!(summary.skipped, 2);
    assert_eq!(storage.load().await, timestamp(5));

    let bodies = posted_statuses(&server).await;
    assert_eq!(bodies.len(), 3);
    assert!(bodies[0].contains("Dev%20post%203"));
    assert!(bodies[1].contains("Dev%20post%204"));
    assert!(bodies[2].contains("Dev%20post%205"));
}

#[tokio::test]
async fn duplicate_status_does_not_abort() {
    let server = MockServer::start().await;
    mount_tracker(&server, 200, page(&five_cards())).await;
    Mock::given(method("POST"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_string(
            r#"{"errors":[{"code":187,"message":"Status is a duplicate."}]}"#,
        ))
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let storage = LocalWatermark::new(tmp.path().join(".ts"));
    storage.save(timestamp(4)).await.unwrap();

    let config = config(&server);
    let publisher = TwitterPublisher::new(&config).unwrap();
    let summary = run_tracker(&config, &storage, &publisher, RunOptions::default())
        .await
        .unwrap();

    assert_eq!(summary.duplicates, 1);
    assert_eq!(storage.load().await, timestamp(5));
}

#[tokio::test]
async fn fetch_failure_is_fatal_and_keeps_watermark() {
    let server = MockServer::start().await;
    mount_tracker(&server, 503, "down for maintenance".to_string()).await;

    let tmp = TempDir::new().unwrap();
    let storage = LocalWatermark::new(tmp.path().join(".ts"));
    storage.save(42.0).await.unwrap();

    let config = config(&server);
    let publisher = TwitterPublisher::new(&config).unwrap();
    let err = run_tracker(&config, &storage, &publisher, RunOptions::default())
        .await
        .unwrap_err();

    match err {
        AppError::Status { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "down for maintenance");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(storage.load().await, 42.0);
    assert!(posted_statuses(&server).await.is_empty());
}

#[tokio::test]
async fn broken_card_aborts_without_saving() {
    let server = MockServer::start().await;
    // Newest card lost its forum link; the older ones are fine.
    let mut cards = five_cards();
    cards[0] = card(5, 5, false);
    mount_tracker(&server, 200, page(&cards)).await;
    Mock::given(method("POST"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let storage = LocalWatermark::new(tmp.path().join(".ts"));

    let config = config(&server);
    let publisher = TwitterPublisher::new(&config).unwrap();
    let err = run_tracker(&config, &storage, &publisher, RunOptions::default())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Info missing!"));
    assert_eq!(posted_statuses(&server).await.len(), 4);
    assert!(!tmp.path().join(".ts").exists());
}

#[tokio::test]
async fn dry_run_publishes_nothing() {
    let server = MockServer::start().await;
    mount_tracker(&server, 200, page(&five_cards())).await;

    let tmp = TempDir::new().unwrap();
    let storage = LocalWatermark::new(tmp.path().join(".ts"));

    let config = config(&server);
    let summary = run_tracker(
        &config,
        &storage,
        &devtracker::services::DryRunPublisher,
        RunOptions { dry_run: true },
    )
    .await
    .unwrap();

    assert_eq!(summary.published, 5);
    assert_eq!(summary.watermark, timestamp(5));
    assert!(posted_statuses(&server).await.is_empty());
    assert_eq!(storage.load().await, 0.0);
}
