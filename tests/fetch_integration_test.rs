//! Integration tests for the data-service fetcher against a mock HTTP server

use chrono::NaiveDate;
use dataexport::adapters::dataservice::ExportFetcher;
use dataexport::config::schema::DEFAULT_USER_AGENT;
use dataexport::config::{secret_string, SourceConfig};
use dataexport::domain::{DateRange, DownloadError, DEFAULT_ERROR_MARKERS};
use mockito::Matcher;

fn source_config(base_url: String) -> SourceConfig {
    SourceConfig {
        base_url,
        token: secret_string("secret-token".to_string()),
        format: "csv".to_string(),
        date_format: "%m%d%Y".to_string(),
        timeout_seconds: 10,
        connect_timeout_seconds: 5,
        max_redirects: 10,
        tls_verify: false,
        user_agent: DEFAULT_USER_AGENT.to_string(),
        error_markers: DEFAULT_ERROR_MARKERS.iter().map(|m| m.to_string()).collect(),
    }
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn test_fetch_sends_expected_request() {
    let mut server = mockito::Server::new_async().await;
    let base_url = format!("{}/ea-dataservice/export.service", server.url());

    let mock = server
        .mock("GET", "/ea-dataservice/export.service")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("token".into(), "secret-token".into()),
            Matcher::UrlEncoded("startDate".into(), "01012024".into()),
            Matcher::UrlEncoded("endDate".into(), "01312024".into()),
            Matcher::UrlEncoded("type".into(), "csv".into()),
        ]))
        .match_header("referer", base_url.as_str())
        .match_header("user-agent", DEFAULT_USER_AGENT)
        .with_status(200)
        .with_body("id,value\n1,2\n")
        .create_async()
        .await;

    let fetcher = ExportFetcher::new(source_config(base_url)).unwrap();
    let range = DateRange::new(day(2024, 1, 1), day(2024, 1, 31)).unwrap();
    let payload = fetcher.fetch(&range).await.unwrap();

    assert_eq!(payload.as_str(), "id,value\n1,2\n");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_error_marker_is_rejected() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/export")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("ERROR: no data")
        .create_async()
        .await;

    let fetcher = ExportFetcher::new(source_config(format!("{}/export", server.url()))).unwrap();
    let err = fetcher
        .fetch(&DateRange::single(day(2024, 1, 15)))
        .await
        .unwrap_err();

    match err {
        DownloadError::Rejected { marker, payload } => {
            assert_eq!(marker, "ERROR:");
            assert_eq!(payload, "ERROR: no data");
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_range_limit_message_is_rejected() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/export")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("Data can only be exported for the last 90 days")
        .create_async()
        .await;

    let fetcher = ExportFetcher::new(source_config(format!("{}/export", server.url()))).unwrap();
    let err = fetcher
        .fetch(&DateRange::single(day(2020, 1, 1)))
        .await
        .unwrap_err();

    assert!(matches!(err, DownloadError::Rejected { .. }));
    assert!(err.payload().unwrap().contains("90 days"));
}

#[tokio::test]
async fn test_fetch_non_200_ignores_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/export")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("ERROR: maintenance")
        .create_async()
        .await;

    let fetcher = ExportFetcher::new(source_config(format!("{}/export", server.url()))).unwrap();
    let err = fetcher
        .fetch(&DateRange::single(day(2024, 1, 15)))
        .await
        .unwrap_err();

    assert!(matches!(err, DownloadError::UnexpectedStatus { status: 503 }));
    assert!(err.payload().is_none());
}

#[tokio::test]
async fn test_fetch_empty_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/export")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("")
        .create_async()
        .await;

    let fetcher = ExportFetcher::new(source_config(format!("{}/export", server.url()))).unwrap();
    let err = fetcher
        .fetch(&DateRange::single(day(2024, 1, 15)))
        .await
        .unwrap_err();

    assert!(matches!(err, DownloadError::EmptyBody));
}

#[tokio::test]
async fn test_fetch_follows_redirects() {
    let mut server = mockito::Server::new_async().await;
    let _redirect = server
        .mock("GET", "/old")
        .match_query(Matcher::Any)
        .with_status(302)
        .with_header("location", "/new")
        .create_async()
        .await;
    let _target = server
        .mock("GET", "/new")
        .with_status(200)
        .with_body("a,b\n")
        .create_async()
        .await;

    let fetcher = ExportFetcher::new(source_config(format!("{}/old", server.url()))).unwrap();
    let payload = fetcher
        .fetch(&DateRange::single(day(2024, 1, 15)))
        .await
        .unwrap();
    assert_eq!(payload.as_str(), "a,b\n");
}

#[tokio::test]
async fn test_fetch_redirect_limit() {
    let mut server = mockito::Server::new_async().await;
    let _redirect = server
        .mock("GET", "/old")
        .match_query(Matcher::Any)
        .with_status(302)
        .with_header("location", "/new")
        .create_async()
        .await;

    let mut config = source_config(format!("{}/old", server.url()));
    config.max_redirects = 0;
    let fetcher = ExportFetcher::new(config).unwrap();
    let err = fetcher
        .fetch(&DateRange::single(day(2024, 1, 15)))
        .await
        .unwrap_err();

    assert!(matches!(err, DownloadError::Transport(_)));
}

#[tokio::test]
async fn test_transport_error_hides_token() {
    // Nothing listens on port 9 of the loopback address
    let fetcher =
        ExportFetcher::new(source_config("http://127.0.0.1:9/export".to_string())).unwrap();
    let err = fetcher
        .fetch(&DateRange::single(day(2024, 1, 15)))
        .await
        .unwrap_err();

    assert!(matches!(err, DownloadError::Transport(_)));
    assert!(!err.to_string().contains("secret-token"));
}
