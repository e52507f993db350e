use super::*;
use crate::config::HttpConfig;
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::AsyncReadExt;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher() -> DefaultSourceFetcher {
    DefaultSourceFetcher::new(&HttpConfig::default()).unwrap()
}

async fn read_all(mut opened: OpenedSource) -> String {
    let mut body = String::new();
    opened.reader.read_to_string(&mut body).await.unwrap();
    body
}

#[test]
fn recognises_http_schemes_only() {
    assert!(is_http_source("http://example.com/a.csv"));
    assert!(is_http_source("https://example.com/a.csv"));
    assert!(!is_http_source("ftp://example.com/a.csv"));
    assert!(!is_http_source("file:///tmp/a.csv"));
    assert!(!is_http_source("./data/a.csv"));
    assert!(!is_http_source("HTTP://example.com"));
}

#[tokio::test]
async fn absent_or_empty_identifier_is_rejected() {
    let fetcher = fetcher();
    assert_eq!(
        fetcher.open(None).await.unwrap_err(),
        FetchFailure::EmptyIdentifier
    );
    assert_eq!(
        fetcher.open(Some("")).await.unwrap_err(),
        FetchFailure::EmptyIdentifier
    );
}

// HTTP sources

#[tokio::test]
async fn http_200_opens_body_stream() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/people.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string("name,surname,age\nA,B,1\n"))
        .mount(&mock_server)
        .await;

    let url = format!("{}/people.csv", mock_server.uri());
    let opened = fetcher().open(Some(url.as_str())).await.unwrap();
    assert_eq!(opened.response_code, Some(200));
    assert_eq!(read_all(opened).await, "name,surname,age\nA,B,1\n");
}

#[tokio::test]
async fn http_404_reports_bad_response_code() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.csv"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let url = format!("{}/missing.csv", mock_server.uri());
    let failure = fetcher().open(Some(url.as_str())).await.unwrap_err();
    assert_eq!(failure, FetchFailure::BadResponseCode(404));
    assert_eq!(failure.response_code(), Some(404));
}

#[tokio::test]
async fn non_200_success_codes_are_still_bad() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nothing.csv"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let url = format!("{}/nothing.csv", mock_server.uri());
    assert_eq!(
        fetcher().open(Some(url.as_str())).await.unwrap_err(),
        FetchFailure::BadResponseCode(204)
    );
}

#[tokio::test]
async fn wrapped_client_is_used_for_requests() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/people.csv"))
        .and(header("user-agent", "ingest-test/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("h\nA,B,1\n"))
        .mount(&mock_server)
        .await;

    let client = reqwest::Client::builder()
        .user_agent("ingest-test/1.0")
        .build()
        .unwrap();
    let fetcher = DefaultSourceFetcher::with_client(client);

    let url = format!("{}/people.csv", mock_server.uri());
    let opened = fetcher.open(Some(url.as_str())).await.unwrap();
    assert_eq!(opened.response_code, Some(200));
    assert_eq!(read_all(opened).await, "h\nA,B,1\n");
}

#[tokio::test]
async fn connection_refused_is_transport_error() {
    // Bind to grab a free port, then close it so nothing is listening.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let url = format!("http://127.0.0.1:{}/people.csv", port);
    let failure = fetcher().open(Some(url.as_str())).await.unwrap_err();
    assert!(matches!(failure, FetchFailure::Transport(_)));
    assert_eq!(failure.response_code(), None);
}

#[tokio::test]
async fn malformed_url_is_transport_error() {
    let failure = fetcher().open(Some("http://")).await.unwrap_err();
    assert!(matches!(failure, FetchFailure::Transport(_)));
}

#[tokio::test]
async fn request_timeout_is_transport_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow.csv"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let fetcher = DefaultSourceFetcher::new(&HttpConfig {
        request_timeout: Some(Duration::from_secs(1)),
        ..Default::default()
    })
    .unwrap();

    let url = format!("{}/slow.csv", mock_server.uri());
    let failure = fetcher.open(Some(url.as_str())).await.unwrap_err();
    match failure {
        FetchFailure::Transport(msg) => assert!(msg.contains("timed out"), "{}", msg),
        other => panic!("expected transport error, got {:?}", other),
    }
}

// Local files

#[tokio::test]
async fn existing_file_opens_without_response_code() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("people.csv");
    std::fs::write(&file_path, "first,last,age\nNed,Flanders,60\n").unwrap();

    let opened = fetcher()
        .open(Some(file_path.to_str().unwrap()))
        .await
        .unwrap();
    assert_eq!(opened.response_code, None);
    assert_eq!(read_all(opened).await, "first,last,age\nNed,Flanders,60\n");
}

#[tokio::test]
async fn missing_file_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("nope.csv");

    let failure = fetcher()
        .open(Some(file_path.to_str().unwrap()))
        .await
        .unwrap_err();
    assert!(matches!(failure, FetchFailure::NotFound(_)));
    assert_eq!(failure.response_code(), None);
}

#[tokio::test]
async fn directory_is_not_found() {
    let temp_dir = TempDir::new().unwrap();

    let failure = fetcher()
        .open(Some(temp_dir.path().to_str().unwrap()))
        .await
        .unwrap_err();
    assert!(matches!(failure, FetchFailure::NotFound(_)));
}

#[tokio::test]
async fn unsupported_scheme_is_treated_as_path() {
    let failure = fetcher()
        .open(Some("ftp://example.com/people.csv"))
        .await
        .unwrap_err();
    assert!(matches!(failure, FetchFailure::NotFound(_)));
}
