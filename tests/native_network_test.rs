use chrono::{TimeZone, Utc};
use memento_rs::client::NativeNetwork;
use memento_rs::{parse_link_header, ClientConfig, MementoNetwork, ProbeRequest};

fn network() -> NativeNetwork {
    NativeNetwork::from_config(&ClientConfig::default()).unwrap()
}

#[tokio::test]
async fn test_redirects_are_recorded_in_history() {
    let mut server = mockito::Server::new_async().await;
    let a = server
        .mock("HEAD", "/a")
        .with_status(302)
        .with_header("location", "/b")
        .create_async()
        .await;
    let b = server
        .mock("HEAD", "/b")
        .with_status(301)
        .with_header("location", &format!("{}/c", server.url()))
        .create_async()
        .await;
    let c = server
        .mock("HEAD", "/c")
        .with_status(200)
        .with_header("link", "<http://example.org/>;rel=\"original\"")
        .create_async()
        .await;

    let url = format!("{}/a", server.url());
    let response = network()
        .probe(&url, ProbeRequest::head().follow_redirects(10))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert!(response.url.ends_with("/c"));
    assert_eq!(response.history.len(), 2);
    assert_eq!(response.history[0].status, 302);
    assert!(response.history[0].url.ends_with("/a"));
    assert_eq!(response.history[1].status, 301);
    assert!(response.link().is_some());

    a.assert_async().await;
    b.assert_async().await;
    c.assert_async().await;
}

#[tokio::test]
async fn test_redirects_not_followed_by_default() {
    let mut server = mockito::Server::new_async().await;
    let _a = server
        .mock("HEAD", "/a")
        .with_status(302)
        .with_header("location", "/b")
        .create_async()
        .await;
    let b = server.mock("HEAD", "/b").expect(0).create_async().await;

    let url = format!("{}/a", server.url());
    let response = network().probe(&url, ProbeRequest::head()).await.unwrap();

    assert_eq!(response.status, 302);
    assert_eq!(response.location(), Some("/b"));
    assert!(response.history.is_empty());
    b.assert_async().await;
}

#[tokio::test]
async fn test_redirect_limit_returns_last_redirect() {
    let mut server = mockito::Server::new_async().await;
    let _a = server
        .mock("HEAD", "/a")
        .with_status(302)
        .with_header("location", "/b")
        .create_async()
        .await;
    let _b = server
        .mock("HEAD", "/b")
        .with_status(302)
        .with_header("location", "/a")
        .create_async()
        .await;

    let url = format!("{}/a", server.url());
    let response = network()
        .probe(&url, ProbeRequest::head().follow_redirects(3))
        .await
        .unwrap();

    assert!(response.is_redirect());
    assert_eq!(response.history.len(), 3);
}

#[tokio::test]
async fn test_accept_datetime_header_sent() {
    let mut server = mockito::Server::new_async().await;
    let tg = server
        .mock("HEAD", "/timegate")
        .match_header("accept-datetime", "Thu, 01 Apr 2010 12:00:00 GMT")
        .with_status(200)
        .create_async()
        .await;

    let url = format!("{}/timegate", server.url());
    let dt = Utc.with_ymd_and_hms(2010, 4, 1, 12, 0, 0).unwrap();
    let response = network()
        .probe(&url, ProbeRequest::head().with_accept_datetime(Some(dt)))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    tg.assert_async().await;
}

#[tokio::test]
async fn test_repeated_link_headers_are_joined() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("HEAD", "/r")
        .with_status(200)
        .with_header("link", "<http://example.org/>;rel=\"original\"")
        .with_header("link", "<http://tg.example/>;rel=\"timegate\"")
        .create_async()
        .await;

    let url = format!("{}/r", server.url());
    let response = network().probe(&url, ProbeRequest::head()).await.unwrap();
    let links = parse_link_header(response.link().unwrap()).unwrap();
    assert_eq!(links.len(), 2);
    assert!(links.get("http://tg.example/").unwrap().has_rel("timegate"));
}

#[tokio::test]
async fn test_get_reads_body() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/timemap")
        .with_status(200)
        .with_header("content-type", "application/link-format")
        .with_body("<http://example.org/>;rel=\"original\"")
        .create_async()
        .await;

    let url = format!("{}/timemap", server.url());
    let response = network().probe(&url, ProbeRequest::get()).await.unwrap();
    assert_eq!(response.body_str(), Some("<http://example.org/>;rel=\"original\""));
    assert_eq!(response.header("Content-Type"), Some("application/link-format"));
}

#[tokio::test]
async fn test_unreachable_host_is_connectivity_error() {
    let err = network()
        .probe("http://127.0.0.1:1/", ProbeRequest::head())
        .await
        .unwrap_err();
    assert!(err.is_connectivity());
}
