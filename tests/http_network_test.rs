//! Tests for [`HttpNetwork`] against a wiremock server.

use std::time::Duration;

use reqwest::{Method, Url};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use skjold::{HttpNetwork, Network, Request, SkjoldError};

fn url(server: &MockServer, p: &str) -> Url {
    Url::parse(&server.uri()).unwrap().join(p).unwrap()
}

#[tokio::test]
async fn fetch_returns_status_headers_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/index.html"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html")
                .set_body_string("<html></html>"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let network = HttpNetwork::new();
    let response = network
        .fetch(&Request::get(url(&server, "/index.html")))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.reason(), "OK");
    assert_eq!(response.header_value("content-type"), Some("text/html"));
    assert_eq!(response.body(), b"<html></html>");
}

#[tokio::test]
async fn non_ok_status_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.js"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let response = HttpNetwork::new()
        .fetch(&Request::get(url(&server, "/missing.js")))
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
    assert!(!response.is_ok());
}

#[tokio::test]
async fn request_method_and_headers_are_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/items"))
        .and(header("X-Requested-With", "skjold"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let request = Request::new(Method::POST, url(&server, "/api/items"))
        .header("X-Requested-With", "skjold");
    let response = HttpNetwork::new().fetch(&request).await.unwrap();

    assert_eq!(response.status(), 201);
}

#[tokio::test]
async fn connection_failure_is_network_error() {
    // Nothing listens on the discard port
    let request = Request::get(Url::parse("http://127.0.0.1:9/").unwrap());
    let result = HttpNetwork::new().fetch(&request).await;

    assert!(matches!(result, Err(SkjoldError::Network(_))));
}

#[tokio::test]
async fn timeout_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let network = HttpNetwork::new().timeout(Duration::from_millis(50));
    let result = network.fetch(&Request::get(url(&server, "/slow"))).await;

    assert!(matches!(result, Err(SkjoldError::Network(_))));
}
