//! Integration tests for the `HyperClient` transport using wiremock.
//!
//! No status check is installed here: every status comes back as a response.

use std::time::Duration;

use assert2::{check, let_assert};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tollgate::{Error, HttpClient, HttpClientExt, HyperClient, Method, Request};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path, query_param},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Invoice {
    id: u64,
    amount_cents: u64,
}

fn endpoint(mock_server: &MockServer, route: &str) -> url::Url {
    url::Url::parse(&format!("{}{route}", mock_server.uri())).expect("url")
}

#[tokio::test]
async fn get_decodes_json_body() {
    let mock_server = MockServer::start().await;
    let invoice = Invoice {
        id: 7,
        amount_cents: 1299,
    };

    Mock::given(method("GET"))
        .and(path("/invoices/7"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&invoice))
        .mount(&mock_server)
        .await;

    let client = HyperClient::new();
    let request = Request::builder(Method::Get, endpoint(&mock_server, "/invoices/7"))
        .header("Accept", "application/json")
        .build();

    let response = client.execute(request).await.expect("response");

    check!(response.status() == 200);
    let body: Invoice = response.json().expect("json");
    check!(body == invoice);
}

#[tokio::test]
async fn post_sends_json_body() {
    let mock_server = MockServer::start().await;
    let draft = Invoice {
        id: 0,
        amount_cents: 500,
    };
    let created = Invoice {
        id: 8,
        amount_cents: 500,
    };

    Mock::given(method("POST"))
        .and(path("/invoices"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(&draft))
        .respond_with(ResponseTemplate::new(201).set_body_json(&created))
        .mount(&mock_server)
        .await;

    let client = HyperClient::new();
    let request = Request::builder(Method::Post, endpoint(&mock_server, "/invoices"))
        .json(&draft)
        .expect("json body")
        .build();

    let response = client.execute(request).await.expect("response");

    check!(response.status() == 201);
    check!(response.json::<Invoice>().expect("json") == created);
}

#[tokio::test]
async fn error_statuses_are_plain_responses() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/invoices/404"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such invoice"))
        .mount(&mock_server)
        .await;

    let client = HyperClient::new();
    let response = client
        .get(endpoint(&mock_server, "/invoices/404").as_str())
        .await
        .expect("response");

    check!(response.is_client_error());
    check!(response.canonical_reason() == Some("Not Found"));
    check!(response.text().expect("utf-8") == "no such invoice");
}

#[tokio::test]
async fn query_parameters_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/invoices"))
        .and(query_param("status", "open"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let client = HyperClient::new();
    let request = Request::builder(Method::Get, endpoint(&mock_server, "/invoices"))
        .query("status", "open")
        .query("page", "2")
        .build();

    let response = client.execute(request).await.expect("response");
    check!(response.is_success());
}

#[tokio::test]
async fn response_headers_are_exposed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/invoices/7"))
        .respond_with(ResponseTemplate::new(204).insert_header("X-Request-Id", "abc123"))
        .mount(&mock_server)
        .await;

    let client = HyperClient::new();
    let response = client
        .head(endpoint(&mock_server, "/invoices/7").as_str())
        .await
        .expect("response");

    check!(response.status() == 204);
    check!(response.header("x-request-id") == Some("abc123"));
    check!(response.body().is_empty());
}

#[tokio::test]
async fn extension_methods_reach_the_server() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PURGE"))
        .and(path("/cache/invoices"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = HyperClient::new();
    let purge = Method::custom("PURGE").expect("valid token");
    let response = client
        .send(purge, endpoint(&mock_server, "/cache/invoices").as_str())
        .await
        .expect("response");

    check!(response.status() == 200);
}

#[tokio::test]
async fn client_timeout_applies_by_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let client = HyperClient::builder()
        .timeout(Duration::from_millis(100))
        .build();

    let_assert!(Err(err) = client.get(endpoint(&mock_server, "/slow").as_str()).await);
    let_assert!(Error::Timeout = err);
}

#[tokio::test]
async fn request_timeout_overrides_client_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(300)))
        .mount(&mock_server)
        .await;

    let client = HyperClient::builder()
        .timeout(Duration::from_millis(50))
        .build();
    let request = Request::builder(Method::Get, endpoint(&mock_server, "/slow"))
        .timeout(Duration::from_secs(5))
        .build();

    let response = client.execute(request).await.expect("request timeout wins");
    check!(response.status() == 200);
}

#[tokio::test]
async fn unreachable_server_is_a_connection_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let address = listener.local_addr().expect("local addr");
    drop(listener);

    let client = HyperClient::new();
    let_assert!(Err(err) = client.get(&format!("http://{address}/")).await);

    check!(err.is_connection(), "expected connection error, got: {err}");
    let_assert!(Error::Connection(_) = err);
}

#[tokio::test]
async fn truncated_body_keeps_the_received_head() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let address = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut request = [0_u8; 1024];
        let _ = socket.read(&mut request).await;
        socket
            .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 100\r\nx-shard: 4\r\n\r\npartial")
            .await
            .expect("write");
    });

    let client = HyperClient::new();
    let_assert!(Err(err) = client.get(&format!("http://{address}/report")).await);

    let_assert!(Error::Incomplete { response, .. } = &err);
    check!(response.status() == 200);
    check!(response.header("x-shard") == Some("4"));
    check!(response.body().is_empty());
    check!(err.response().is_some());
}

#[tokio::test]
async fn invalid_url_is_rejected_before_sending() {
    let client = HyperClient::new();
    let_assert!(Err(Error::InvalidUrl(_)) = client.get("not a url").await);
}
