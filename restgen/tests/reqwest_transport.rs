//! Integration tests for the reqwest transport.
//!
//! These tests use wiremock to stand in for a REST API and drive the
//! transport through `ClientCore`, the same way generated clients do.

use restgen::{ClientCore, ClientError, QueryBuilder, ReqwestTransport, ValuePolicy, Verb};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Issue {
    title: String,
}

async fn core_for(server: &MockServer) -> ClientCore<ReqwestTransport> {
    let transport = ReqwestTransport::builder(Url::parse(&server.uri()).unwrap())
        .bearer_token("test-token")
        .build()
        .unwrap();
    ClientCore::new(transport)
}

#[tokio::test]
async fn get_sends_auth_and_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/rust-lang/rust/issues"))
        .and(query_param("state", "open"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([{ "title": "ICE" }])),
        )
        .mount(&server)
        .await;

    let core = core_for(&server).await;
    let mut query = QueryBuilder::new();
    query.push("state", "open", ValuePolicy::OmitNullOrDefault);
    let route = format!("/repos/rust-lang/rust/issues{}", query.finish());

    let issues: Vec<Issue> = core.request(Verb::Get, route).send().await.unwrap();
    assert_eq!(issues, vec![Issue { title: "ICE".into() }]);
}

#[tokio::test]
async fn post_sends_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/issues"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({ "title": "new" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({ "title": "new" })))
        .mount(&server)
        .await;

    let core = core_for(&server).await;
    let created: Issue = core
        .request(Verb::Post, "/issues".into())
        .body(&Issue { title: "new".into() })
        .send()
        .await
        .unwrap();
    assert_eq!(created.title, "new");
}

#[tokio::test]
async fn api_key_header_is_attached() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/issues/9"))
        .and(header("x-api-key", "secret"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let transport = ReqwestTransport::builder(Url::parse(&server.uri()).unwrap())
        .api_key("X-API-Key", "secret")
        .unwrap()
        .build()
        .unwrap();
    let core: ClientCore<_> = ClientCore::new(transport);

    core.request(Verb::Delete, "/issues/9".into())
        .send_unit()
        .await
        .unwrap();
}

#[tokio::test]
async fn error_status_carries_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such thing"))
        .mount(&server)
        .await;

    let core = core_for(&server).await;
    let err = core
        .request(Verb::Get, "/missing".into())
        .send_unit()
        .await
        .unwrap_err();

    match err {
        ClientError::HttpStatus { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "no such thing");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn cancellation_interrupts_slow_responses() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(5)))
        .mount(&server)
        .await;

    let core = core_for(&server).await;
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let err = core
        .request(Verb::Get, "/slow".into())
        .cancellation(&token)
        .send_unit()
        .await
        .unwrap_err();
    assert!(err.is_cancelled());
}
