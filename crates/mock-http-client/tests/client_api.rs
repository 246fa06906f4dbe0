//! Integration tests for the public client API.
//!
//! These exercise the client the way application code and its tests use it:
//! register rules, hand the client to code under test, drain pending work.

use assert_json_diff::assert_json_eq;
use mock_http_client::{
    ClientConfig, ClientError, Method, MockClient, MockRule, RequestDescriptor, RequestOptions,
    ResponseSpec,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct User {
    id: u32,
    name: String,
}

/// Stand-in for application code: loads a user, then their settings, then
/// records a visit. Each call starts only after the previous one settled.
async fn load_profile(client: MockClient, id: u32) -> anyhow::Result<serde_json::Value> {
    let user: User = client.get(format!("/users/{id}")).await?.json()?;
    let settings = client.get(format!("/users/{}/settings", user.id)).await?;
    client
        .post("/visits", &json!({"user": user.id}))
        .await?;
    Ok(settings.data)
}

fn user_api() -> MockClient {
    MockClient::create(ClientConfig::new().base_url("https://api.example.com"))
        .mock(MockRule::new("/users/7", |_| {
            ResponseSpec::ok(json!({"id": 7, "name": "Ada"}))
        }))
        .mock(MockRule::new("/users/7/settings", |_| {
            ResponseSpec::ok(json!({"theme": "dark"}))
        }))
        .mock(
            MockRule::new("/visits", |request| {
                ResponseSpec::new(201).with_data(request.data.clone().unwrap_or_default())
            })
            .method(Method::Post),
        )
}

#[tokio::test]
async fn test_sequential_flow_resolves() {
    let client = user_api();

    let settings = load_profile(client.clone(), 7).await.unwrap();
    assert_json_eq!(settings, json!({"theme": "dark"}));

    let urls: Vec<String> = client
        .received_requests()
        .into_iter()
        .map(|request| request.url)
        .collect();
    assert_eq!(urls, vec!["/users/7", "/users/7/settings", "/visits"]);
}

#[tokio::test]
async fn test_fire_and_forget_flow_is_drained() {
    let client = user_api();
    let outcome = Arc::new(Mutex::new(None));

    tokio::spawn({
        let client = client.clone();
        let outcome = Arc::clone(&outcome);
        async move {
            let result = load_profile(client, 7).await;
            *outcome.lock() = Some(result.is_ok());
        }
    });

    client.wait_for_pending_requests().await;

    assert_eq!(*outcome.lock(), Some(true));
    assert_eq!(client.pending_requests(), 0);
    let visit = client.received_requests().pop().unwrap();
    assert_eq!(visit.method, Method::Post);
    assert_json_eq!(visit.data.unwrap(), json!({"user": 7}));
}

#[tokio::test]
async fn test_absolute_urls_under_base_are_matched() {
    let client = user_api();

    let response = client
        .get("https://api.example.com/users/7")
        .await
        .unwrap();
    let user: User = response.json().unwrap();
    assert_eq!(
        user,
        User {
            id: 7,
            name: "Ada".to_string()
        }
    );
}

#[tokio::test]
async fn test_missing_mock_surfaces_to_application() {
    let client = user_api();

    let err = load_profile(client, 8).await.unwrap_err();
    match err.downcast_ref::<ClientError>() {
        Some(ClientError::Unmocked(unmocked)) => {
            assert_eq!(unmocked.url(), "/users/8");
            assert!(!unmocked.to_string().contains("api.example.com"));
            assert!(unmocked.to_string().contains(file!()));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_body_is_inspectable() {
    let client = MockClient::new().mock(MockRule::new("/orders", |_| {
        ResponseSpec::new(422)
            .with_data(json!({"errors": [{"field": "qty", "code": "too_small"}]}))
            .with_header("content-type", "application/json")
    }));

    let err = client
        .post("/orders", &json!({"qty": 0}))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Request failed with status code 422");
    let response = err.response().unwrap();
    assert_eq!(response.header("content-type"), Some("application/json"));
    assert_json_eq!(
        response.data,
        json!({"errors": [{"field": "qty", "code": "too_small"}]})
    );
}

#[tokio::test]
async fn test_header_dependent_rules() {
    let client = MockClient::new()
        .mock(
            MockRule::new("/me", |_| ResponseSpec::ok(json!({"role": "admin"})))
                .header("authorization", "Bearer admin"),
        )
        .mock(MockRule::new("/me", |_| ResponseSpec::new(401)));

    let admin = client
        .request(
            RequestOptions::new()
                .url("/me")
                .headers([("authorization", "Bearer admin"), ("x-request-id", "42")]),
        )
        .await
        .unwrap();
    assert_json_eq!(admin.data, json!({"role": "admin"}));

    let anonymous = client.get("/me").await.unwrap_err();
    assert_eq!(anonymous.status(), Some(401));
}

#[tokio::test]
async fn test_async_producer_sees_request_snapshot() {
    let client = MockClient::new().mock(MockRule::new_async(
        "/echo",
        |request: &RequestDescriptor| {
            let echoed = json!({
                "method": request.method,
                "body": request.data,
            });
            async move {
                tokio::task::yield_now().await;
                Ok::<_, anyhow::Error>(ResponseSpec::ok(echoed))
            }
        },
    ));

    let response = client.put("/echo", &json!([1, 2])).await.unwrap();
    assert_json_eq!(response.data, json!({"method": "PUT", "body": [1, 2]}));
}

#[tokio::test]
async fn test_many_concurrent_dispatches_drain() {
    let client = MockClient::new().mock(MockRule::new("/tick", |_| ResponseSpec::ok(1)));

    for _ in 0..50 {
        let request = client.get("/tick");
        tokio::spawn(async move {
            request.await.unwrap();
        });
    }
    assert_eq!(client.pending_requests(), 50);

    client.wait_for_pending_requests().await;
    assert_eq!(client.pending_requests(), 0);
    assert_eq!(client.received_requests().len(), 50);
}
