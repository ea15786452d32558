use serde::Deserialize;
use serde_json::json;

use super::*;
use crate::session::{MemoryStorage, SessionUser};
use crate::test_support::{RecordingNavigator, ScriptedTransport, TestClient};

// =============================================================================
// Helpers
// =============================================================================

fn make_client(signed_in: bool) -> (TestClient, ScriptedTransport, RecordingNavigator) {
    let store = SessionStore::new(MemoryStorage::new());
    if signed_in {
        let user = SessionUser { id: "u-1".to_owned(), ..SessionUser::default() };
        store.commit("tok-1", None, &user).unwrap();
    }
    let transport = ScriptedTransport::default();
    let navigator = RecordingNavigator::default();
    let client = ApiClient::new("http://localhost:3000/", transport.clone(), store, navigator.clone());
    (client, transport, navigator)
}

#[derive(Debug, Deserialize, PartialEq)]
struct Department {
    id: u32,
    name: String,
}

// =============================================================================
// outbound interceptor
// =============================================================================

#[tokio::test]
async fn attaches_bearer_token_when_signed_in() {
    let (client, transport, _) = make_client(true);
    transport.reply(200, "[]");
    client.send(ApiRequest::new(Method::Get, "/departments")).await.unwrap();

    let sent = transport.last_sent();
    assert_eq!(sent.url, "http://localhost:3000/departments");
    assert_eq!(sent.header("authorization"), Some("Bearer tok-1"));
    assert_eq!(sent.header("Content-Type"), Some("application/json"));
}

#[tokio::test]
async fn sends_anonymously_without_session() {
    let (client, transport, _) = make_client(false);
    transport.reply(200, "{}");
    client.send(ApiRequest::new(Method::Get, "auth/allowed-domains")).await.unwrap();

    let sent = transport.last_sent();
    assert_eq!(sent.url, "http://localhost:3000/auth/allowed-domains");
    assert_eq!(sent.header("Authorization"), None);
}

#[tokio::test]
async fn absolute_urls_are_left_alone() {
    let (client, transport, _) = make_client(false);
    transport.reply(200, "{}");
    client.send(ApiRequest::new(Method::Get, "https://other.test/x")).await.unwrap();
    assert_eq!(transport.last_sent().url, "https://other.test/x");
}

// =============================================================================
// inbound interceptor
// =============================================================================

#[tokio::test]
async fn unauthorized_clears_session_and_navigates_to_login() {
    let (client, transport, navigator) = make_client(true);
    transport.reply(401, r#"{"message":"Unauthorized"}"#);

    let err = client.send(ApiRequest::new(Method::Get, "/users/profile")).await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthenticated));
    assert!(client.store().read().is_none());
    assert_eq!(*navigator.visits.borrow(), vec![AppRoute::login()]);
}

#[tokio::test]
async fn unauthorized_applies_to_every_endpoint_and_method() {
    for (method, path) in [(Method::Post, "/departments"), (Method::Delete, "/admin/domains/3")] {
        let (client, transport, navigator) = make_client(true);
        transport.reply(401, "");
        let err = client.send(ApiRequest::new(method, path)).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated));
        assert!(client.store().read().is_none());
        assert_eq!(navigator.visits.borrow().len(), 1);
    }
}

#[tokio::test]
async fn other_errors_pass_through_without_touching_session() {
    let (client, transport, navigator) = make_client(true);
    transport.reply(400, r#"{"message":["name must not be empty","code too long"]}"#);

    let err = client.send(ApiRequest::new(Method::Post, "/departments")).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.user_message("fallback"), "name must not be empty");
    assert!(client.store().read().is_some());
    assert!(navigator.visits.borrow().is_empty());
}

#[tokio::test]
async fn forbidden_is_not_a_logout() {
    let (client, transport, navigator) = make_client(true);
    transport.reply(403, "");
    let err = client.send(ApiRequest::new(Method::Get, "/admin/domains")).await.unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert_eq!(err.user_message("Not allowed"), "Not allowed");
    assert!(client.store().read().is_some());
    assert!(navigator.visits.borrow().is_empty());
}

#[tokio::test]
async fn transport_failure_is_network_error() {
    let (client, transport, _) = make_client(true);
    transport.fail("connection refused");
    let err = client.send(ApiRequest::new(Method::Get, "/departments")).await.unwrap_err();
    assert!(matches!(err, ApiError::Network(ref m) if m == "connection refused"));
    assert_eq!(err.user_message("Failed to load"), "Failed to load");
}

// =============================================================================
// JSON helpers
// =============================================================================

#[tokio::test]
async fn post_json_serializes_body() {
    let (client, transport, _) = make_client(true);
    transport.reply(201, r#"{"id":1,"name":"Math"}"#);
    let created: Department = client.post_json("/departments", &json!({ "name": "Math" })).await.unwrap();
    assert_eq!(created, Department { id: 1, name: "Math".to_owned() });

    let sent = transport.last_sent();
    assert_eq!(sent.method, Method::Post);
    assert_eq!(sent.body, Some(json!({ "name": "Math" })));
}

#[tokio::test]
async fn get_json_reports_decode_errors() {
    let (client, transport, _) = make_client(true);
    transport.reply(200, "not json");
    let err = client.get_json::<Department>("/departments/1").await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn get_list_accepts_wrapped_collections() {
    let (client, transport, _) = make_client(true);
    transport.reply(200, r#"{"data":[{"id":1,"name":"Math"}],"total":1}"#);
    let request = ApiRequest::new(Method::Get, "/users").with_query("departmentId", "1");
    let list: Vec<Department> = client.get_list(request, "users").await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(transport.last_sent().query, vec![("departmentId".to_owned(), "1".to_owned())]);
}

#[tokio::test]
async fn delete_discards_body() {
    let (client, transport, _) = make_client(true);
    transport.reply(204, "");
    client.delete("/admin/domains/7").await.unwrap();
    assert_eq!(transport.last_sent().method, Method::Delete);
}

// =============================================================================
// error_message / extract_list
// =============================================================================

#[test]
fn error_message_reads_string_or_first_array_item() {
    assert_eq!(error_message(r#"{"message":"Invalid invitation"}"#).as_deref(), Some("Invalid invitation"));
    assert_eq!(error_message(r#"{"message":["a","b"]}"#).as_deref(), Some("a"));
}

#[test]
fn error_message_absent_or_malformed_is_none() {
    assert_eq!(error_message(""), None);
    assert_eq!(error_message(r#"{"error":"x"}"#), None);
    assert_eq!(error_message(r#"{"message":[]}"#), None);
    assert_eq!(error_message(r#"{"message":""}"#), None);
}

#[test]
fn extract_list_handles_every_shape() {
    let bare: Vec<u32> = extract_list(json!([1, 2]), "domains");
    let data: Vec<u32> = extract_list(json!({ "data": [3] }), "domains");
    let named: Vec<u32> = extract_list(json!({ "domains": [4, 5] }), "domains");
    let other: Vec<u32> = extract_list(json!({ "count": 2 }), "domains");
    assert_eq!(bare, vec![1, 2]);
    assert_eq!(data, vec![3]);
    assert_eq!(named, vec![4, 5]);
    assert!(other.is_empty());
}

#[test]
fn extract_list_skips_malformed_items() {
    let items: Vec<u32> = extract_list(json!([1, "two", 3]), "data");
    assert_eq!(items, vec![1, 3]);
}
