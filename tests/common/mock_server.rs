//! Mock auth API for integration tests

use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Address nothing listens on; requests to it fail at the transport layer
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:9";

pub async fn start_mock_api() -> MockServer {
    MockServer::start().await
}

/// Successful login/signup body for `a@b.com`
pub fn auth_success_body(token: &str) -> Value {
    json!({
        "success": true,
        "token": token,
        "user": {"id": "1", "email": "a@b.com", "name": "A"}
    })
}

pub async fn mock_json(server: &MockServer, verb: &str, route: &str, status: u16, body: Value) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

pub async fn mock_raw(server: &MockServer, route: &str, status: u16, body: &str) {
    Mock::given(method("POST"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

/// Expect exactly `times` bearer-authenticated calls to `route`
pub async fn expect_bearer(
    server: &MockServer,
    verb: &str,
    route: &str,
    token: &str,
    status: u16,
    body: Value,
    times: u64,
) {
    Mock::given(method(verb))
        .and(path(route))
        .and(header("Authorization", format!("Bearer {token}").as_str()))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .expect(times)
        .mount(server)
        .await;
}
