/**
 * Authentication API Client
 *
 * HTTP calls against the auth backend. Every response is decoded into the
 * envelope shared by the `/auth` endpoints and classified into `AuthError`.
 */

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;

use crate::session::config::Config;
use crate::session::types::{AuthEnvelope, LoginRequest, SignupRequest};
use crate::shared::error::AuthError;

pub const SIGNUP_PATH: &str = "/auth/signup";
pub const LOGIN_PATH: &str = "/auth/login";
pub const VERIFY_PATH: &str = "/auth/verify";
pub const LOGOUT_PATH: &str = "/auth/logout";

const SIGNUP_FALLBACK: &str = "Could not create account";
const LOGIN_FALLBACK: &str = "Could not log in";
const VERIFY_FALLBACK: &str = "Session is no longer valid";
const LOGOUT_FALLBACK: &str = "Could not end the session on the server";

/// Auth API client
#[derive(Debug, Clone)]
pub struct AuthApi {
    config: Config,
    client: Client,
}

impl AuthApi {
    pub fn new(config: Config) -> Self {
        let client = build_client(&config);
        Self { config, client }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    /// Register a new account
    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthEnvelope, AuthError> {
        self.post(SIGNUP_PATH, Some(request), None, SIGNUP_FALLBACK).await
    }

    /// Exchange credentials for a token
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthEnvelope, AuthError> {
        self.post(LOGIN_PATH, Some(request), None, LOGIN_FALLBACK).await
    }

    /// Check that `token` is still accepted by the server
    pub async fn verify(&self, token: &str) -> Result<AuthEnvelope, AuthError> {
        self.post::<()>(VERIFY_PATH, None, Some(token), VERIFY_FALLBACK).await
    }

    /// Invalidate `token` server-side
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        let url = self.config.api_url(LOGOUT_PATH);
        tracing::debug!("POST {}", url);
        let response = with_bearer(self.client.post(&url), Some(token))
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| self.network_error(e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        // Body is ignored on success; on failure use it for the message if it parses.
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<AuthEnvelope>(&body)
            .ok()
            .and_then(|env| env.failure_message().map(str::to_string))
            .unwrap_or_else(|| LOGOUT_FALLBACK.to_string());
        Err(AuthError::request(status.as_u16(), message))
    }

    async fn post<B: Serialize>(
        &self,
        path: &str,
        body: Option<&B>,
        token: Option<&str>,
        fallback: &str,
    ) -> Result<AuthEnvelope, AuthError> {
        let url = self.config.api_url(path);
        tracing::debug!("POST {}", url);

        let request = with_bearer(self.client.post(&url), token);
        let request = match body {
            Some(body) => request.json(body),
            None => request.json(&serde_json::json!({})),
        };
        let response = request.send().await.map_err(|e| self.network_error(e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AuthError::protocol(status.as_u16(), format!("failed to read body: {e}")))?;

        decode_envelope(status, &text, fallback)
    }

    pub(crate) fn network_error(&self, err: reqwest::Error) -> AuthError {
        tracing::warn!("Request to {} failed: {}", self.config.server_url(), err);
        AuthError::network(self.config.server_url(), err.to_string())
    }
}

pub(crate) fn with_bearer(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

fn build_client(config: &Config) -> Client {
    let mut builder = Client::builder();
    if let Some(timeout) = config.request_timeout() {
        builder = builder.timeout(timeout);
    }
    builder.build().unwrap_or_else(|e| {
        tracing::warn!("Falling back to default HTTP client: {}", e);
        Client::new()
    })
}

/// Classify a raw response into an envelope or an `AuthError`
pub(crate) fn decode_envelope(
    status: StatusCode,
    body: &str,
    fallback: &str,
) -> Result<AuthEnvelope, AuthError> {
    let envelope: AuthEnvelope = serde_json::from_str(body).map_err(|e| {
        AuthError::protocol(
            status.as_u16(),
            format!("expected a JSON body from the auth API ({e})"),
        )
    })?;

    if !status.is_success() || envelope.success == Some(false) {
        let message = envelope.failure_message().unwrap_or(fallback).to_string();
        return Err(AuthError::request(status.as_u16(), message));
    }
    Ok(envelope)
}
