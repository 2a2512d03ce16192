//! Admin-status collaborator
//!
//! `SessionManager::refresh_admin_status` asks an [`AdminCheck`] for the current
//! permission flags. The HTTP implementation lives here; tests inject their own.

use async_trait::async_trait;
use serde::Deserialize;

use crate::session::auth::{with_bearer, AuthApi};
use crate::session::config::Config;
use crate::session::types::AdminStatus;
use crate::shared::error::AuthError;

pub const ADMIN_STATUS_PATH: &str = "/admin/status";

/// Source of truth for a token's admin/owner flags
#[async_trait]
pub trait AdminCheck: Send + Sync {
    async fn check(&self, token: &str) -> Result<AdminStatus, AuthError>;
}

#[derive(Debug, Deserialize)]
struct AdminStatusResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    is_admin: Option<bool>,
    #[serde(default)]
    is_owner: Option<bool>,
    #[serde(default)]
    error: Option<String>,
}

/// `GET /admin/status` against the auth API
#[derive(Debug, Clone)]
pub struct HttpAdminCheck {
    api: AuthApi,
}

impl HttpAdminCheck {
    pub fn new(config: Config) -> Self {
        Self {
            api: AuthApi::new(config),
        }
    }
}

#[async_trait]
impl AdminCheck for HttpAdminCheck {
    async fn check(&self, token: &str) -> Result<AdminStatus, AuthError> {
        let url = self.api.config().api_url(ADMIN_STATUS_PATH);
        tracing::debug!("GET {}", url);

        let response = with_bearer(self.api.client().get(&url), Some(token))
            .send()
            .await
            .map_err(|e| self.api.network_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::protocol(status.as_u16(), format!("failed to read body: {e}")))?;
        let parsed: AdminStatusResponse = serde_json::from_str(&body).map_err(|e| {
            AuthError::protocol(status.as_u16(), format!("expected a JSON body from the admin API ({e})"))
        })?;

        if !status.is_success() || parsed.success == Some(false) {
            let message = parsed
                .error
                .unwrap_or_else(|| "Could not verify permissions".to_string());
            return Err(AuthError::request(status.as_u16(), message));
        }

        Ok(AdminStatus {
            is_admin: parsed.is_admin.unwrap_or(false),
            is_owner: parsed.is_owner.unwrap_or(false),
        })
    }
}
