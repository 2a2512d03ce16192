/**
 * Session Types Module
 *
 * Wire types exchanged with the auth API and the normalized types the
 * session manager persists.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Cached profile of the signed-in user, as persisted under the `user` key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub email: String,
    #[serde(default, alias = "display_name")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_owner: bool,
    /// Server fields this client does not interpret, kept as received
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    /// Shallow-merge `update` over this profile; fields absent from the update are kept
    pub fn apply(&mut self, update: UserUpdate) {
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(created_at) = update.created_at {
            self.created_at = Some(created_at);
        }
        if let Some(is_admin) = update.is_admin {
            self.is_admin = is_admin;
        }
        if let Some(is_owner) = update.is_owner {
            self.is_owner = is_owner;
        }
        for (key, value) in update.extra {
            if PROFILE_KEYS.contains(&key.as_str()) {
                // A typed key here would be emitted twice on serialization.
                tracing::debug!("Ignoring reserved key '{}' in profile update", key);
                continue;
            }
            self.extra.insert(key, value);
        }
    }
}

/// Keys owned by typed `UserProfile` fields (including serde aliases); never
/// stored in the flattened `extra` map
const PROFILE_KEYS: &[&str] = &[
    "id",
    "email",
    "name",
    "display_name",
    "created_at",
    "is_admin",
    "is_owner",
];

/// User object as the server sends it
///
/// Permission flags are optional on the wire (unconfirmed accounts omit them);
/// `normalize` is the only way to turn this into a persisted [`UserProfile`].
#[derive(Debug, Clone, Deserialize)]
pub struct ServerUser {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub email: String,
    #[serde(default, alias = "display_name")]
    pub name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_admin: Option<bool>,
    #[serde(default)]
    pub is_owner: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ServerUser {
    pub fn normalize(self) -> UserProfile {
        UserProfile {
            id: self.id,
            email: self.email,
            name: self.name,
            created_at: self.created_at,
            is_admin: self.is_admin.unwrap_or(false),
            is_owner: self.is_owner.unwrap_or(false),
            extra: self.extra,
        }
    }
}

/// Partial profile used by `SessionManager::update_user_data`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, alias = "display_name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_owner: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.name.is_none()
            && self.created_at.is_none()
            && self.is_admin.is_none()
            && self.is_owner.is_none()
            && self.extra.is_empty()
    }
}

/// Permission flags returned by the admin-status endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdminStatus {
    pub is_admin: bool,
    pub is_owner: bool,
}

impl From<AdminStatus> for UserUpdate {
    fn from(status: AdminStatus) -> Self {
        Self {
            is_admin: Some(status.is_admin),
            is_owner: Some(status.is_owner),
            ..Self::default()
        }
    }
}

/// Response envelope shared by every `/auth/*` endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthEnvelope {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<ServerUser>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl AuthEnvelope {
    /// Server-supplied failure text, preferring `error` over `message`
    pub fn failure_message(&self) -> Option<&str> {
        self.error
            .as_deref()
            .or(self.message.as_deref())
            .filter(|m| !m.trim().is_empty())
    }
}

/// Sign up request
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login request
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// A bearer token paired with the profile it authorizes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
}

impl Session {
    /// Authenticated iff both halves are present
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }
}

/// Result of probing a token against `/auth/verify`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerifyOutcome {
    pub valid: bool,
    pub user: Option<UserProfile>,
}

impl VerifyOutcome {
    pub fn invalid() -> Self {
        Self::default()
    }
}

// Backends disagree on whether ids are strings or integers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number for id, got {other}"
        ))),
    }
}
