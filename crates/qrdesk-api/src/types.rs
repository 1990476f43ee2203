// Wire types for the qrdesk backend
//
// Field names follow the backend's camelCase JSON. Unknown fields are
// ignored; the backend serializes JPA entities and may add relations.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

// ── Identifiers ──────────────────────────────────────────────────────

/// Opaque backend identifier.
///
/// The backend hands out numeric ids today, but nothing on this side
/// depends on that -- ids are only echoed back in URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Numeric(i64),
    Text(String),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        Self::Numeric(n)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

// ── Users ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub username: String,
}

impl User {
    /// Overlay the mutable fields of `payload` onto this record.
    pub fn merge(&mut self, payload: &UserPayload) {
        self.username.clone_from(&payload.username);
    }
}

/// Request body for `POST /users` and `PUT /users/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPayload {
    pub username: String,
}

/// Body of `GET /users`.
///
/// Depending on the backend version the collection arrives bare or wrapped
/// under `users`. Anything else is kept as raw JSON so the caller can
/// report it.
///
/// Inside a recognized array, entries that do not decode as a [`User`] are
/// skipped one by one; they never demote the whole array to
/// `Unrecognized`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UsersPayload {
    Bare(#[serde(deserialize_with = "lenient_users")] Vec<User>),
    Wrapped {
        #[serde(deserialize_with = "lenient_users")]
        users: Vec<User>,
    },
    Unrecognized(serde_json::Value),
}

fn lenient_users<'de, D>(deserializer: D) -> Result<Vec<User>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Vec::<serde_json::Value>::deserialize(deserializer)?;
    let total = entries.len();
    let users: Vec<User> = entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "skipping malformed user entry");
                None
            }
        })
        .collect();
    if users.len() < total {
        warn!(kept = users.len(), total, "user list had malformed entries");
    }
    Ok(users)
}

impl UsersPayload {
    /// The user collection, or `None` for an unrecognized shape.
    pub fn into_users(self) -> Option<Vec<User>> {
        match self {
            Self::Bare(users) | Self::Wrapped { users } => Some(users),
            Self::Unrecognized(_) => None,
        }
    }
}

// ── QR codes ─────────────────────────────────────────────────────────

/// A stored QR code. `qr_code_base64` is a base64-encoded PNG.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrRecord {
    pub id: EntityId,
    pub content: String,
    pub qr_code_base64: String,
}

/// Body of `GET /qr`.
///
/// Newer backends return the stored record; older ones only return the
/// encoded image as `{ "qrCode": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum GeneratedQr {
    Record(QrRecord),
    Image {
        #[serde(rename = "qrCode")]
        qr_code: String,
    },
}

impl GeneratedQr {
    /// The base64 PNG payload, whichever shape the backend used.
    pub fn image_base64(&self) -> &str {
        match self {
            Self::Record(record) => &record.qr_code_base64,
            Self::Image { qr_code } => qr_code,
        }
    }
}

/// One item of a bulk generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrGenerationRequest {
    pub text: String,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct BulkQrRequest<'a> {
    pub requests: &'a [QrGenerationRequest],
}

/// Per-item outcome of `POST /qr/bulk`. Exactly one of `qr_code_base64`
/// and `error` is set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkQrResult {
    #[serde(default)]
    pub input_text: Option<String>,
    #[serde(default)]
    pub input_username: Option<String>,
    #[serde(default)]
    pub qr_code_base64: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl BulkQrResult {
    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.qr_code_base64.is_some()
    }
}
