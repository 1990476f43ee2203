// Hand-written async HTTP client for the qrdesk backend.
//
// Base path: /api/
// Auth: none

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;
use crate::types::{
    BulkQrRequest, BulkQrResult, EntityId, GeneratedQr, QrGenerationRequest, QrRecord, User,
    UserPayload, UsersPayload,
};

// ── Error response shape from the backend ────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the qrdesk REST backend.
///
/// Every method is a single request: no retries, no caching. Failures are
/// returned to the caller unmodified.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for `base_url` using the given transport settings.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// The normalized base URL (always ends with `/api/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append `/api/` unless the path already ends with `/api`.
    ///
    /// `http://host:8080` and `http://host:8080/api/` both become
    /// `http://host:8080/api/`.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;

        let path = url.path().trim_end_matches('/').to_owned();

        if path.ends_with("/api") {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/api/"));
        }

        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        self.handle_response(resp).await
    }

    async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    async fn post_empty(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).send().await?;
        self.handle_empty(resp).await
    }

    async fn put_optional<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<T>, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self.http.put(url).json(body).send().await?;
        self.handle_optional(resp).await
    }

    async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        self.handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            decode(body)
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    /// Like `handle_response`, but an empty 2xx body yields `None`.
    async fn handle_optional<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<Option<T>, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            if body.trim().is_empty() {
                Ok(None)
            } else {
                decode(body).map(Some)
            }
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        let message = match serde_json::from_str::<ErrorResponse>(&raw) {
            Ok(ErrorResponse {
                message: Some(message),
                ..
            }) => message,
            Ok(ErrorResponse {
                error: Some(error), ..
            }) => error,
            _ if raw.is_empty() => status.to_string(),
            _ => raw,
        };

        Error::Api {
            status: status.as_u16(),
            message,
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Users ────────────────────────────────────────────────────────

    /// `GET /users`
    pub async fn list_users(&self) -> Result<UsersPayload, Error> {
        self.get("users").await
    }

    /// `POST /users`
    pub async fn create_user(&self, user: &UserPayload) -> Result<User, Error> {
        self.post("users", user).await
    }

    /// `PUT /users/{id}` -- some backends answer with an empty body.
    pub async fn update_user(
        &self,
        id: &EntityId,
        user: &UserPayload,
    ) -> Result<Option<User>, Error> {
        self.put_optional(&format!("users/{id}"), user).await
    }

    /// `DELETE /users/{id}`
    pub async fn delete_user(&self, id: &EntityId) -> Result<(), Error> {
        self.delete(&format!("users/{id}")).await
    }

    // ── QR codes ─────────────────────────────────────────────────────

    /// `GET /qr/by-user?username=`
    pub async fn list_qr_by_user(&self, username: &str) -> Result<Vec<QrRecord>, Error> {
        self.get_with_params("qr/by-user", &[("username", username)])
            .await
    }

    /// `GET /qr?text=&username=`
    ///
    /// A GET that creates a record: the backend is not idempotent here,
    /// so callers must not retry it blindly.
    pub async fn generate_qr(&self, text: &str, username: &str) -> Result<GeneratedQr, Error> {
        self.get_with_params("qr", &[("text", text), ("username", username)])
            .await
    }

    /// `POST /qr/bulk`
    pub async fn generate_qr_bulk(
        &self,
        requests: &[QrGenerationRequest],
    ) -> Result<Vec<BulkQrResult>, Error> {
        self.post("qr/bulk", &BulkQrRequest { requests }).await
    }

    // ── Request counter ──────────────────────────────────────────────

    /// `GET /qr/request-count`
    pub async fn request_count(&self) -> Result<u64, Error> {
        self.get("qr/request-count").await
    }

    /// `POST /qr/reset-count`
    pub async fn reset_request_count(&self) -> Result<(), Error> {
        self.post_empty("qr/reset-count").await
    }
}

fn decode<T: DeserializeOwned>(body: String) -> Result<T, Error> {
    serde_json::from_str(&body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body,
        }
    })
}
