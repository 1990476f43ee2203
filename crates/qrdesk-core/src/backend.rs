// ── Backend seam ──
//
// Everything the session needs from the REST service. `ApiClient` is the
// production implementation; tests substitute in-memory fakes.

use std::future::Future;

use qrdesk_api::{
    ApiClient, BulkQrResult, EntityId, GeneratedQr, QrGenerationRequest, QrRecord, TransportConfig,
    User, UserPayload, UsersPayload,
};
use tracing::debug;

use crate::config::BackendConfig;
use crate::error::CoreError;

pub trait Backend: Send + Sync {
    fn list_users(&self) -> impl Future<Output = Result<UsersPayload, CoreError>> + Send;

    fn create_user(
        &self,
        payload: &UserPayload,
    ) -> impl Future<Output = Result<User, CoreError>> + Send;

    fn update_user(
        &self,
        id: &EntityId,
        payload: &UserPayload,
    ) -> impl Future<Output = Result<Option<User>, CoreError>> + Send;

    fn delete_user(&self, id: &EntityId) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn list_qr_by_user(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Vec<QrRecord>, CoreError>> + Send;

    fn generate_qr(
        &self,
        text: &str,
        username: &str,
    ) -> impl Future<Output = Result<GeneratedQr, CoreError>> + Send;

    fn generate_qr_bulk(
        &self,
        requests: &[QrGenerationRequest],
    ) -> impl Future<Output = Result<Vec<BulkQrResult>, CoreError>> + Send;

    fn request_count(&self) -> impl Future<Output = Result<u64, CoreError>> + Send;

    fn reset_request_count(&self) -> impl Future<Output = Result<(), CoreError>> + Send;
}

/// Build an `ApiClient` for `config`.
pub fn connect(config: &BackendConfig) -> Result<ApiClient, CoreError> {
    let mut transport = TransportConfig::default();
    if let Some(timeout) = config.timeout {
        transport = transport.with_timeout(timeout);
    }
    debug!(url = %config.url, timeout = ?config.timeout, "building backend client");
    Ok(ApiClient::new(config.url.as_str(), &transport)?)
}

impl Backend for ApiClient {
    async fn list_users(&self) -> Result<UsersPayload, CoreError> {
        Ok(ApiClient::list_users(self).await?)
    }

    async fn create_user(&self, payload: &UserPayload) -> Result<User, CoreError> {
        Ok(ApiClient::create_user(self, payload).await?)
    }

    async fn update_user(
        &self,
        id: &EntityId,
        payload: &UserPayload,
    ) -> Result<Option<User>, CoreError> {
        Ok(ApiClient::update_user(self, id, payload).await?)
    }

    async fn delete_user(&self, id: &EntityId) -> Result<(), CoreError> {
        Ok(ApiClient::delete_user(self, id).await?)
    }

    async fn list_qr_by_user(&self, username: &str) -> Result<Vec<QrRecord>, CoreError> {
        Ok(ApiClient::list_qr_by_user(self, username).await?)
    }

    async fn generate_qr(&self, text: &str, username: &str) -> Result<GeneratedQr, CoreError> {
        Ok(ApiClient::generate_qr(self, text, username).await?)
    }

    async fn generate_qr_bulk(
        &self,
        requests: &[QrGenerationRequest],
    ) -> Result<Vec<BulkQrResult>, CoreError> {
        Ok(ApiClient::generate_qr_bulk(self, requests).await?)
    }

    async fn request_count(&self) -> Result<u64, CoreError> {
        Ok(ApiClient::request_count(self).await?)
    }

    async fn reset_request_count(&self) -> Result<(), CoreError> {
        Ok(ApiClient::reset_request_count(self).await?)
    }
}
