// ── Backend requests ──
//
// Side effects the coordinator asks for, and the responses that come back.
// Requests carry everything needed to run them; the coordinator never
// awaits anything itself.

use qrdesk_api::{
    BulkQrResult, EntityId, GeneratedQr, QrGenerationRequest, QrRecord, User, UserPayload,
    UsersPayload,
};

use crate::backend::Backend;
use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    // ── Users ────────────────────────────────────────────────────────
    FetchUsers { epoch: u64 },
    CreateUser(UserPayload),
    UpdateUser { id: EntityId, payload: UserPayload },
    DeleteUser { id: EntityId },

    // ── QR codes ─────────────────────────────────────────────────────
    FetchQrCodes { epoch: u64, username: String },
    GenerateQr { text: String, username: String },
    GenerateBatch { requests: Vec<QrGenerationRequest> },

    // ── Request counter ──────────────────────────────────────────────
    FetchRequestCount,
    ResetRequestCount,
}

impl Request {
    /// Short label for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::FetchUsers { .. } => "fetch_users",
            Self::CreateUser(_) => "create_user",
            Self::UpdateUser { .. } => "update_user",
            Self::DeleteUser { .. } => "delete_user",
            Self::FetchQrCodes { .. } => "fetch_qr_codes",
            Self::GenerateQr { .. } => "generate_qr",
            Self::GenerateBatch { .. } => "generate_batch",
            Self::FetchRequestCount => "fetch_request_count",
            Self::ResetRequestCount => "reset_request_count",
        }
    }
}

#[derive(Debug)]
pub enum Response {
    Users {
        epoch: u64,
        result: Result<UsersPayload, CoreError>,
    },
    UserCreated(Result<User, CoreError>),
    UserUpdated {
        id: EntityId,
        payload: UserPayload,
        result: Result<Option<User>, CoreError>,
    },
    UserDeleted {
        id: EntityId,
        result: Result<(), CoreError>,
    },
    QrCodes {
        epoch: u64,
        result: Result<Vec<QrRecord>, CoreError>,
    },
    QrGenerated(Result<GeneratedQr, CoreError>),
    BatchGenerated(Result<Vec<BulkQrResult>, CoreError>),
    RequestCount(Result<u64, CoreError>),
    RequestCountReset(Result<(), CoreError>),
}

/// Run one request against `backend`. Never fails: errors travel inside
/// the response.
pub async fn execute<B: Backend>(backend: &B, request: Request) -> Response {
    match request {
        Request::FetchUsers { epoch } => Response::Users {
            epoch,
            result: backend.list_users().await,
        },
        Request::CreateUser(payload) => Response::UserCreated(backend.create_user(&payload).await),
        Request::UpdateUser { id, payload } => {
            let result = backend.update_user(&id, &payload).await;
            Response::UserUpdated {
                id,
                payload,
                result,
            }
        }
        Request::DeleteUser { id } => {
            let result = backend.delete_user(&id).await;
            Response::UserDeleted { id, result }
        }
        Request::FetchQrCodes { epoch, username } => Response::QrCodes {
            epoch,
            result: backend.list_qr_by_user(&username).await,
        },
        Request::GenerateQr { text, username } => {
            Response::QrGenerated(backend.generate_qr(&text, &username).await)
        }
        Request::GenerateBatch { requests } => {
            Response::BatchGenerated(backend.generate_qr_bulk(&requests).await)
        }
        Request::FetchRequestCount => Response::RequestCount(backend.request_count().await),
        Request::ResetRequestCount => {
            Response::RequestCountReset(backend.reset_request_count().await)
        }
    }
}
