// qrdesk-api: Async Rust client for the qrdesk user/QR REST backend

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::ApiClient;
pub use error::Error;
pub use transport::TransportConfig;
pub use types::{
    BulkQrResult, EntityId, GeneratedQr, QrGenerationRequest, QrRecord, User, UserPayload,
    UsersPayload,
};
