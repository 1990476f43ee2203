// qrdesk-core: session state machine between qrdesk-api and the terminal UI.

pub mod backend;
pub mod command;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod form;
pub mod gallery;
pub mod generator;
pub mod request;
pub mod users;

// ── Primary re-exports ──────────────────────────────────────────────
pub use backend::{Backend, connect};
pub use command::{Command, TextTarget};
pub use config::BackendConfig;
pub use coordinator::{Coordinator, SessionState};
pub use error::CoreError;
pub use form::{EntityForm, FormMode, TextEdit};
pub use gallery::{EMPTY_PLACEHOLDER, GalleryTile, QrBitmap};
pub use generator::QrGenerator;
pub use request::{Request, Response, execute};
pub use users::UserList;

// Re-export wire types consumers need at the crate root.
pub use qrdesk_api::{EntityId, QrRecord, User, UserPayload};
