// ── Command API ──
//
// Every user intent flows through a single `Command` enum. The coordinator
// turns each one into state changes plus zero or more backend requests.

use qrdesk_api::User;

use crate::form::TextEdit;

/// Which text field a keystroke goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTarget {
    CreateForm,
    EditForm,
    Generator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Initial load.
    Mount,

    // ── Selection ────────────────────────────────────────────────────
    SelectUser(User),

    // ── User CRUD ────────────────────────────────────────────────────
    BeginCreate,
    CancelCreate,
    SubmitCreate,
    BeginEdit,
    CancelEdit,
    SubmitEdit,
    DeleteSelected,
    ConfirmDelete,
    CancelDelete,
    RefreshUsers,

    // ── QR generation ────────────────────────────────────────────────
    Generate,
    GenerateBatch,

    // ── Request counter ──────────────────────────────────────────────
    RefreshRequestCount,
    ResetRequestCount,

    // ── Text input ───────────────────────────────────────────────────
    Input { target: TextTarget, edit: TextEdit },
}
