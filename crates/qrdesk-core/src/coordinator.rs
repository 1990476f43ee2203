// ── Session coordinator ──
//
// Owns all session state and is the only thing that mutates it. Frontends
// feed it `Command`s and backend `Response`s; it answers with the
// `Request`s to run next. Nothing in here awaits, so every transition can
// be driven step by step from tests.

use qrdesk_api::{BulkQrResult, EntityId, GeneratedQr, QrRecord, User};
use tracing::{debug, error, info, warn};

use crate::command::{Command, TextTarget};
use crate::error::CoreError;
use crate::form::EntityForm;
use crate::gallery::{GalleryTile, build_tiles};
use crate::generator::QrGenerator;
use crate::request::{Request, Response};
use crate::users::UserList;

/// Shared session state visible to every panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub selected_user: Option<User>,
    pub edit_user: Option<User>,
    pub show_create_form: bool,
    pub qr_codes: Vec<QrRecord>,
    /// Toggled after every successful mutation; its value is meaningless,
    /// only changes are observed.
    pub refresh_flag: bool,
}

#[derive(Debug, Default)]
pub struct Coordinator {
    state: SessionState,
    users: UserList,
    create_form: EntityForm,
    edit_form: EntityForm,
    generator: QrGenerator,
    tiles: Vec<GalleryTile>,
    pending_delete: Option<User>,
    selection_epoch: u64,
    request_count: Option<u64>,
}

impl Coordinator {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn users(&self) -> &UserList {
        &self.users
    }

    pub fn create_form(&self) -> &EntityForm {
        &self.create_form
    }

    pub fn edit_form(&self) -> &EntityForm {
        &self.edit_form
    }

    pub fn generator(&self) -> &QrGenerator {
        &self.generator
    }

    /// One tile per entry of `state().qr_codes`, same order.
    pub fn tiles(&self) -> &[GalleryTile] {
        &self.tiles
    }

    /// The user awaiting delete confirmation.
    pub fn pending_delete(&self) -> Option<&User> {
        self.pending_delete.as_ref()
    }

    pub fn request_count(&self) -> Option<u64> {
        self.request_count
    }

    pub fn selected_username(&self) -> Option<&str> {
        self.state.selected_user.as_ref().map(|u| u.username.as_str())
    }

    // ── Entry points ─────────────────────────────────────────────────

    pub fn handle(&mut self, command: Command) -> Vec<Request> {
        let mut requests = match command {
            Command::Mount => vec![Request::FetchRequestCount],
            Command::SelectUser(user) => self.select_user(user),
            Command::BeginCreate => {
                self.begin_create();
                Vec::new()
            }
            Command::CancelCreate => {
                self.state.show_create_form = false;
                Vec::new()
            }
            Command::SubmitCreate => self.submit_create(),
            Command::BeginEdit => {
                self.begin_edit();
                Vec::new()
            }
            Command::CancelEdit => {
                self.state.edit_user = None;
                Vec::new()
            }
            Command::SubmitEdit => self.submit_edit(),
            Command::DeleteSelected => {
                self.pending_delete.clone_from(&self.state.selected_user);
                Vec::new()
            }
            Command::ConfirmDelete => self
                .pending_delete
                .take()
                .map(|user| Request::DeleteUser { id: user.id })
                .into_iter()
                .collect(),
            Command::CancelDelete => {
                self.pending_delete = None;
                Vec::new()
            }
            Command::RefreshUsers => {
                self.flip_refresh();
                Vec::new()
            }
            Command::Generate => {
                let username = self.state.selected_user.as_ref().map(|u| u.username.as_str());
                self.generator.begin(username).into_iter().collect()
            }
            Command::GenerateBatch => {
                let username = self.state.selected_user.as_ref().map(|u| u.username.as_str());
                self.generator.begin_batch(username).into_iter().collect()
            }
            Command::RefreshRequestCount => vec![Request::FetchRequestCount],
            Command::ResetRequestCount => vec![Request::ResetRequestCount],
            Command::Input { target, edit } => {
                match target {
                    TextTarget::CreateForm => self.create_form.edit(edit),
                    TextTarget::EditForm => self.edit_form.edit(edit),
                    TextTarget::Generator => self.generator.edit(edit),
                }
                Vec::new()
            }
        };
        requests.extend(self.sync_children());
        requests
    }

    pub fn apply(&mut self, response: Response) -> Vec<Request> {
        let mut requests = match response {
            Response::Users { epoch, result } => {
                self.users.apply(epoch, result);
                Vec::new()
            }
            Response::UserCreated(result) => {
                self.user_created(result);
                Vec::new()
            }
            Response::UserUpdated {
                id,
                payload,
                result,
            } => {
                match result {
                    Ok(_) => {
                        if let Some(user) = self.state.selected_user.as_mut().filter(|u| u.id == id)
                        {
                            user.merge(&payload);
                        }
                        self.state.edit_user = None;
                        self.flip_refresh();
                        info!(%id, "user updated");
                    }
                    Err(e) => error!(%id, error = %e, "Error updating user"),
                }
                Vec::new()
            }
            Response::UserDeleted { id, result } => {
                self.user_deleted(&id, result);
                Vec::new()
            }
            Response::QrCodes { epoch, result } => {
                self.qr_codes_loaded(epoch, result);
                Vec::new()
            }
            Response::QrGenerated(result) => self.qr_generated(result),
            Response::BatchGenerated(result) => self.batch_generated(result),
            Response::RequestCount(result) => {
                match result {
                    Ok(count) => self.request_count = Some(count),
                    Err(e) => warn!(error = %e, "cannot read request count"),
                }
                Vec::new()
            }
            Response::RequestCountReset(result) => match result {
                Ok(()) => {
                    info!("request count reset");
                    self.request_count = Some(0);
                    vec![Request::FetchRequestCount]
                }
                Err(e) => {
                    error!(error = %e, "Error resetting request count");
                    Vec::new()
                }
            },
        };
        requests.extend(self.sync_children());
        requests
    }

    // ── Transitions ──────────────────────────────────────────────────

    fn select_user(&mut self, user: User) -> Vec<Request> {
        debug!(username = %user.username, "select user");
        self.state.edit_user = None;
        self.pending_delete = None;
        self.set_qr_codes(Vec::new());
        self.state.selected_user = Some(user);
        self.refetch_qr_codes()
    }

    fn begin_create(&mut self) {
        if !self.state.show_create_form {
            self.create_form = EntityForm::new();
            self.state.show_create_form = true;
        }
    }

    fn submit_create(&mut self) -> Vec<Request> {
        if !self.state.show_create_form {
            return Vec::new();
        }
        match self.create_form.submit() {
            Some(payload) => vec![Request::CreateUser(payload)],
            None => {
                debug!("blank username rejected");
                Vec::new()
            }
        }
    }

    fn user_created(&mut self, result: Result<User, CoreError>) {
        match result {
            Ok(user) => {
                info!(id = %user.id, username = %user.username, "user created");
                self.state.show_create_form = false;
                self.flip_refresh();
            }
            Err(e) => error!(error = %e, "Error creating user"),
        }
    }

    fn begin_edit(&mut self) {
        if self.state.selected_user.is_none() {
            debug!("edit ignored: no selection");
            return;
        }
        self.state.edit_user.clone_from(&self.state.selected_user);
    }

    fn submit_edit(&mut self) -> Vec<Request> {
        let Some(id) = self.state.edit_user.as_ref().map(|u| u.id.clone()) else {
            return Vec::new();
        };
        match self.edit_form.submit() {
            Some(payload) => vec![Request::UpdateUser { id, payload }],
            None => {
                debug!("blank username rejected");
                Vec::new()
            }
        }
    }

    fn user_deleted(&mut self, id: &EntityId, result: Result<(), CoreError>) {
        if let Err(e) = result {
            error!(%id, error = %e, "Error deleting user");
            return;
        }
        info!(%id, "user deleted");
        if self.state.selected_user.as_ref().is_some_and(|u| &u.id == id) {
            self.state.selected_user = None;
            self.set_qr_codes(Vec::new());
            // Invalidate any QR fetch still in flight for the deleted user.
            self.selection_epoch += 1;
        }
        self.state.edit_user = None;
        self.flip_refresh();
    }

    fn qr_codes_loaded(&mut self, epoch: u64, result: Result<Vec<QrRecord>, CoreError>) {
        if epoch != self.selection_epoch {
            debug!(epoch, current = self.selection_epoch, "dropping stale QR codes");
            return;
        }
        match result {
            Ok(records) => self.set_qr_codes(records),
            Err(e) => error!(error = %e, "Error loading QR codes"),
        }
    }

    fn qr_generated(&mut self, result: Result<GeneratedQr, CoreError>) -> Vec<Request> {
        self.generator.finish();
        match result {
            Ok(generated) => {
                debug!(len = generated.image_base64().len(), "QR code generated");
                self.refetch_qr_codes()
            }
            Err(e) => {
                error!(error = %e, "Error generating QR code");
                Vec::new()
            }
        }
    }

    fn batch_generated(&mut self, result: Result<Vec<BulkQrResult>, CoreError>) -> Vec<Request> {
        self.generator.finish();
        match result {
            Ok(results) => {
                let mut failed = 0usize;
                for item in results.iter().filter(|r| !r.is_success()) {
                    failed += 1;
                    warn!(
                        text = item.input_text.as_deref().unwrap_or_default(),
                        error = item.error.as_deref().unwrap_or("no image returned"),
                        "batch item failed"
                    );
                }
                info!(total = results.len(), failed, "batch generated");
                self.refetch_qr_codes()
            }
            Err(e) => {
                error!(error = %e, "Error generating QR batch");
                Vec::new()
            }
        }
    }

    // ── Helpers ──────────────────────────────────────────────────────

    /// Fetch QR codes for the current selection. Bumping the epoch makes
    /// any older fetch stale.
    fn refetch_qr_codes(&mut self) -> Vec<Request> {
        let Some(user) = self.state.selected_user.as_ref() else {
            return Vec::new();
        };
        self.selection_epoch += 1;
        vec![Request::FetchQrCodes {
            epoch: self.selection_epoch,
            username: user.username.clone(),
        }]
    }

    fn set_qr_codes(&mut self, records: Vec<QrRecord>) {
        self.tiles = build_tiles(&records);
        self.state.qr_codes = records;
    }

    fn flip_refresh(&mut self) {
        self.state.refresh_flag = !self.state.refresh_flag;
    }

    /// Propagate session state into the child models.
    fn sync_children(&mut self) -> Option<Request> {
        self.edit_form.sync(self.state.edit_user.as_ref());
        self.users.observe(self.state.refresh_flag)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::form::TextEdit;

    fn alice() -> User {
        User {
            id: EntityId::Numeric(1),
            username: "alice".into(),
        }
    }

    fn type_into(c: &mut Coordinator, target: TextTarget, text: &str) {
        for ch in text.chars() {
            c.handle(Command::Input {
                target,
                edit: TextEdit::Insert(ch),
            });
        }
    }

    #[test]
    fn first_command_fetches_users() {
        let mut c = Coordinator::new();
        let requests = c.handle(Command::Mount);
        assert!(requests.contains(&Request::FetchRequestCount));
        assert!(requests.contains(&Request::FetchUsers { epoch: 1 }));
        assert!(c.handle(Command::Mount).iter().all(|r| !matches!(r, Request::FetchUsers { .. })));
    }

    #[test]
    fn select_requests_qr_codes_for_user() {
        let mut c = Coordinator::new();
        c.handle(Command::Mount);
        let requests = c.handle(Command::SelectUser(alice()));
        assert_eq!(
            requests,
            vec![Request::FetchQrCodes {
                epoch: 1,
                username: "alice".into(),
            }]
        );
    }

    #[test]
    fn edit_form_follows_edit_user() {
        let mut c = Coordinator::new();
        c.handle(Command::SelectUser(alice()));
        c.handle(Command::BeginEdit);
        assert_eq!(c.edit_form().value(), "alice");
        assert_eq!(c.edit_form().title(), "Edit User");
        c.handle(Command::CancelEdit);
        assert!(c.state().edit_user.is_none());
    }

    #[test]
    fn begin_edit_without_selection_is_ignored() {
        let mut c = Coordinator::new();
        c.handle(Command::BeginEdit);
        assert!(c.state().edit_user.is_none());
    }

    #[test]
    fn submit_create_requires_open_form() {
        let mut c = Coordinator::new();
        c.handle(Command::Mount);
        type_into(&mut c, TextTarget::CreateForm, "bob");
        assert!(c.handle(Command::SubmitCreate).is_empty());
    }

    #[test]
    fn delete_without_selection_opens_nothing() {
        let mut c = Coordinator::new();
        c.handle(Command::DeleteSelected);
        assert!(c.pending_delete().is_none());
        assert!(c.handle(Command::ConfirmDelete).iter().all(|r| !matches!(r, Request::DeleteUser { .. })));
    }

    #[test]
    fn reset_count_refetches() {
        let mut c = Coordinator::new();
        c.handle(Command::Mount);
        let requests = c.apply(Response::RequestCountReset(Ok(())));
        assert_eq!(requests, vec![Request::FetchRequestCount]);
        assert_eq!(c.request_count(), Some(0));

        c.apply(Response::RequestCount(Ok(7)));
        assert_eq!(c.request_count(), Some(7));
    }
}
