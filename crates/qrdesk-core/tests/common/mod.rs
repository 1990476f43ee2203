// Shared fixtures for coordinator tests: an in-memory backend and a driver
// that runs requests until the coordinator is idle.

#![allow(dead_code, clippy::unwrap_used)]

use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use std::sync::Mutex;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use qrdesk_api::{
    BulkQrResult, EntityId, GeneratedQr, QrGenerationRequest, QrRecord, User, UserPayload,
    UsersPayload,
};
use qrdesk_core::{Backend, Command, Coordinator, CoreError, Request, execute};

/// A 2x2 checkerboard PNG, base64-encoded.
pub fn sample_png() -> String {
    let img = GrayImage::from_fn(2, 2, |x, y| {
        if (x + y) % 2 == 0 { Luma([0]) } else { Luma([255]) }
    });
    let mut buf = Vec::new();
    DynamicImage::ImageLuma8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    STANDARD.encode(buf)
}

pub fn user(id: i64, username: &str) -> User {
    User {
        id: EntityId::Numeric(id),
        username: username.into(),
    }
}

#[derive(Default)]
pub struct FakeBackend {
    users: Mutex<Vec<User>>,
    qr_codes: Mutex<HashMap<String, Vec<QrRecord>>>,
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<&'static str>>,
    users_body: Mutex<Option<serde_json::Value>>,
    counter: Mutex<u64>,
}

impl FakeBackend {
    pub fn with_users(users: &[User]) -> Self {
        let backend = Self::default();
        backend.users.lock().unwrap().extend_from_slice(users);
        backend
    }

    /// Make every call to `method` fail with a connection error.
    pub fn fail(&self, method: &'static str) {
        self.failing.lock().unwrap().insert(method);
    }

    pub fn recover(&self, method: &'static str) {
        self.failing.lock().unwrap().remove(method);
    }

    /// Answer `list_users` with this raw JSON instead of the stored users.
    pub fn set_users_body(&self, body: serde_json::Value) {
        *self.users_body.lock().unwrap() = Some(body);
    }

    pub fn add_qr(&self, username: &str, content: &str) {
        let mut qr_codes = self.qr_codes.lock().unwrap();
        let records = qr_codes.entry(username.to_owned()).or_default();
        let id = i64::try_from(records.len()).unwrap() + 1;
        records.push(QrRecord {
            id: EntityId::Numeric(id),
            content: content.into(),
            qr_code_base64: sample_png(),
        });
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn record(&self, method: &'static str, detail: &str) -> Result<(), CoreError> {
        self.calls.lock().unwrap().push(format!("{method}:{detail}"));
        if self.failing.lock().unwrap().contains(method) {
            return Err(CoreError::ConnectionFailed {
                url: "http://fake".into(),
                reason: "connection refused".into(),
            });
        }
        Ok(())
    }
}

impl Backend for FakeBackend {
    async fn list_users(&self) -> Result<UsersPayload, CoreError> {
        self.record("list_users", "")?;
        if let Some(body) = self.users_body.lock().unwrap().clone() {
            return Ok(serde_json::from_value(body).unwrap());
        }
        Ok(UsersPayload::Bare(self.users.lock().unwrap().clone()))
    }

    async fn create_user(&self, payload: &UserPayload) -> Result<User, CoreError> {
        self.record("create_user", &payload.username)?;
        let mut users = self.users.lock().unwrap();
        let id = i64::try_from(users.len()).unwrap() + 100;
        let created = user(id, &payload.username);
        users.push(created.clone());
        Ok(created)
    }

    async fn update_user(
        &self,
        id: &EntityId,
        payload: &UserPayload,
    ) -> Result<Option<User>, CoreError> {
        self.record("update_user", &format!("{id}={}", payload.username))?;
        let mut users = self.users.lock().unwrap();
        let updated = users.iter_mut().find(|u| &u.id == id).map(|u| {
            u.merge(payload);
            u.clone()
        });
        Ok(updated)
    }

    async fn delete_user(&self, id: &EntityId) -> Result<(), CoreError> {
        self.record("delete_user", &id.to_string())?;
        self.users.lock().unwrap().retain(|u| &u.id != id);
        Ok(())
    }

    async fn list_qr_by_user(&self, username: &str) -> Result<Vec<QrRecord>, CoreError> {
        self.record("list_qr_by_user", username)?;
        Ok(self
            .qr_codes
            .lock()
            .unwrap()
            .get(username)
            .cloned()
            .unwrap_or_default())
    }

    async fn generate_qr(&self, text: &str, username: &str) -> Result<GeneratedQr, CoreError> {
        self.record("generate_qr", &format!("{username}={text}"))?;
        *self.counter.lock().unwrap() += 1;
        self.add_qr(username, text);
        Ok(GeneratedQr::Image {
            qr_code: sample_png(),
        })
    }

    async fn generate_qr_bulk(
        &self,
        requests: &[QrGenerationRequest],
    ) -> Result<Vec<BulkQrResult>, CoreError> {
        self.record("generate_qr_bulk", &requests.len().to_string())?;
        let results = requests
            .iter()
            .map(|req| {
                let mut result = BulkQrResult {
                    input_text: Some(req.text.clone()),
                    input_username: Some(req.username.clone()),
                    qr_code_base64: None,
                    error: None,
                };
                if req.text == "bad" {
                    result.error = Some("Processing failed".into());
                } else {
                    self.add_qr(&req.username, &req.text);
                    result.qr_code_base64 = Some(sample_png());
                }
                result
            })
            .collect();
        Ok(results)
    }

    async fn request_count(&self) -> Result<u64, CoreError> {
        self.record("request_count", "")?;
        Ok(*self.counter.lock().unwrap())
    }

    async fn reset_request_count(&self) -> Result<(), CoreError> {
        self.record("reset_request_count", "")?;
        *self.counter.lock().unwrap() = 0;
        Ok(())
    }
}

/// Run `pending` and everything it triggers, in FIFO order.
pub fn drive(coordinator: &mut Coordinator, backend: &FakeBackend, pending: Vec<Request>) {
    let mut queue: std::collections::VecDeque<Request> = pending.into();
    while let Some(request) = queue.pop_front() {
        let response = tokio_test::block_on(execute(backend, request));
        queue.extend(coordinator.apply(response));
    }
}

/// Handle `command` and drive the resulting requests to completion.
pub fn dispatch(coordinator: &mut Coordinator, backend: &FakeBackend, command: Command) {
    let requests = coordinator.handle(command);
    drive(coordinator, backend, requests);
}

/// Type `text` into a field, one keystroke at a time.
pub fn type_text(
    coordinator: &mut Coordinator,
    backend: &FakeBackend,
    target: qrdesk_core::TextTarget,
    text: &str,
) {
    for ch in text.chars() {
        dispatch(
            coordinator,
            backend,
            Command::Input {
                target,
                edit: qrdesk_core::TextEdit::Insert(ch),
            },
        );
    }
}

/// A mounted coordinator with the initial loads applied.
pub fn mounted(backend: &FakeBackend) -> Coordinator {
    let mut coordinator = Coordinator::new();
    dispatch(&mut coordinator, backend, Command::Mount);
    coordinator
}
