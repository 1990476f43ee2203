// ── Entity form ──
//
// A single-field form used both for creating a user and for editing the
// one being edited. The mode follows from whether a source record is
// attached.

use qrdesk_api::{User, UserPayload};

/// A keystroke-level change to a text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEdit {
    Insert(char),
    Backspace,
    Clear,
}

impl TextEdit {
    pub fn apply(self, text: &mut String) {
        match self {
            Self::Insert(c) => text.push(c),
            Self::Backspace => {
                text.pop();
            }
            Self::Clear => text.clear(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

#[derive(Debug, Clone, Default)]
pub struct EntityForm {
    value: String,
    source: Option<User>,
}

impl EntityForm {
    /// An empty create-mode form.
    pub fn new() -> Self {
        Self::default()
    }

    /// A form bound to `record`, pre-filled with its username.
    pub fn for_record(record: Option<&User>) -> Self {
        let mut form = Self::new();
        form.sync(record);
        form
    }

    pub fn mode(&self) -> FormMode {
        if self.source.is_some() {
            FormMode::Edit
        } else {
            FormMode::Create
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn title(&self) -> &'static str {
        match self.mode() {
            FormMode::Create => "Create User",
            FormMode::Edit => "Edit User",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode() {
            FormMode::Create => "Create",
            FormMode::Edit => "Update",
        }
    }

    /// Re-bind to `record` when it differs from the current source.
    ///
    /// A new record overwrites the field with its username. Detaching
    /// (`None`) leaves whatever was typed.
    pub fn sync(&mut self, record: Option<&User>) {
        if self.source.as_ref() == record {
            return;
        }
        self.source = record.cloned();
        if let Some(user) = record {
            self.value.clone_from(&user.username);
        }
    }

    pub fn edit(&mut self, edit: TextEdit) {
        edit.apply(&mut self.value);
    }

    /// Validate and take the trimmed payload.
    ///
    /// Whitespace-only input is rejected with no side effect. On success the
    /// field is cleared right away, before the backend has answered.
    pub fn submit(&mut self) -> Option<UserPayload> {
        let username = self.value.trim();
        if username.is_empty() {
            return None;
        }
        let payload = UserPayload {
            username: username.to_owned(),
        };
        self.value.clear();
        Some(payload)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use qrdesk_api::EntityId;

    use super::*;

    fn alice() -> User {
        User {
            id: EntityId::Numeric(1),
            username: "alice".into(),
        }
    }

    #[test]
    fn create_mode_labels() {
        let form = EntityForm::new();
        assert_eq!(form.mode(), FormMode::Create);
        assert_eq!(form.title(), "Create User");
        assert_eq!(form.submit_label(), "Create");
        assert_eq!(form.value(), "");
    }

    #[test]
    fn edit_mode_prefills_username() {
        let form = EntityForm::for_record(Some(&alice()));
        assert_eq!(form.mode(), FormMode::Edit);
        assert_eq!(form.title(), "Edit User");
        assert_eq!(form.submit_label(), "Update");
        assert_eq!(form.value(), "alice");
    }

    #[test]
    fn blank_submit_is_rejected() {
        let mut form = EntityForm::new();
        for c in "   ".chars() {
            form.edit(TextEdit::Insert(c));
        }
        assert!(form.submit().is_none());
        assert_eq!(form.value(), "   ");
    }

    #[test]
    fn submit_trims_and_clears_field() {
        let mut form = EntityForm::new();
        for c in "  bob  ".chars() {
            form.edit(TextEdit::Insert(c));
        }
        let payload = form.submit().unwrap();
        assert_eq!(payload.username, "bob");
        assert_eq!(form.value(), "");
    }

    #[test]
    fn sync_same_record_keeps_typed_text() {
        let mut form = EntityForm::for_record(Some(&alice()));
        form.edit(TextEdit::Backspace);
        form.sync(Some(&alice()));
        assert_eq!(form.value(), "alic");
    }

    #[test]
    fn sync_new_record_overwrites_text() {
        let mut form = EntityForm::for_record(Some(&alice()));
        form.edit(TextEdit::Clear);
        let bob = User {
            id: EntityId::Numeric(2),
            username: "bob".into(),
        };
        form.sync(Some(&bob));
        assert_eq!(form.value(), "bob");
    }

    #[test]
    fn detach_keeps_value_and_switches_to_create() {
        let mut form = EntityForm::for_record(Some(&alice()));
        form.sync(None);
        assert_eq!(form.mode(), FormMode::Create);
        assert_eq!(form.value(), "alice");
    }
}
