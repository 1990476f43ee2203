//! Panel identifiers and focus order.

use std::fmt;

use qrdesk_core::Coordinator;

/// Each focusable region of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PanelId {
    #[default]
    Users,
    Form,
    Generator,
    Gallery,
}

impl PanelId {
    /// All panels in focus order.
    pub const ALL: [PanelId; 4] = [Self::Users, Self::Form, Self::Generator, Self::Gallery];

    /// Whether the panel is on screen for the current session.
    pub fn is_visible(self, session: &Coordinator) -> bool {
        let state = session.state();
        match self {
            Self::Users => true,
            Self::Form => state.show_create_form || state.edit_user.is_some(),
            Self::Generator | Self::Gallery => state.selected_user.is_some(),
        }
    }

    /// Next visible panel in focus order (wraps around).
    pub fn next(self, session: &Coordinator) -> Self {
        self.step(session, 1)
    }

    /// Previous visible panel in focus order (wraps around).
    pub fn prev(self, session: &Coordinator) -> Self {
        self.step(session, Self::ALL.len() - 1)
    }

    fn step(self, session: &Coordinator, stride: usize) -> Self {
        let start = Self::ALL.iter().position(|&p| p == self).unwrap_or(0);
        (1..=Self::ALL.len())
            .map(|i| Self::ALL[(start + i * stride) % Self::ALL.len()])
            .find(|p| p.is_visible(session))
            .unwrap_or(Self::Users)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Users => "Users",
            Self::Form => "Form",
            Self::Generator => "Generate",
            Self::Gallery => "Gallery",
        }
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use qrdesk_core::{Command, EntityId, User};

    use super::*;

    fn alice() -> User {
        User {
            id: EntityId::Numeric(1),
            username: "alice".into(),
        }
    }

    #[test]
    fn only_users_visible_initially() {
        let session = Coordinator::new();
        assert_eq!(PanelId::Users.next(&session), PanelId::Users);
        assert_eq!(PanelId::Users.prev(&session), PanelId::Users);
    }

    #[test]
    fn selection_reveals_generator_and_gallery() {
        let mut session = Coordinator::new();
        session.handle(Command::SelectUser(alice()));

        assert_eq!(PanelId::Users.next(&session), PanelId::Generator);
        assert_eq!(PanelId::Generator.next(&session), PanelId::Gallery);
        assert_eq!(PanelId::Gallery.next(&session), PanelId::Users);
        assert_eq!(PanelId::Users.prev(&session), PanelId::Gallery);
    }

    #[test]
    fn create_form_joins_focus_order() {
        let mut session = Coordinator::new();
        session.handle(Command::BeginCreate);

        assert!(PanelId::Form.is_visible(&session));
        assert_eq!(PanelId::Users.next(&session), PanelId::Form);
        assert_eq!(PanelId::Form.next(&session), PanelId::Users);
    }
}
