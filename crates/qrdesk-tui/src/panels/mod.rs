//! Panel implementations and factory.

pub mod gallery;
pub mod generator;
pub mod user_form;
pub mod user_list;

use crate::component::Component;
use crate::panel::PanelId;

/// Build every panel, keyed by id.
pub fn create_panels() -> Vec<(PanelId, Box<dyn Component>)> {
    vec![
        (PanelId::Users, Box::new(user_list::UserListPanel::new())),
        (PanelId::Form, Box::new(user_form::UserFormPanel::new())),
        (PanelId::Generator, Box::new(generator::GeneratorPanel::new())),
        (PanelId::Gallery, Box::new(gallery::GalleryPanel::new())),
    ]
}
