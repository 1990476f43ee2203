// ── QR generator ──
//
// Text input plus an in-flight flag. At most one generation request is
// outstanding at a time.

use qrdesk_api::QrGenerationRequest;
use tracing::debug;

use crate::form::TextEdit;
use crate::request::Request;

/// Separator for batch input: `one;two;three`.
pub const BATCH_SEPARATOR: char = ';';

#[derive(Debug, Clone, Default)]
pub struct QrGenerator {
    text: String,
    busy: bool,
}

impl QrGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn trigger_label(&self) -> &'static str {
        if self.busy { "Generating..." } else { "Generate" }
    }

    /// Whether a trigger would be accepted given the current selection.
    pub fn can_trigger(&self, username: Option<&str>) -> bool {
        username.is_some() && !self.busy && !self.text.trim().is_empty()
    }

    pub fn edit(&mut self, edit: TextEdit) {
        edit.apply(&mut self.text);
    }

    /// Trimmed, non-empty items of a `;`-separated batch.
    pub fn batch_items(&self) -> Vec<String> {
        self.text
            .split(BATCH_SEPARATOR)
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Start a single generation. The text is sent as typed and stays in
    /// the field.
    pub(crate) fn begin(&mut self, username: Option<&str>) -> Option<Request> {
        let username = self.accept(username)?;
        self.busy = true;
        Some(Request::GenerateQr {
            text: self.text.clone(),
            username,
        })
    }

    pub(crate) fn begin_batch(&mut self, username: Option<&str>) -> Option<Request> {
        let username = self.accept(username)?;
        let requests: Vec<QrGenerationRequest> = self
            .batch_items()
            .into_iter()
            .map(|text| QrGenerationRequest {
                text,
                username: username.clone(),
            })
            .collect();
        if requests.is_empty() {
            debug!("batch has no non-blank items");
            return None;
        }
        self.busy = true;
        Some(Request::GenerateBatch { requests })
    }

    pub(crate) fn finish(&mut self) {
        self.busy = false;
    }

    fn accept(&self, username: Option<&str>) -> Option<String> {
        if !self.can_trigger(username) {
            debug!(busy = self.busy, "generate ignored");
            return None;
        }
        username.map(str::to_owned)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn typed(text: &str) -> QrGenerator {
        let mut generator = QrGenerator::new();
        for c in text.chars() {
            generator.edit(TextEdit::Insert(c));
        }
        generator
    }

    #[test]
    fn no_selection_is_noop() {
        let mut generator = typed("hello");
        assert!(generator.begin(None).is_none());
        assert!(!generator.is_busy());
    }

    #[test]
    fn blank_text_is_noop() {
        let mut generator = typed("  \t ");
        assert!(generator.begin(Some("alice")).is_none());
        assert!(!generator.is_busy());
    }

    #[test]
    fn busy_blocks_second_trigger() {
        let mut generator = typed("hello");
        assert!(generator.begin(Some("alice")).is_some());
        assert!(generator.is_busy());
        assert_eq!(generator.trigger_label(), "Generating...");
        assert!(generator.begin(Some("alice")).is_none());

        generator.finish();
        assert_eq!(generator.trigger_label(), "Generate");
        assert!(generator.begin(Some("alice")).is_some());
    }

    #[test]
    fn text_is_sent_untrimmed_and_kept() {
        let mut generator = typed(" hi ");
        let request = generator.begin(Some("alice"));
        assert_eq!(
            request,
            Some(Request::GenerateQr {
                text: " hi ".into(),
                username: "alice".into(),
            })
        );
        assert_eq!(generator.text(), " hi ");
    }

    #[test]
    fn batch_splits_and_trims() {
        let generator = typed(" a ; ;b;; c ");
        assert_eq!(generator.batch_items(), vec!["a", "b", "c"]);
    }

    #[test]
    fn batch_request_carries_username() {
        let mut generator = typed("a;b");
        match generator.begin_batch(Some("alice")) {
            Some(Request::GenerateBatch { requests }) => {
                assert_eq!(requests.len(), 2);
                assert!(requests.iter().all(|r| r.username == "alice"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn batch_of_separators_is_noop() {
        let mut generator = typed(";;;");
        assert!(generator.begin_batch(Some("alice")).is_none());
        assert!(!generator.is_busy());
    }
}
