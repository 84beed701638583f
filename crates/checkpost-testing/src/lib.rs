//! Test fixtures and capability doubles for the submission pipeline.
//!
//! Provides a notifier that captures emitted notices for assertion,
//! builder-style record fixtures, and canned wire replies for HTTP mocks.
//! Everything here is deterministic; pair with `TestClock` for time
//! control.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::sync::Mutex;

use checkpost_core::{models::Notice, Record};
use checkpost_submit::Notifier;
use serde_json::json;

pub use checkpost_core::{Clock, TestClock};

/// Notifier double that records every notice it is handed.
#[derive(Debug, Default)]
pub struct CapturingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl CapturingNotifier {
    /// Creates an empty capturing notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every notice captured so far, in emission order.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clone()
    }

    /// Drains and returns the captured notices.
    pub fn take(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock().unwrap_or_else(|poisoned| poisoned.into_inner()))
    }
}

impl Notifier for CapturingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).push(notice);
    }
}

/// Builder for record fixtures.
#[derive(Debug, Default, Clone)]
pub struct RecordBuilder {
    name: String,
    id: Option<String>,
    uncheck: bool,
}

impl RecordBuilder {
    /// Starts a builder for a record named `name`.
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    /// Attaches a badge identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Marks the record as a removal.
    #[must_use]
    pub fn unchecking(mut self) -> Self {
        self.uncheck = true;
        self
    }

    /// Builds the record.
    pub fn build(self) -> Record {
        let mut record = match self.id {
            Some(id) => Record::with_id(self.name, id),
            None => Record::new(self.name),
        };
        if self.uncheck {
            record.action = Some(checkpost_core::RecordAction::Uncheck);
        }
        record
    }
}

/// Wire body for a reply that accepted the record.
pub fn success_reply(message: &str) -> serde_json::Value {
    json!({"ok": true, "message": message})
}

/// Wire body for a recoverable validation rejection (code 1).
pub fn soft_warning_reply(message: &str) -> serde_json::Value {
    json!({"ok": false, "message": message, "error": true, "code": 1})
}

/// Wire body for a hard rejection.
pub fn hard_error_reply(message: &str) -> serde_json::Value {
    json!({"ok": false, "message": message, "error": true})
}

#[cfg(test)]
mod tests {
    use checkpost_core::Severity;

    use super::*;

    #[test]
    fn capturing_notifier_preserves_order() {
        let notifier = CapturingNotifier::new();
        notifier.notify(Notice {
            message: "first".into(),
            severity: Severity::Success,
            duration: std::time::Duration::from_secs(2),
        });
        notifier.notify(Notice {
            message: "second".into(),
            severity: Severity::Warning,
            duration: std::time::Duration::from_secs(4),
        });

        let notices = notifier.take();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].message, "first");
        assert_eq!(notices[1].message, "second");
        assert!(notifier.notices().is_empty());
    }

    #[test]
    fn record_builder_variants() {
        let plain = RecordBuilder::named("ada").build();
        assert_eq!(plain.name, "ada");
        assert_eq!(plain.id, None);

        let badged = RecordBuilder::named("ada").with_id("badge-7").build();
        assert_eq!(badged.id.as_deref(), Some("badge-7"));

        let removal = RecordBuilder::named("ada").unchecking().build();
        assert!(removal.is_uncheck());
    }
}
