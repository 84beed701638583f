//! Domain models for check-in records and service replies.
//!
//! Defines the record that travels through the submission pipeline, the
//! tagged reply union the remote recording service's wire shape maps onto,
//! and the notice payload handed to the UI notification capability.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single check-in record awaiting submission.
///
/// Identity for de-duplication purposes is the `name` field; `id` is an
/// optional secondary identifier carried by scanned badges. Records marked
/// with [`RecordAction::Uncheck`] request removal rather than addition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Identity name; the de-duplication key.
    pub name: String,

    /// Optional badge identifier from the capture layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Present when the record means removal rather than addition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<RecordAction>,

    /// When the record entered the pipeline.
    #[serde(default = "Utc::now")]
    pub received_at: DateTime<Utc>,
}

impl Record {
    /// Creates a check-in record for `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), id: None, action: None, received_at: Utc::now() }
    }

    /// Creates a check-in record carrying a badge identifier.
    pub fn with_id(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self { id: Some(id.into()), ..Self::new(name) }
    }

    /// Creates a removal (uncheck) record for `name`.
    pub fn uncheck(name: impl Into<String>) -> Self {
        Self { action: Some(RecordAction::Uncheck), ..Self::new(name) }
    }

    /// Returns true when this record requests removal.
    pub fn is_uncheck(&self) -> bool {
        self.action == Some(RecordAction::Uncheck)
    }
}

/// Discriminator for records that mean something other than addition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordAction {
    /// Remove a previously recorded check-in.
    Uncheck,
}

impl RecordAction {
    /// Wire value used as the `action` query parameter.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Uncheck => "uncheck",
        }
    }
}

/// Acknowledgement from the recording service, as sent on the wire.
///
/// `message` is kept as a raw JSON value: the service is free to put
/// structured data there, and hard errors report it in serialized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireReply {
    /// Whether the service accepted the record.
    pub ok: bool,

    /// Service-provided message; usually a string, not guaranteed.
    pub message: serde_json::Value,

    /// Set when the service reports a failure.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,

    /// Disambiguates recoverable validation issues from hard errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
}

/// Wire code marking a recoverable validation issue.
pub const SOFT_WARNING_CODE: i64 = 1;

/// Classified acknowledgement from the recording service.
///
/// The ad-hoc `{ok, message, error?, code?}` wire shape collapses into
/// three explicit variants so downstream code never inspects optional
/// fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceReply {
    /// The record was accepted.
    Success {
        /// Service-provided confirmation text.
        message: String,
    },

    /// The service rejected the record with a recoverable validation issue.
    SoftWarning {
        /// Service-provided explanation.
        message: String,
        /// Wire code that marked the reply recoverable.
        code: i64,
    },

    /// The service rejected the record outright.
    HardError {
        /// Service message in serialized form, quotes and all, so
        /// structured payloads survive into the report.
        message: String,
    },
}

impl ServiceReply {
    /// Returns true for the success variant.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl From<WireReply> for ServiceReply {
    fn from(wire: WireReply) -> Self {
        if wire.ok {
            return Self::Success { message: text_of(&wire.message) };
        }
        match wire.code {
            Some(code) if wire.error && code == SOFT_WARNING_CODE => {
                Self::SoftWarning { message: text_of(&wire.message), code }
            },
            _ => Self::HardError { message: wire.message.to_string() },
        }
    }
}

/// Extracts display text from a wire message, falling back to the
/// serialized form for non-string payloads.
fn text_of(message: &serde_json::Value) -> String {
    match message.as_str() {
        Some(text) => text.to_owned(),
        None => message.to_string(),
    }
}

/// How urgently a notice should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The operation succeeded.
    Success,
    /// Something needs attention but the pipeline keeps going.
    Warning,
    /// The operation failed.
    Danger,
}

/// User-visible outcome handed to the notification capability.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    /// Text to present.
    pub message: String,
    /// Presentation urgency.
    pub severity: Severity,
    /// How long the notice should stay visible.
    pub duration: Duration,
}
