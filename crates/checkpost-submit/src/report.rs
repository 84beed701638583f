//! Outcome reporting: service replies translated into user-visible notices.
//!
//! The pipeline does not own any presentation; it consumes a [`Notifier`]
//! capability supplied by the interface layer and hands it [`Notice`]
//! values. Nothing else about a submission ever reaches the user.

use std::time::Duration;

use checkpost_core::models::{Notice, ServiceReply, Severity};
use tracing::{error, info, warn};

/// How long a routine notice stays visible.
pub const NOTICE_DURATION: Duration = Duration::from_secs(2);

/// Extended display duration for warnings the user should actually read.
pub const EXTENDED_NOTICE_DURATION: Duration = Duration::from_secs(4);

/// Notification capability consumed from the interface layer.
pub trait Notifier: Send + Sync {
    /// Presents one notice to the user.
    fn notify(&self, notice: Notice);
}

/// Translates a service reply into the notice to present.
///
/// Success and soft warnings surface the service's own message; hard
/// errors wrap the serialized message so structured rejections stay
/// legible.
pub fn reply_notice(reply: &ServiceReply) -> Notice {
    match reply {
        ServiceReply::Success { message } => Notice {
            message: message.clone(),
            severity: Severity::Success,
            duration: NOTICE_DURATION,
        },
        ServiceReply::SoftWarning { message, .. } => Notice {
            message: message.clone(),
            severity: Severity::Warning,
            duration: EXTENDED_NOTICE_DURATION,
        },
        ServiceReply::HardError { message } => Notice {
            message: format!("An error occurred: {message}"),
            severity: Severity::Danger,
            duration: NOTICE_DURATION,
        },
    }
}

/// The fixed notice for guard-classified network failures.
pub fn network_failure_notice() -> Notice {
    Notice {
        message: "A network error occurred".to_string(),
        severity: Severity::Warning,
        duration: EXTENDED_NOTICE_DURATION,
    }
}

/// Notice emitted when a duplicate submission was suppressed.
pub fn duplicate_submission_notice(name: &str) -> Notice {
    Notice {
        message: format!("{name} has already been checked in"),
        severity: Severity::Warning,
        duration: NOTICE_DURATION,
    }
}

/// Notifier that writes notices to the log stream.
///
/// Stands in for the toast presenter when the pipeline runs without a UI
/// attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.severity {
            Severity::Success => info!(message = %notice.message, "notice"),
            Severity::Warning => {
                warn!(message = %notice.message, duration_ms = notice.duration.as_millis(), "notice");
            },
            Severity::Danger => error!(message = %notice.message, "notice"),
        }
    }
}
