//! Check-in submission pipeline with a durable retry queue.
//!
//! This crate implements the flow that takes a decoded identity record,
//! submits it to the remote recording service, and guarantees it is not
//! silently lost when the network or the service call fails.
//!
//! # Architecture
//!
//! One pass of the [`CheckInEngine`] handles the complete lifecycle:
//!
//! 1. **Load backlog** — the durable queue lazily materializes the
//!    persisted pending list
//! 2. **Guarded submission** — each record is POSTed with a time bound;
//!    timeouts and connection failures classify as retryable transport
//!    conditions
//! 3. **Report** — every outcome becomes a user-visible notice through the
//!    injected notification capability
//! 4. **Rewrite queue** — records that died in transport survive, in
//!    order, for the next explicit pass
//!
//! Records are processed strictly sequentially within a pass. Service-level
//! rejections are reported but never retried; only transport failures keep
//! a record in the queue.

pub mod client;
pub mod engine;
pub mod error;
pub mod guard;
pub mod queue;
pub mod report;
pub mod scan;

use std::time::Duration;

pub use client::{ClientConfig, RecordingClient};
pub use engine::{surviving_records, CheckInEngine, EngineConfig, RecordOutcome};
pub use error::{Result, SubmitError};
pub use guard::{with_network_error_guard, with_timeout, GuardOutcome};
pub use queue::{JsonFileStore, PendingQueue, QueueStore};
pub use report::{network_failure_notice, reply_notice, Notifier, TracingNotifier};
pub use scan::{record_from_scan, DebounceWindow};

/// Default time bound on each remote submission.
pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default width of the duplicate-scan suppression window.
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_secs(3);
