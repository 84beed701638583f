//! Foundational types and function-pipeline primitives.
//!
//! Provides the pure composition library used to assemble the submission
//! pipeline, the domain model for check-in records and service replies, and
//! the clock abstraction that keeps time-dependent behavior testable. All
//! other crates depend on these foundational pieces.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod fp;
pub mod models;
pub mod time;

pub use error::{CoreError, Result};
pub use models::{Notice, Record, RecordAction, ServiceReply, Severity, WireReply};
pub use time::{Clock, RealClock, TestClock};
