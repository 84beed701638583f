//! Capture-layer boundary: decoded scan payloads and duplicate suppression.
//!
//! The capture layer hands the pipeline raw decoded strings, each
//! optionally carrying `name`/`id` fields encoded as query-style
//! parameters. A payload with neither field produces no record and no
//! feedback. Repeated scans of the same badge arrive in bursts, so a small
//! clock-driven window suppresses resubmission of a name seen moments ago.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use checkpost_core::{Clock, Record};
use tracing::debug;

/// Extracts one query-style parameter from a decoded payload.
///
/// Percent-encoding and `+`-for-space are undone. The first occurrence
/// wins.
pub fn query_param(query: &str, key: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, value)| value.into_owned())
}

/// Parses a decoded scan payload into a check-in record.
///
/// Payloads may be bare parameter strings (`name=ada&id=7`) or full URLs
/// whose query carries the fields; everything after the last `?` is
/// parsed. Returns `None` when neither `name` nor `id` is present — such
/// scans are ignored without feedback. A payload carrying only an `id`
/// uses it as the identity name, matching badges that encode a single
/// value.
pub fn record_from_scan(payload: &str) -> Option<Record> {
    let query = match payload.rsplit_once('?') {
        Some((_, query)) => query,
        None => payload,
    };

    let name = query_param(query, "name");
    let id = query_param(query, "id");

    match (name, id) {
        (None, None) => {
            debug!(payload, "scan carried neither name nor id, ignoring");
            None
        },
        (Some(name), Some(id)) => Some(Record::with_id(name, id)),
        (Some(name), None) => Some(Record::new(name)),
        (None, Some(id)) => Some(Record::with_id(id.clone(), id)),
    }
}

/// Suppresses duplicate submissions of the same name within a window.
///
/// A name's window refreshes every time it is seen, so a badge held in
/// front of the scanner stays suppressed until it has been away for the
/// full window.
pub struct DebounceWindow {
    clock: Arc<dyn Clock>,
    window: Duration,
    seen: HashMap<String, Instant>,
}

impl DebounceWindow {
    /// Creates a window of the given width.
    pub fn new(clock: Arc<dyn Clock>, window: Duration) -> Self {
        Self { clock, window, seen: HashMap::new() }
    }

    /// Records a sighting of `name` and reports whether it should be
    /// submitted.
    ///
    /// Returns `false` (and refreshes the window) when the name was seen
    /// less than a window ago.
    pub fn should_submit(&mut self, name: &str) -> bool {
        let now = self.clock.now();
        self.seen.retain(|_, deadline| *deadline > now);

        let suppressed = self.seen.contains_key(name);
        self.seen.insert(name.to_string(), now + self.window);
        !suppressed
    }
}
