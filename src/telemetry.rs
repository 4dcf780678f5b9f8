//! Application telemetry events and sinks.
//!
//! Junket talks to a remote storefront, so it records lightweight
//! operational signals (listing latency, submissions, moderation actions and
//! upload failures) to support debugging. Nothing is transmitted anywhere.

use std::io;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A structured telemetry event emitted by Junket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// A review listing finished loading.
    ReviewsLoaded {
        /// Listing source, e.g. `HOTEL h-1` or `flagged`.
        source: String,
        /// Number of reviews returned.
        count: usize,
        /// Round-trip latency in milliseconds.
        latency_ms: u64,
    },
    /// A review was created.
    ReviewSubmitted {
        /// Reviewed target.
        target_id: String,
        /// Number of photos attached.
        photo_count: usize,
    },
    /// A reply was posted.
    ReplyPosted {
        /// Review replied to.
        review_id: String,
        /// Wire role of the reply author.
        role: String,
    },
    /// A helpful vote was recorded.
    HelpfulMarked {
        /// Review voted on.
        review_id: String,
    },
    /// A review was flagged for moderation.
    ReviewFlagged {
        /// Flagged review.
        review_id: String,
    },
    /// An administrator removed a review.
    ReviewRemoved {
        /// Removed review.
        review_id: String,
    },
    /// An administrator declined the removal confirmation.
    RemovalCancelled {
        /// Review that was kept.
        review_id: String,
    },
    /// An image upload failed and aborted a submission.
    ImageUploadFailed {
        /// Images uploaded before the failure.
        uploaded: usize,
        /// Images attached to the draft.
        total: usize,
    },
}

/// A sink that can record telemetry events.
pub trait TelemetrySink: Send + Sync {
    /// Records a telemetry event.
    fn record(&self, event: TelemetryEvent);
}

/// Telemetry sink that drops all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetrySink;

impl TelemetrySink for NoopTelemetrySink {
    fn record(&self, _event: TelemetryEvent) {}
}

/// Records telemetry events to stderr as JSON lines (JSONL).
///
/// This is intended for local debugging and is not transmitted anywhere.
#[derive(Debug, Default)]
pub struct StderrJsonlTelemetrySink;

impl TelemetrySink for StderrJsonlTelemetrySink {
    fn record(&self, event: TelemetryEvent) {
        let Ok(serialised) = serde_json::to_string(&event) else {
            return;
        };

        let _ignored = writeln_stderr(&serialised);
    }
}

fn writeln_stderr(message: &str) -> io::Result<()> {
    use io::Write;

    let mut stderr = io::stderr().lock();
    writeln!(stderr, "{message}")
}

/// Converts an elapsed duration to whole milliseconds, saturating.
#[must_use]
pub fn duration_to_millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// In-memory sinks for asserting on recorded events.
#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    use std::sync::Mutex;

    use super::{TelemetryEvent, TelemetrySink};

    /// Telemetry sink that keeps every event in memory.
    #[derive(Debug, Default)]
    pub struct RecordingTelemetrySink {
        events: Mutex<Vec<TelemetryEvent>>,
    }

    impl RecordingTelemetrySink {
        /// Returns a copy of the events recorded so far.
        #[must_use]
        pub fn events(&self) -> Vec<TelemetryEvent> {
            self.events
                .lock()
                .map(|events| events.clone())
                .unwrap_or_default()
        }

        /// Drains and returns the recorded events.
        #[must_use]
        pub fn take(&self) -> Vec<TelemetryEvent> {
            self.events
                .lock()
                .map(|mut events| events.drain(..).collect())
                .unwrap_or_default()
        }
    }

    impl TelemetrySink for RecordingTelemetrySink {
        fn record(&self, event: TelemetryEvent) {
            if let Ok(mut events) = self.events.lock() {
                events.push(event);
            }
        }
    }
}
