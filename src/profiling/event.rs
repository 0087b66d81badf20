//! Event types for profiling.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A profiling event with timestamp and optional duration.
#[derive(Serialize)]
pub struct ProfileEvent {
    pub timestamp: DateTime<Utc>,
    pub event_type: EventType,
    /// Duration in microseconds (for timed events)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_us: Option<u64>,
}

impl ProfileEvent {
    pub fn new(event_type: EventType) -> Self {
        Self {
            timestamp: Utc::now(),
            event_type,
            duration_us: None,
        }
    }

    pub fn with_duration(event_type: EventType, duration: std::time::Duration) -> Self {
        Self {
            duration_us: Some(duration.as_micros() as u64),
            ..Self::new(event_type)
        }
    }
}

/// Types of events that can be logged.
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventType {
    // === Profiler lifecycle ===
    ProfilerStart {
        run_id: String,
    },
    ProfilerEnd {
        total_events: u64,
    },

    // === Handler lifecycle ===
    /// HTTP handler started processing
    HandlerStart {
        /// Route path (e.g., "/api/session/answer")
        route: String,
        method: String,
    },

    // === Practice ===
    /// Scheduler produced a queue for a new session
    QueueBuilt {
        /// "facts" or "tables"
        track: String,
        length: usize,
    },
    /// An answer (or timeout) was recorded against mastery
    AnswerRecorded {
        /// Display label, e.g. "6 × 7"
        item: String,
        mode: String,
        is_correct: bool,
        timed_out: bool,
    },
    SessionComplete {
        track: String,
        correct: u32,
        total: u32,
    },

    // === Storage ===
    /// A progress blob was overwritten
    PersistWrite {
        key: String,
    },

    // === Timed scope ===
    TimedScope {
        name: String,
        duration_ms: u64,
    },
}
