//! JSONL file logger for profiling events.

use std::fs::{create_dir_all, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;

use super::event::{EventType, ProfileEvent};

/// Global logger instance - must be initialized via init().
static LOGGER: Mutex<Option<ProfileLogger>> = Mutex::new(None);

static EVENT_COUNT: AtomicU64 = AtomicU64::new(0);

/// Writes events to `<DATA_DIR>/profile_<run>.jsonl`.
pub struct ProfileLogger {
    writer: BufWriter<File>,
    run_id: String,
}

impl ProfileLogger {
    fn new() -> std::io::Result<Self> {
        let run_id = Utc::now().format("%Y%m%d_%H%M%S").to_string();
        let dir = crate::paths::profile_dir();
        create_dir_all(&dir)?;
        let filename = format!("{}/profile_{}.jsonl", dir, run_id);

        let file = OpenOptions::new().create(true).append(true).open(&filename)?;
        tracing::info!("Profiling enabled: writing to {}", filename);

        Ok(Self {
            writer: BufWriter::new(file),
            run_id,
        })
    }

    fn log(&mut self, event: ProfileEvent) {
        if let Ok(json) = serde_json::to_string(&event) {
            let _ = writeln!(self.writer, "{}", json);
            // Flush every 100 events
            if EVENT_COUNT.load(Ordering::Relaxed) % 100 == 0 {
                let _ = self.writer.flush();
            }
            tracing::trace!(target: "memox9::profile", "{}", json);
        }
        EVENT_COUNT.fetch_add(1, Ordering::Relaxed);
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }
}

/// A panic while logging leaves the logger usable
fn lock() -> MutexGuard<'static, Option<ProfileLogger>> {
    LOGGER.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Initialize the profiler. Call this from main() before any logging.
pub fn init() {
    let mut guard = lock();
    if guard.is_some() {
        tracing::warn!("Profiler already initialized");
        return;
    }

    match ProfileLogger::new() {
        Ok(logger) => {
            let run_id = logger.run_id.clone();
            *guard = Some(logger);
            drop(guard); // Release lock before logging
            log_event(EventType::ProfilerStart { run_id });
        }
        Err(e) => {
            tracing::error!("Failed to initialize profiler: {}", e);
        }
    }
}

/// Flush remaining events and close the log file.
pub fn shutdown() {
    let total_events = EVENT_COUNT.load(Ordering::Relaxed);
    log_event(EventType::ProfilerEnd { total_events });

    let mut guard = lock();
    if let Some(ref mut logger) = *guard {
        logger.flush();
        tracing::info!("Profiling ended: {} events logged", total_events);
    }
    *guard = None;
}

fn write(event: ProfileEvent) {
    if let Some(ref mut logger) = *lock() {
        logger.log(event);
    }
}

pub fn log_event(event_type: EventType) {
    write(ProfileEvent::new(event_type));
}

/// Log a timed scope completion.
pub fn log_timed(name: &str, duration: Duration) {
    write(ProfileEvent::with_duration(
        EventType::TimedScope {
            name: name.to_string(),
            duration_ms: duration.as_millis() as u64,
        },
        duration,
    ));
}
