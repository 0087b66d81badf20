//! Compile-time conditional profiling system.
//!
//! When the `profiling` feature is enabled, this module provides JSONL-based
//! event logging for performance analysis. When disabled, all functions are
//! no-ops with zero runtime cost.
//!
//! # Usage
//!
//! ```ignore
//! use memox9::profile_log;
//! use memox9::profiling::EventType;
//!
//! profile_log!(EventType::QueueBuilt {
//!     track: "facts".into(),
//!     length: 20
//! });
//! ```

#[cfg(feature = "profiling")]
mod event;
#[cfg(feature = "profiling")]
mod logger;

#[cfg(feature = "profiling")]
pub use event::*;
#[cfg(feature = "profiling")]
pub use logger::*;

#[cfg(not(feature = "profiling"))]
mod noop;
#[cfg(not(feature = "profiling"))]
pub use noop::*;

// Macros are defined here to be available at crate root

/// Log a profiling event.
///
/// When the `profiling` feature is disabled, this macro expands to nothing.
///
/// # Examples
///
/// ```ignore
/// profile_log!(EventType::PersistWrite {
///     key: "memox9_tables".into()
/// });
/// ```
#[cfg(feature = "profiling")]
#[macro_export]
macro_rules! profile_log {
    ($event_type:expr) => {
        $crate::profiling::log_event($event_type)
    };
}

#[cfg(not(feature = "profiling"))]
#[macro_export]
macro_rules! profile_log {
    ($($args:tt)*) => {};
}

/// Execute a block and log its duration.
///
/// When the `profiling` feature is disabled, this macro just executes the block.
///
/// # Examples
///
/// ```ignore
/// let queue = profile_scope!("build_fact_queue", {
///     srs::build_fact_queue(&facts, 20, mode, policy, now, &mut rng)
/// });
/// ```
#[cfg(feature = "profiling")]
#[macro_export]
macro_rules! profile_scope {
    ($name:expr, $body:block) => {{
        let _start = std::time::Instant::now();
        let result = $body;
        $crate::profiling::log_timed($name, _start.elapsed());
        result
    }};
}

#[cfg(not(feature = "profiling"))]
#[macro_export]
macro_rules! profile_scope {
    ($name:expr, $body:block) => {
        $body
    };
}
