//! Contains the trait [`Sink`] for destinations of log lines,
//! and three concrete implementations:
//! [`StreamSink`] for `stdout`, `stderr` or any other writer,
//! [`FileSink`] for appending to a file,
//! and [`MemorySink`] for keeping the lines in memory, which is mainly useful in tests.
//!
//! You can also use your own implementations of [`Sink`].
//!
//! Sinks are shared as [`SharedSink`]s, i.e. as `Arc<dyn Sink>`.
//! The same sink can be attached to many loggers and to the process configuration at the
//! same time. Sinks are identified by the allocation they live in, not by their settings:
//! attaching the same `Arc` twice to a logger has no effect, while two distinct sinks with
//! identical settings are independent of each other.
//!
//! ```rust
//! use ds_common_logger::sinks::{same_sink, MemorySink, SharedSink, StreamSink};
//! use std::sync::Arc;
//!
//! let memory = Arc::new(MemorySink::new());
//! let a: SharedSink = memory.clone();
//! let b: SharedSink = memory;
//! let c: SharedSink = Arc::new(StreamSink::stdout());
//! assert!(same_sink(&a, &b));
//! assert!(!same_sink(&a, &c));
//! ```

mod file_sink;
mod memory_sink;
mod sink;
mod std_stream;
mod stream_sink;

pub use self::file_sink::FileSink;
pub use self::memory_sink::MemorySink;
pub use self::sink::{Sink, SinkState};
pub use self::stream_sink::StreamSink;

use std::sync::Arc;

/// A sink as it is shared between loggers and the process configuration.
pub type SharedSink = Arc<dyn Sink>;

/// `true` if both handles point to the same sink.
#[must_use]
pub fn same_sink(a: &SharedSink, b: &SharedSink) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
