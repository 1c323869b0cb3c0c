//! Error codes of `ds_common_logger`.
//!
//! Errors that occur while a log line is emitted cannot be returned to the code that
//! issued the log call. They are instead printed to `stderr`, together with one of the
//! following error codes. More details on them can be found here.
//!
//! ## `Write`
//!
//! Writing the log line to a sink failed.
//!
//! Example:
//!
//! ```text
//! [ds_common_logger][ERRCODE::Write] writing log line to sink failed, caused by ...
//! ```
//!
//! Possible reasons depend on the sink. A [`FileSink`](crate::sinks::FileSink) that was
//! closed with [`Sink::close`](crate::sinks::Sink::close) but is still attached to some
//! logger reports this error for every line it is asked to write.
//!
//! ## `Flush`
//!
//! Explicit flushing of a sink failed.
//!
//! Example:
//!
//! ```text
//! [ds_common_logger][ERRCODE::Flush] flushing sink failed, caused by ...
//! ```
//!
//! ## `Format`
//!
//! A [`FormatFunction`](crate::FormatFunction) had returned an error.
//! The part of the line that was produced before the error is still written.
//!
//! The [`ExtraFieldsFormatter`](crate::ExtraFieldsFormatter) never produces this error;
//! extra fields that cannot be serialized as JSON are rendered in their textual form instead.
//!
//! ## `Poison`
//!
//! Log entries can be written by all threads of your program. Loggers and sinks thus must be
//! thread-safe, by keeping their mutable parts in `Mutex`es and `RwLock`s. In case that a thread
//! panics while owning one of these locks, the lock is subsequently considered "poisoned".
//!
//! `ds_common_logger` continues to use the poisoned state and reports this error.
//! Most likely the root cause for this is some panic! in a custom [`Sink`](crate::sinks::Sink)
//! or in a custom format function.
