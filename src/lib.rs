// only enables the `doc_cfg` feature when the `docsrs` configuration attribute is defined
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::unused_self)]
//! Process-wide logging configuration for services that consist of many named loggers.
//!
//! The application fixes, once at startup, a line format with a dynamic `{prefix}` token,
//! a minimal level and a set of sinks; every logger that is handed out by the
//! [`LoggerFactory`] is wired accordingly. This applies also to loggers that were
//! created before the configuration existed, and to loggers whose sinks are changed later.
//!
//! ```rust
//! use ds_common_logger::{extra, ConfigureOptions, Level};
//!
//! ds_common_logger::configure(
//!     ConfigureOptions::with_level(Level::Debug).prefix("checkout"),
//! );
//! let logger = ds_common_logger::get_logger("checkout.cart");
//! logger.info_with("item added", extra! { "sku" => "A-17", "qty" => 2 });
//! // [2024-05-01T10:00:00][checkout][checkout.cart][INFO][main.rs:7]: item added | extra: {"sku": "A-17", "qty": 2}
//! ```
//!
//! See
//!
//! * [`ProcessConfig`] for the configuration state and how changes reach the loggers,
//! * [`LoggerFactory::get_logger`] for how a logger gets its level and its sinks,
//! * [`ExtraFieldsFormatter`] for the line format and the rendering of extra fields,
//! * [`Loggable`] for giving a type its own logger,
//! * [`log_bridge`] for routing the records of the `log` facade,
//! * module [`sinks`] for the available sinks and how to write your own.
//!
//! Everything hangs off a [`LoggingContext`]. The free functions [`get_logger`] and
//! [`configure`] and the [`Loggable`] trait use the process-wide instance that is
//! returned by [`global`]; tests can use their own instances instead.
//!
//! Configuration changes are pushed onto the loggers one by one, without a lock around
//! the whole sequence. Concurrent calls of `configure`, `add_handler` or `set_prefix`
//! can thus leave some loggers updated and others not yet, while each single logger stays
//! consistent.

mod class_logger;
mod config;
mod context;
mod error;
mod extra;
mod factory;
mod formats;
mod level;
mod logger;
mod options;
mod record;
mod registry;
mod util;

pub mod error_info;
pub mod log_bridge;
pub mod sinks;

pub use crate::class_logger::{ClassLoggers, Loggable};
pub use crate::config::{ProcessConfig, Settings};
pub use crate::context::{configure, get_logger, global, LoggingContext};
pub use crate::error::LoggerError;
pub use crate::extra::{ExtraFields, ExtraValue};
pub use crate::factory::LoggerFactory;
pub use crate::formats::*;
pub use crate::level::Level;
pub use crate::logger::Logger;
pub use crate::options::{BasicConfig, ConfigureOptions, LEVEL_ENV_VAR};
pub use crate::record::Record;
pub use crate::registry::Registry;
