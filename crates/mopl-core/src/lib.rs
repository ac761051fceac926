#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for cursor decoding and page assembly.
pub const TRACING_TARGET_PAGINATION: &str = "mopl_core::pagination";

mod backend;
mod error;
mod record;
mod source;

pub mod memory;
pub mod pagination;
pub mod prelude;
pub mod resource;
pub mod sort;

pub use backend::{Backend, BackendsConfig};
pub use error::{BoxedError, Error, ErrorKind, Result};
pub use record::{PageDefaults, Record, RecordFilter, contains_ignore_case, normalize_keyword};
pub use source::{PageSource, SharedPageSource};
