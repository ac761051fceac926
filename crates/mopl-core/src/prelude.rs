//! Convenient re-exports for common use.

pub use crate::error::{BoxedError, Error, ErrorKind, Result};
pub use crate::pagination::{CursorPage, PageQuery, PageRequest};
pub use crate::record::{Record, RecordFilter};
pub use crate::sort::{SortDirection, SortField, SortValue};
pub use crate::source::{PageSource, SharedPageSource};
