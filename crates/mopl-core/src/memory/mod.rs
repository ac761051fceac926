//! In-process storage and pagination.

mod source;
mod store;

pub use source::MemoryPageSource;
pub use store::MemoryStore;
