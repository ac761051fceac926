//! Keyset pagination protocol shared by every adapter.
//!
//! A request carries an optional cursor `(value, idAfter)` taken from the
//! last record of the previous page. Adapters either push the cursor down to
//! their store and call [`finish`], or hand a fully sorted candidate
//! sequence to [`assemble`].

mod assembler;
mod cursor;
mod page;
mod request;

pub use assembler::{assemble, finish};
pub use cursor::{Cursor, DecodedCursor};
pub use page::CursorPage;
pub use request::{MAX_LIMIT, PageQuery, PageRequest};
