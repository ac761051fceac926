//! Sorting vocabulary shared by all adapters.

mod compare;
mod direction;
mod field;
mod value;

pub use compare::{compare_keys, compare_nullable, compare_records, sort_records};
pub use direction::SortDirection;
pub use field::SortField;
pub use value::{SortValue, SortValueKind};
