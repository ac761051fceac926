//! Content paging and index maintenance.

mod document;
mod index;
mod query;
mod source;

pub use document::ContentDocument;
pub use index::{ContentIndex, IndexInit};
pub use query::{
    IndexField, SearchAfter, SearchHit, SearchHits, SearchQuery, SearchResponse, SortOrder,
    TotalHits,
};
pub use source::ContentSearchSource;
