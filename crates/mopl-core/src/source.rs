//! The contract every storage adapter implements.

use std::sync::Arc;

use async_trait::async_trait;

use crate::pagination::{CursorPage, PageRequest};
use crate::{Record, Result};

/// A back-end able to serve keyset pages of `R`.
///
/// Implementations must agree on ordering, tie-breaking, cursor text and
/// `hasNext` detection, so any two sources over the same logical dataset
/// page identically.
#[async_trait]
pub trait PageSource<R: Record>: Send + Sync {
    /// Fetches one page for `request`.
    ///
    /// # Errors
    ///
    /// Returns an error of the back-end's failure kind when the store cannot
    /// be queried. A request that matches nothing yields an empty page.
    async fn find_page(&self, request: &PageRequest<R>) -> Result<CursorPage<R>>;
}

#[async_trait]
impl<R, S> PageSource<R> for Arc<S>
where
    R: Record,
    S: PageSource<R> + ?Sized,
{
    async fn find_page(&self, request: &PageRequest<R>) -> Result<CursorPage<R>> {
        self.as_ref().find_page(request).await
    }
}

/// A type-erased, shareable page source.
pub type SharedPageSource<R> = Arc<dyn PageSource<R>>;
