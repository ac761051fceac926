//! Review repository.

use std::future::Future;

use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mopl_core::pagination::{CursorPage, PageRequest, finish};
use mopl_core::resource::{self, ReviewFilter, ReviewSortField};

use super::keyset::{keyset, real_cursor, timestamp_cursor};
use super::user::{UserRepository, summary_or_placeholder};
use crate::model::Review;
use crate::schema::{contents, reviews};
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY};

/// Repository for content reviews.
pub trait ReviewRepository {
    /// Lists one page of live reviews on live content.
    fn list_reviews_page(
        &mut self,
        request: &PageRequest<resource::Review>,
    ) -> impl Future<Output = PgResult<CursorPage<resource::Review>>> + Send;
}

fn filtered(filter: &ReviewFilter) -> reviews::BoxedQuery<'static, Pg> {
    let live_contents = contents::table
        .filter(contents::deleted_at.is_null())
        .select(contents::id);

    let mut query = reviews::table
        .filter(reviews::deleted_at.is_null())
        .filter(reviews::content_id.eq_any(live_contents))
        .into_boxed();

    if let Some(content_id) = filter.content_id {
        query = query.filter(reviews::content_id.eq(content_id));
    }

    query
}

fn ordered(request: &PageRequest<resource::Review>) -> reviews::BoxedQuery<'static, Pg> {
    let query = filtered(&request.filter);
    let cursor = request.decoded_cursor();
    let cursor = cursor.as_ref();
    let direction = request.direction;

    match request.sort_by {
        ReviewSortField::CreatedAt => keyset!(
            query,
            reviews::created_at,
            reviews::id,
            direction,
            timestamp_cursor(cursor)
        ),
        ReviewSortField::Rating => keyset!(
            query,
            reviews::rating,
            reviews::id,
            direction,
            real_cursor(cursor)
        ),
    }
}

impl ReviewRepository for PgConnection {
    #[tracing::instrument(skip_all, target = TRACING_TARGET_QUERY, fields(sort_by = ?request.sort_by))]
    async fn list_reviews_page(
        &mut self,
        request: &PageRequest<resource::Review>,
    ) -> PgResult<CursorPage<resource::Review>> {
        let total_count: i64 = filtered(&request.filter)
            .count()
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        let rows: Vec<Review> = ordered(request)
            .select(Review::as_select())
            .limit(i64::from(request.fetch_limit()))
            .load(self)
            .await
            .map_err(PgError::from)?;

        let author_ids: Vec<_> = rows.iter().map(|row| row.author_id).collect();
        let authors = self.find_user_summaries(&author_ids).await?;

        let records = rows
            .into_iter()
            .map(|row| {
                let author = summary_or_placeholder(&authors, row.author_id);
                row.into_record(author)
            })
            .collect();

        Ok(finish(records, request, total_count as u64))
    }
}
