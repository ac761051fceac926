//! Content repository.

use std::future::Future;

use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mopl_core::pagination::{CursorPage, PageRequest, finish};
use mopl_core::resource::{self, ContentFilter, ContentSortField};
use uuid::Uuid;

use super::keyset::{contains_pattern, integer_cursor, keyset, real_cursor, timestamp_cursor};
use crate::model::Content;
use crate::schema::contents;
use crate::types::ContentType;
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY};

/// Repository for catalog content.
pub trait ContentRepository {
    /// Lists one page of live content matching the request filters.
    fn list_contents_page(
        &mut self,
        request: &PageRequest<resource::Content>,
    ) -> impl Future<Output = PgResult<CursorPage<resource::Content>>> + Send;

    /// Finds live content by id.
    fn find_content_by_id(
        &mut self,
        content_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<resource::Content>>> + Send;

    /// Loads every live content item, oldest first.
    ///
    /// Used to rebuild the search index.
    fn list_all_contents(
        &mut self,
    ) -> impl Future<Output = PgResult<Vec<resource::Content>>> + Send;
}

fn filtered(filter: &ContentFilter) -> contents::BoxedQuery<'static, Pg> {
    let mut query = contents::table
        .filter(contents::deleted_at.is_null())
        .into_boxed();

    if let Some(content_type) = filter.type_equal {
        query = query.filter(contents::content_type.eq(ContentType::from(content_type)));
    }
    if let Some(keyword) = filter.keyword() {
        let pattern = contains_pattern(keyword);
        query = query.filter(
            contents::title
                .ilike(pattern.clone())
                .or(contents::description.ilike(pattern)),
        );
    }

    query
}

fn ordered(request: &PageRequest<resource::Content>) -> contents::BoxedQuery<'static, Pg> {
    let query = filtered(&request.filter);
    let cursor = request.decoded_cursor();
    let cursor = cursor.as_ref();
    let direction = request.direction;

    match request.sort_by {
        ContentSortField::CreatedAt => keyset!(
            query,
            contents::created_at,
            contents::id,
            direction,
            timestamp_cursor(cursor)
        ),
        ContentSortField::WatcherCount => keyset!(
            query,
            contents::review_count,
            contents::id,
            direction,
            integer_cursor(cursor)
        ),
        ContentSortField::Rate => keyset!(
            query,
            contents::average_rating,
            contents::id,
            direction,
            real_cursor(cursor)
        ),
        ContentSortField::Popularity => keyset!(
            query,
            contents::popularity_score,
            contents::id,
            direction,
            real_cursor(cursor)
        ),
    }
}

impl ContentRepository for PgConnection {
    #[tracing::instrument(skip_all, target = TRACING_TARGET_QUERY, fields(sort_by = ?request.sort_by))]
    async fn list_contents_page(
        &mut self,
        request: &PageRequest<resource::Content>,
    ) -> PgResult<CursorPage<resource::Content>> {
        let total_count: i64 = filtered(&request.filter)
            .count()
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        let rows: Vec<Content> = ordered(request)
            .select(Content::as_select())
            .limit(i64::from(request.fetch_limit()))
            .load(self)
            .await
            .map_err(PgError::from)?;

        let records = rows.into_iter().map(resource::Content::from).collect();
        Ok(finish(records, request, total_count as u64))
    }

    async fn find_content_by_id(
        &mut self,
        content_id: Uuid,
    ) -> PgResult<Option<resource::Content>> {
        let row = contents::table
            .filter(contents::id.eq(content_id))
            .filter(contents::deleted_at.is_null())
            .select(Content::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(row.map(resource::Content::from))
    }

    async fn list_all_contents(&mut self) -> PgResult<Vec<resource::Content>> {
        let rows: Vec<Content> = contents::table
            .filter(contents::deleted_at.is_null())
            .select(Content::as_select())
            .order((contents::created_at.asc(), contents::id.asc()))
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(rows.into_iter().map(resource::Content::from).collect())
    }
}
