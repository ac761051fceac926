//! Playlist repository.

use std::future::Future;

use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mopl_core::pagination::{CursorPage, PageRequest, finish};
use mopl_core::resource::{self, PlaylistFilter, PlaylistSortField};

use super::keyset::{contains_pattern, integer_cursor, keyset, timestamp_cursor};
use super::user::{UserRepository, summary_or_placeholder};
use crate::model::Playlist;
use crate::schema::{playlist_subscribers, playlists};
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY};

/// Repository for user playlists.
pub trait PlaylistRepository {
    /// Lists one page of live playlists matching the request filters.
    fn list_playlists_page(
        &mut self,
        request: &PageRequest<resource::Playlist>,
    ) -> impl Future<Output = PgResult<CursorPage<resource::Playlist>>> + Send;
}

fn filtered(filter: &PlaylistFilter) -> playlists::BoxedQuery<'static, Pg> {
    let mut query = playlists::table
        .filter(playlists::deleted_at.is_null())
        .into_boxed();

    if let Some(keyword) = filter.keyword() {
        let pattern = contains_pattern(keyword);
        query = query.filter(
            playlists::title
                .ilike(pattern.clone())
                .or(playlists::description.ilike(pattern)),
        );
    }
    if let Some(owner_id) = filter.owner_id_equal {
        query = query.filter(playlists::owner_id.eq(owner_id));
    }
    if let Some(subscriber_id) = filter.subscriber_id_equal {
        query = query.filter(
            playlists::id.eq_any(
                playlist_subscribers::table
                    .filter(playlist_subscribers::user_id.eq(subscriber_id))
                    .select(playlist_subscribers::playlist_id),
            ),
        );
    }

    query
}

fn ordered(request: &PageRequest<resource::Playlist>) -> playlists::BoxedQuery<'static, Pg> {
    let query = filtered(&request.filter);
    let cursor = request.decoded_cursor();
    let cursor = cursor.as_ref();
    let direction = request.direction;

    match request.sort_by {
        PlaylistSortField::UpdatedAt => keyset!(
            query,
            playlists::updated_at,
            playlists::id,
            direction,
            timestamp_cursor(cursor)
        ),
        PlaylistSortField::SubscribeCount => keyset!(
            query,
            playlists::subscriber_count,
            playlists::id,
            direction,
            integer_cursor(cursor)
        ),
    }
}

impl PlaylistRepository for PgConnection {
    #[tracing::instrument(skip_all, target = TRACING_TARGET_QUERY, fields(sort_by = ?request.sort_by))]
    async fn list_playlists_page(
        &mut self,
        request: &PageRequest<resource::Playlist>,
    ) -> PgResult<CursorPage<resource::Playlist>> {
        let total_count: i64 = filtered(&request.filter)
            .count()
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        let rows: Vec<Playlist> = ordered(request)
            .select(Playlist::as_select())
            .limit(i64::from(request.fetch_limit()))
            .load(self)
            .await
            .map_err(PgError::from)?;

        let owner_ids: Vec<_> = rows.iter().map(|row| row.owner_id).collect();
        let owners = self.find_user_summaries(&owner_ids).await?;

        let records = rows
            .into_iter()
            .map(|row| {
                let owner = summary_or_placeholder(&owners, row.owner_id);
                row.into_record(owner)
            })
            .collect();

        Ok(finish(records, request, total_count as u64))
    }
}
