//! User repository.

use std::collections::HashMap;
use std::future::Future;

use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mopl_core::pagination::{CursorPage, DecodedCursor, PageRequest, finish};
use mopl_core::resource::{self, UserFilter, UserSortField, UserSummary};
use uuid::Uuid;

use super::keyset::{bool_cursor, contains_pattern, keyset, text_cursor, timestamp_cursor};
use crate::model::User;
use crate::schema::users;
use crate::types::UserRole;
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY};

/// Repository for user listing and lookups.
pub trait UserRepository {
    /// Lists one page of users matching the request filters.
    fn list_users_page(
        &mut self,
        request: &PageRequest<resource::User>,
    ) -> impl Future<Output = PgResult<CursorPage<resource::User>>> + Send;

    /// Loads the summaries of the given users, keyed by id.
    ///
    /// Unknown ids are absent from the map.
    fn find_user_summaries(
        &mut self,
        user_ids: &[Uuid],
    ) -> impl Future<Output = PgResult<HashMap<Uuid, UserSummary>>> + Send;
}

fn filtered(filter: &UserFilter) -> users::BoxedQuery<'static, Pg> {
    let mut query = users::table.into_boxed();

    if let Some(keyword) = filter.email_keyword() {
        query = query.filter(users::email.ilike(contains_pattern(keyword)));
    }
    if let Some(role) = filter.role_equal {
        query = query.filter(users::role.eq(UserRole::from(role)));
    }
    if let Some(locked) = filter.is_locked {
        query = query.filter(users::locked.eq(locked));
    }

    query
}

fn role_cursor(cursor: Option<&DecodedCursor>) -> Option<(UserRole, Uuid)> {
    let (text, id_after) = text_cursor(cursor)?;
    Some((text.parse().ok()?, id_after))
}

fn ordered(request: &PageRequest<resource::User>) -> users::BoxedQuery<'static, Pg> {
    let query = filtered(&request.filter);
    let cursor = request.decoded_cursor();
    let cursor = cursor.as_ref();
    let direction = request.direction;

    match request.sort_by {
        UserSortField::Name => {
            keyset!(query, users::name, users::id, direction, text_cursor(cursor))
        }
        UserSortField::Email => {
            keyset!(query, users::email, users::id, direction, text_cursor(cursor))
        }
        UserSortField::CreatedAt => keyset!(
            query,
            users::created_at,
            users::id,
            direction,
            timestamp_cursor(cursor)
        ),
        UserSortField::IsLocked => {
            keyset!(query, users::locked, users::id, direction, bool_cursor(cursor))
        }
        UserSortField::Role => {
            keyset!(query, users::role, users::id, direction, role_cursor(cursor))
        }
    }
}

impl UserRepository for PgConnection {
    #[tracing::instrument(skip_all, target = TRACING_TARGET_QUERY, fields(sort_by = ?request.sort_by))]
    async fn list_users_page(
        &mut self,
        request: &PageRequest<resource::User>,
    ) -> PgResult<CursorPage<resource::User>> {
        let total_count: i64 = filtered(&request.filter)
            .count()
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        let rows: Vec<User> = ordered(request)
            .select(User::as_select())
            .limit(i64::from(request.fetch_limit()))
            .load(self)
            .await
            .map_err(PgError::from)?;

        let records = rows.into_iter().map(resource::User::from).collect();
        Ok(finish(records, request, total_count as u64))
    }

    async fn find_user_summaries(
        &mut self,
        user_ids: &[Uuid],
    ) -> PgResult<HashMap<Uuid, UserSummary>> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<User> = users::table
            .filter(users::id.eq_any(user_ids))
            .select(User::as_select())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(rows.iter().map(|user| (user.id, user.summary())).collect())
    }
}

/// Looks up a summary, falling back to a nameless one when the user row is
/// gone.
pub(crate) fn summary_or_placeholder(
    summaries: &HashMap<Uuid, UserSummary>,
    user_id: Uuid,
) -> UserSummary {
    summaries.get(&user_id).cloned().unwrap_or_else(|| {
        tracing::warn!(
            target: TRACING_TARGET_QUERY,
            user_id = %user_id,
            "Referenced user not found"
        );
        UserSummary::new(user_id, "")
    })
}
