//! Conversation repository.
//!
//! A conversation has no participant columns of its own; its participants
//! are the users holding a read status in it.

use std::collections::HashMap;
use std::future::Future;

use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mopl_core::pagination::{CursorPage, PageRequest, finish};
use mopl_core::resource::{self, ConversationFilter, ConversationSortField, UserSummary};
use uuid::Uuid;

use super::keyset::{contains_pattern, keyset, timestamp_cursor};
use crate::model::{Conversation, User};
use crate::schema::{conversations, read_statuses, users};
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY};

/// Repository for two-party conversations.
pub trait ConversationRepository {
    /// Lists one page of the conversations a user takes part in.
    fn list_conversations_page(
        &mut self,
        request: &PageRequest<resource::Conversation>,
    ) -> impl Future<Output = PgResult<CursorPage<resource::Conversation>>> + Send;

    /// Finds the conversation shared by two users, if any.
    fn find_conversation_by_participants(
        &mut self,
        user_id: Uuid,
        with_user_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<resource::Conversation>>> + Send;

    /// Loads the participants of the given conversations, keyed by
    /// conversation id.
    fn find_conversation_participants(
        &mut self,
        conversation_ids: &[Uuid],
    ) -> impl Future<Output = PgResult<HashMap<Uuid, Vec<UserSummary>>>> + Send;
}

fn filtered(filter: &ConversationFilter) -> conversations::BoxedQuery<'static, Pg> {
    let joined = read_statuses::table
        .filter(read_statuses::participant_id.eq(filter.participant_id))
        .select(read_statuses::conversation_id);

    let mut query = conversations::table
        .filter(conversations::id.eq_any(joined))
        .into_boxed();

    if let Some(keyword) = filter.keyword() {
        let matching = read_statuses::table
            .inner_join(users::table)
            .filter(read_statuses::participant_id.ne(filter.participant_id))
            .filter(users::name.ilike(contains_pattern(keyword)))
            .select(read_statuses::conversation_id);
        query = query.filter(conversations::id.eq_any(matching));
    }

    query
}

fn ordered(
    request: &PageRequest<resource::Conversation>,
) -> conversations::BoxedQuery<'static, Pg> {
    let query = filtered(&request.filter);
    let cursor = request.decoded_cursor();
    let direction = request.direction;

    match request.sort_by {
        ConversationSortField::CreatedAt => keyset!(
            query,
            conversations::created_at,
            conversations::id,
            direction,
            timestamp_cursor(cursor.as_ref())
        ),
    }
}

impl ConversationRepository for PgConnection {
    #[tracing::instrument(skip_all, target = TRACING_TARGET_QUERY)]
    async fn list_conversations_page(
        &mut self,
        request: &PageRequest<resource::Conversation>,
    ) -> PgResult<CursorPage<resource::Conversation>> {
        let total_count: i64 = filtered(&request.filter)
            .count()
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        let rows: Vec<Conversation> = ordered(request)
            .select(Conversation::as_select())
            .limit(i64::from(request.fetch_limit()))
            .load(self)
            .await
            .map_err(PgError::from)?;

        let conversation_ids: Vec<_> = rows.iter().map(|row| row.id).collect();
        let mut participants = self.find_conversation_participants(&conversation_ids).await?;

        let records = rows
            .into_iter()
            .map(|row| {
                let members = participants.remove(&row.id).unwrap_or_default();
                row.into_record(members)
            })
            .collect();

        Ok(finish(records, request, total_count as u64))
    }

    #[tracing::instrument(skip(self), target = TRACING_TARGET_QUERY)]
    async fn find_conversation_by_participants(
        &mut self,
        user_id: Uuid,
        with_user_id: Uuid,
    ) -> PgResult<Option<resource::Conversation>> {
        let with_user = read_statuses::table
            .filter(read_statuses::participant_id.eq(with_user_id))
            .select(read_statuses::conversation_id);

        let row: Option<Conversation> = conversations::table
            .filter(
                conversations::id.eq_any(
                    read_statuses::table
                        .filter(read_statuses::participant_id.eq(user_id))
                        .select(read_statuses::conversation_id),
                ),
            )
            .filter(conversations::id.eq_any(with_user))
            .select(Conversation::as_select())
            .order((conversations::created_at.asc(), conversations::id.asc()))
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut participants = self.find_conversation_participants(&[row.id]).await?;
        let members = participants.remove(&row.id).unwrap_or_default();
        Ok(Some(row.into_record(members)))
    }

    async fn find_conversation_participants(
        &mut self,
        conversation_ids: &[Uuid],
    ) -> PgResult<HashMap<Uuid, Vec<UserSummary>>> {
        if conversation_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(Uuid, User)> = read_statuses::table
            .inner_join(users::table)
            .filter(read_statuses::conversation_id.eq_any(conversation_ids))
            .order((read_statuses::created_at.asc(), read_statuses::id.asc()))
            .select((read_statuses::conversation_id, User::as_select()))
            .load(self)
            .await
            .map_err(PgError::from)?;

        let mut participants: HashMap<Uuid, Vec<UserSummary>> = HashMap::new();
        for (conversation_id, user) in rows {
            participants
                .entry(conversation_id)
                .or_default()
                .push(user.summary());
        }

        Ok(participants)
    }
}
