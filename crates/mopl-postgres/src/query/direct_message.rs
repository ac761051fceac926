//! Direct message repository.

use std::future::Future;

use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mopl_core::pagination::{CursorPage, PageRequest, finish};
use mopl_core::resource::{self, DirectMessageFilter, DirectMessageSortField};

use super::keyset::{keyset, timestamp_cursor};
use super::user::{UserRepository, summary_or_placeholder};
use crate::model::DirectMessage;
use crate::schema::direct_messages;
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY};

/// Repository for messages inside a conversation.
pub trait DirectMessageRepository {
    /// Lists one page of the messages a participant sent or received in a
    /// conversation.
    fn list_direct_messages_page(
        &mut self,
        request: &PageRequest<resource::DirectMessage>,
    ) -> impl Future<Output = PgResult<CursorPage<resource::DirectMessage>>> + Send;
}

fn filtered(filter: &DirectMessageFilter) -> direct_messages::BoxedQuery<'static, Pg> {
    direct_messages::table
        .filter(direct_messages::conversation_id.eq(filter.conversation_id))
        .filter(
            direct_messages::sender_id
                .eq(filter.participant_id)
                .or(direct_messages::receiver_id.eq(filter.participant_id)),
        )
        .into_boxed()
}

fn ordered(
    request: &PageRequest<resource::DirectMessage>,
) -> direct_messages::BoxedQuery<'static, Pg> {
    let query = filtered(&request.filter);
    let cursor = request.decoded_cursor();
    let direction = request.direction;

    match request.sort_by {
        DirectMessageSortField::CreatedAt => keyset!(
            query,
            direct_messages::created_at,
            direct_messages::id,
            direction,
            timestamp_cursor(cursor.as_ref())
        ),
    }
}

impl DirectMessageRepository for PgConnection {
    #[tracing::instrument(skip_all, target = TRACING_TARGET_QUERY)]
    async fn list_direct_messages_page(
        &mut self,
        request: &PageRequest<resource::DirectMessage>,
    ) -> PgResult<CursorPage<resource::DirectMessage>> {
        let total_count: i64 = filtered(&request.filter)
            .count()
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        let rows: Vec<DirectMessage> = ordered(request)
            .select(DirectMessage::as_select())
            .limit(i64::from(request.fetch_limit()))
            .load(self)
            .await
            .map_err(PgError::from)?;

        let mut user_ids: Vec<_> = rows
            .iter()
            .flat_map(|row| [row.sender_id, row.receiver_id])
            .collect();
        user_ids.sort_unstable();
        user_ids.dedup();
        let parties = self.find_user_summaries(&user_ids).await?;

        let records = rows
            .into_iter()
            .map(|row| {
                let sender = summary_or_placeholder(&parties, row.sender_id);
                let receiver = summary_or_placeholder(&parties, row.receiver_id);
                row.into_record(sender, receiver)
            })
            .collect();

        Ok(finish(records, request, total_count as u64))
    }
}
