//! Notification repository.

use std::future::Future;

use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mopl_core::pagination::{CursorPage, PageRequest, finish};
use mopl_core::resource::{self, NotificationFilter, NotificationSortField};
use uuid::Uuid;

use super::keyset::{keyset, timestamp_cursor};
use crate::model::Notification;
use crate::schema::notifications;
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY};

/// Repository for user notifications.
pub trait NotificationRepository {
    /// Lists one page of undismissed notifications.
    fn list_notifications_page(
        &mut self,
        request: &PageRequest<resource::Notification>,
    ) -> impl Future<Output = PgResult<CursorPage<resource::Notification>>> + Send;

    /// Lists every undismissed notification of a receiver with an id greater
    /// than `id_after`, in id order.
    ///
    /// Used to replay notifications missed by a reconnecting client. Ids are
    /// time-ordered UUIDs, so id order is delivery order.
    fn list_notifications_after_id(
        &mut self,
        receiver_id: Uuid,
        id_after: Option<Uuid>,
    ) -> impl Future<Output = PgResult<Vec<resource::Notification>>> + Send;
}

fn filtered(filter: &NotificationFilter) -> notifications::BoxedQuery<'static, Pg> {
    let mut query = notifications::table
        .filter(notifications::deleted_at.is_null())
        .into_boxed();

    if let Some(receiver_id) = filter.receiver_id {
        query = query.filter(notifications::receiver_id.eq(receiver_id));
    }

    query
}

fn ordered(
    request: &PageRequest<resource::Notification>,
) -> notifications::BoxedQuery<'static, Pg> {
    let query = filtered(&request.filter);
    let cursor = request.decoded_cursor();
    let direction = request.direction;

    match request.sort_by {
        NotificationSortField::CreatedAt => keyset!(
            query,
            notifications::created_at,
            notifications::id,
            direction,
            timestamp_cursor(cursor.as_ref())
        ),
    }
}

impl NotificationRepository for PgConnection {
    #[tracing::instrument(skip_all, target = TRACING_TARGET_QUERY)]
    async fn list_notifications_page(
        &mut self,
        request: &PageRequest<resource::Notification>,
    ) -> PgResult<CursorPage<resource::Notification>> {
        let total_count: i64 = filtered(&request.filter)
            .count()
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        let rows: Vec<Notification> = ordered(request)
            .select(Notification::as_select())
            .limit(i64::from(request.fetch_limit()))
            .load(self)
            .await
            .map_err(PgError::from)?;

        let records = rows.into_iter().map(resource::Notification::from).collect();
        Ok(finish(records, request, total_count as u64))
    }

    #[tracing::instrument(skip(self), target = TRACING_TARGET_QUERY)]
    async fn list_notifications_after_id(
        &mut self,
        receiver_id: Uuid,
        id_after: Option<Uuid>,
    ) -> PgResult<Vec<resource::Notification>> {
        let mut query = notifications::table
            .filter(notifications::receiver_id.eq(receiver_id))
            .filter(notifications::deleted_at.is_null())
            .into_boxed();

        if let Some(id_after) = id_after {
            query = query.filter(notifications::id.gt(id_after));
        }

        let rows: Vec<Notification> = query
            .select(Notification::as_select())
            .order(notifications::id.asc())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(rows.into_iter().map(resource::Notification::from).collect())
    }
}
