//! [`PageSource`] implementations backed by the repositories.

use async_trait::async_trait;
use mopl_core::pagination::{CursorPage, PageRequest};
use mopl_core::resource::{
    Content, Conversation, DirectMessage, Notification, Playlist, Review, User,
};
use mopl_core::{PageSource, Result};

use crate::PgClient;
use crate::query::{
    ContentRepository, ConversationRepository, DirectMessageRepository, NotificationRepository,
    PlaylistRepository, ReviewRepository, UserRepository,
};

/// Serves every relational resource from one connection pool.
///
/// Each page takes one pooled connection for its count and fetch queries.
#[derive(Debug, Clone)]
pub struct PgPageSource {
    client: PgClient,
}

impl PgPageSource {
    pub fn new(client: PgClient) -> Self {
        Self { client }
    }

    #[inline]
    pub fn client(&self) -> &PgClient {
        &self.client
    }
}

macro_rules! impl_page_source {
    ($($record:ty => $method:ident),+ $(,)?) => {$(
        #[async_trait]
        impl PageSource<$record> for PgPageSource {
            async fn find_page(&self, request: &PageRequest<$record>) -> Result<CursorPage<$record>> {
                let mut conn = self.client.get_connection().await?;
                Ok(conn.$method(request).await?)
            }
        }
    )+};
}

impl_page_source! {
    User => list_users_page,
    Content => list_contents_page,
    Review => list_reviews_page,
    Notification => list_notifications_page,
    Playlist => list_playlists_page,
    Conversation => list_conversations_page,
    DirectMessage => list_direct_messages_page,
}
