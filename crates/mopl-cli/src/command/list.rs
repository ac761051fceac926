use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Args, ValueEnum};
use mopl_core::pagination::{CursorPage, PageQuery, PageRequest};
use mopl_core::resource::{
    Content, Conversation, DirectMessage, Notification, Playlist, Review, User, WatchingSession,
};
use mopl_core::sort::{SortDirection, SortField};
use mopl_core::{Backend, BackendsConfig, PageSource};
use serde::de::DeserializeOwned;

use crate::TRACING_TARGET_COMMAND;
use crate::config::Cli;
use crate::source::{Listable, open_source};

/// A listable resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Resource {
    Users,
    Contents,
    Reviews,
    Notifications,
    Playlists,
    Conversations,
    DirectMessages,
    WatchingSessions,
}

impl Resource {
    /// Returns the back-end selected for this resource.
    pub fn backend(self, backends: &BackendsConfig) -> Backend {
        match self {
            Self::Users => backends.users,
            Self::Contents => backends.contents,
            Self::Reviews => backends.reviews,
            Self::Notifications => backends.notifications,
            Self::Playlists => backends.playlists,
            Self::Conversations => backends.conversations,
            Self::DirectMessages => backends.direct_messages,
            Self::WatchingSessions => backends.watching_sessions,
        }
    }
}

/// Arguments of `mopl list`.
#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    /// Resource to list.
    #[arg(value_enum)]
    pub resource: Resource,

    /// Filter object as JSON with camelCase keys.
    #[arg(long, default_value = "{}")]
    pub filter: String,

    /// Sort value of the last item of the previous page.
    #[arg(long)]
    pub cursor: Option<String>,

    /// Identifier of the last item of the previous page.
    #[arg(long)]
    pub id_after: Option<String>,

    /// Page size, clamped to 1..=1000.
    #[arg(long)]
    pub limit: Option<u32>,

    #[arg(long, value_enum)]
    pub sort_direction: Option<SortDirection>,

    /// Canonical sort field name, such as `createdAt`.
    #[arg(long)]
    pub sort_by: Option<String>,

    /// JSON array of records loaded into the memory back-end.
    #[arg(long)]
    pub seed: Option<PathBuf>,
}

impl ListArgs {
    fn page_query(&self) -> PageQuery {
        PageQuery {
            cursor: self.cursor.clone(),
            id_after: self.id_after.clone(),
            limit: self.limit,
            sort_direction: self.sort_direction,
            sort_by: self.sort_by.clone(),
        }
    }

    /// Resolves the filter and paging options for `R`.
    fn request<R>(&self) -> anyhow::Result<PageRequest<R>>
    where
        R: Listable,
        R::Filter: DeserializeOwned,
    {
        let filter: R::Filter = serde_json::from_str(&self.filter)
            .with_context(|| format!("invalid filter for {}", resource_name::<R>()))?;
        let request = PageRequest::from_query(filter, self.page_query())?;
        Ok(request)
    }
}

pub async fn execute(args: &ListArgs, cli: &Cli) -> anyhow::Result<()> {
    let backend = args.resource.backend(&cli.backends);
    let page = match args.resource {
        Resource::Users => list::<User>(args, backend, cli).await?,
        Resource::Contents => list::<Content>(args, backend, cli).await?,
        Resource::Reviews => list::<Review>(args, backend, cli).await?,
        Resource::Notifications => list::<Notification>(args, backend, cli).await?,
        Resource::Playlists => list::<Playlist>(args, backend, cli).await?,
        Resource::Conversations => list::<Conversation>(args, backend, cli).await?,
        Resource::DirectMessages => list::<DirectMessage>(args, backend, cli).await?,
        Resource::WatchingSessions => list::<WatchingSession>(args, backend, cli).await?,
    };

    println!("{}", serde_json::to_string_pretty(&page)?);
    Ok(())
}

async fn list<R>(args: &ListArgs, backend: Backend, cli: &Cli) -> anyhow::Result<serde_json::Value>
where
    R: Listable,
    R::Filter: DeserializeOwned,
{
    let seed = match &args.seed {
        Some(_) if backend != Backend::Memory => {
            bail!("--seed only applies to the memory backend, {} uses {backend}", resource_name::<R>())
        }
        Some(path) => load_seed::<R>(path).await?,
        None => Vec::new(),
    };

    let source = open_source::<R>(backend, cli, seed).await?;
    let page = find_page(source.as_ref(), args).await?;
    Ok(serde_json::to_value(page)?)
}

async fn find_page<R>(source: &dyn PageSource<R>, args: &ListArgs) -> anyhow::Result<CursorPage<R>>
where
    R: Listable,
    R::Filter: DeserializeOwned,
{
    let request = args.request::<R>()?;
    let page = source
        .find_page(&request)
        .await
        .with_context(|| format!("failed to list {}", resource_name::<R>()))?;

    tracing::info!(
        target: TRACING_TARGET_COMMAND,
        resource = resource_name::<R>(),
        returned = page.len(),
        has_next = page.has_next,
        total_count = page.total_count,
        "Listed page"
    );

    Ok(page)
}

async fn load_seed<R: Listable>(path: &Path) -> anyhow::Result<Vec<R>> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read seed file {}", path.display()))?;
    let records: Vec<R> = serde_json::from_str(&text)
        .with_context(|| format!("seed file {} is not a JSON array of {}", path.display(), resource_name::<R>()))?;

    tracing::debug!(
        target: TRACING_TARGET_COMMAND,
        path = %path.display(),
        records = records.len(),
        "Loaded seed records"
    );

    Ok(records)
}

fn resource_name<R: Listable>() -> &'static str {
    <R::Field as SortField<R>>::RESOURCE
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use jiff::Timestamp;
    use mopl_core::ErrorKind;
    use mopl_core::memory::MemoryPageSource;
    use mopl_core::resource::UserSummary;
    use uuid::Uuid;

    use super::*;
    use crate::command::Command;

    fn review(n: u128, rating: f64) -> Review {
        Review {
            id: Uuid::from_u128(n),
            content_id: Uuid::from_u128(100 + n % 2),
            author: UserSummary::new(Uuid::from_u128(500), "critic"),
            text: format!("review {n}"),
            rating,
            created_at: Timestamp::from_second(1_700_000_000 + n as i64).unwrap(),
        }
    }

    fn source() -> MemoryPageSource<Review> {
        (1..=6).map(|n| review(n, (n % 3) as f64)).collect()
    }

    fn args(extra: &[&str]) -> ListArgs {
        let argv = ["mopl", "list", "reviews"].into_iter().chain(extra.iter().copied());
        match Cli::try_parse_from(argv).unwrap().command {
            Command::List(args) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[tokio::test]
    async fn pages_continue_from_printed_cursor() {
        let source = source();
        let first = find_page(
            &source,
            &args(&["--sort-by", "rating", "--sort-direction", "ascending", "--limit", "4"]),
        )
        .await
        .unwrap();

        let ids: Vec<u128> = first.data.iter().map(|r| r.id.as_u128()).collect();
        assert_eq!(ids, vec![3, 6, 1, 4]);
        assert!(first.has_next);
        assert_eq!(first.next_cursor.as_deref(), Some("1"));

        let id_after = first.next_id_after.unwrap().to_string();
        let second = find_page(
            &source,
            &args(&[
                "--sort-by",
                "rating",
                "--sort-direction",
                "ascending",
                "--limit",
                "4",
                "--cursor",
                "1",
                "--id-after",
                &id_after,
            ]),
        )
        .await
        .unwrap();

        let ids: Vec<u128> = second.data.iter().map(|r| r.id.as_u128()).collect();
        assert_eq!(ids, vec![2, 5]);
        assert!(!second.has_next);
        assert_eq!(second.total_count, 6);
    }

    #[tokio::test]
    async fn filter_is_read_as_json() {
        let filter = format!(r#"{{"contentId":"{}"}}"#, Uuid::from_u128(100));
        let page = find_page(&source(), &args(&["--filter", &filter])).await.unwrap();

        assert_eq!(page.total_count, 3);
        assert!(page.data.iter().all(|r| r.content_id == Uuid::from_u128(100)));
    }

    #[tokio::test]
    async fn unknown_sort_field_is_rejected() {
        let error = find_page(&source(), &args(&["--sort-by", "title"]))
            .await
            .unwrap_err();
        let error = error.downcast_ref::<mopl_core::Error>().unwrap();

        assert_eq!(error.kind(), ErrorKind::InvalidSortField);
    }

    #[tokio::test]
    async fn malformed_filter_is_rejected() {
        assert!(find_page(&source(), &args(&["--filter", "{not json"])).await.is_err());
    }

    #[test]
    fn resources_resolve_their_backend() {
        let backends = BackendsConfig::default();
        assert_eq!(Resource::Reviews.backend(&backends), Backend::Postgres);
        assert_eq!(Resource::WatchingSessions.backend(&backends), Backend::Redis);
        assert_eq!(
            Resource::Contents.backend(&backends.with_contents(Backend::Search)),
            Backend::Search
        );
    }
}
