//! Opens the page source serving each resource.
//!
//! Only the back-end a resource is listed from gets a connection.

use std::sync::Arc;

use anyhow::{Context, bail};
use mopl_core::memory::MemoryPageSource;
use mopl_core::resource::{
    Content, Conversation, DirectMessage, Notification, Playlist, Review, User, WatchingSession,
};
use mopl_core::sort::SortField;
use mopl_core::{Backend, Record, SharedPageSource};
use mopl_postgres::PgPageSource;
use mopl_redis::WatchingSessionPageSource;
use mopl_search::ContentSearchSource;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::TRACING_TARGET_STARTUP;
use crate::config::Cli;

/// A record the CLI can list and seed.
pub(crate) trait Listable: Record + Serialize + DeserializeOwned {
    /// Opens a connected source for `backend`.
    async fn connect(backend: Backend, cli: &Cli) -> anyhow::Result<SharedPageSource<Self>>;
}

/// Returns the source for `R` on `backend`.
///
/// The memory back-end starts from `seed`; every other back-end ignores it.
pub(crate) async fn open_source<R: Listable>(
    backend: Backend,
    cli: &Cli,
    seed: Vec<R>,
) -> anyhow::Result<SharedPageSource<R>> {
    tracing::debug!(
        target: TRACING_TARGET_STARTUP,
        resource = <R::Field as SortField<R>>::RESOURCE,
        backend = %backend,
        "Opening page source"
    );

    match backend {
        Backend::Memory => Ok(Arc::new(seed.into_iter().collect::<MemoryPageSource<R>>())),
        backend => R::connect(backend, cli).await,
    }
}

fn postgres(cli: &Cli) -> anyhow::Result<PgPageSource> {
    let client = cli
        .postgres
        .clone()
        .build()
        .context("failed to create postgres client")?;
    Ok(PgPageSource::new(client))
}

fn unsupported<R: Record>(backend: Backend) -> anyhow::Result<SharedPageSource<R>> {
    bail!(
        "backend '{backend}' cannot serve {}",
        <R::Field as SortField<R>>::RESOURCE
    )
}

macro_rules! impl_relational {
    ($($record:ty),+ $(,)?) => {$(
        impl Listable for $record {
            async fn connect(backend: Backend, cli: &Cli) -> anyhow::Result<SharedPageSource<Self>> {
                match backend {
                    Backend::Postgres => Ok(Arc::new(postgres(cli)?)),
                    backend => unsupported(backend),
                }
            }
        }
    )+};
}

impl_relational!(User, Review, Notification, Playlist, Conversation, DirectMessage);

impl Listable for Content {
    async fn connect(backend: Backend, cli: &Cli) -> anyhow::Result<SharedPageSource<Self>> {
        match backend {
            Backend::Postgres => Ok(Arc::new(postgres(cli)?)),
            Backend::Search => {
                let client = cli
                    .search
                    .clone()
                    .build()
                    .context("failed to create search client")?;
                Ok(Arc::new(ContentSearchSource::from(client)))
            }
            backend => unsupported(backend),
        }
    }
}

impl Listable for WatchingSession {
    async fn connect(backend: Backend, cli: &Cli) -> anyhow::Result<SharedPageSource<Self>> {
        match backend {
            Backend::Redis => {
                let client = cli
                    .redis
                    .clone()
                    .build()
                    .await
                    .context("failed to connect to redis")?;
                Ok(Arc::new(WatchingSessionPageSource::from(client)))
            }
            backend => unsupported(backend),
        }
    }
}
