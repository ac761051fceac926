use anyhow::Context;
use clap::Subcommand;
use mopl_core::Backend;
use mopl_postgres::query::ContentRepository;
use mopl_search::ContentIndex;

use crate::TRACING_TARGET_COMMAND;
use crate::config::Cli;

/// Search index maintenance.
#[derive(Debug, Clone, Subcommand)]
pub enum IndexCommand {
    /// Creates the content index with its mapping if it is missing.
    Init {
        /// Drops and recreates an existing index.
        #[arg(long)]
        recreate: bool,
    },
    /// Copies every relational content row into the index.
    Sync,
}

impl IndexCommand {
    pub fn needs(&self, backend: Backend) -> bool {
        match self {
            Self::Init { .. } => backend == Backend::Search,
            Self::Sync => matches!(backend, Backend::Search | Backend::Postgres),
        }
    }

    pub async fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let client = cli
            .search
            .clone()
            .build()
            .context("failed to create search client")?;
        let index = ContentIndex::new(client);

        match self {
            Self::Init { recreate } => {
                let outcome = index
                    .ensure_index(*recreate)
                    .await
                    .context("failed to initialize the content index")?;

                tracing::info!(
                    target: TRACING_TARGET_COMMAND,
                    index = %cli.search.search_index,
                    outcome = %outcome,
                    "Content index ready"
                );
            }
            Self::Sync => {
                let pg = cli
                    .postgres
                    .clone()
                    .build()
                    .context("failed to create postgres client")?;
                let mut conn = pg
                    .get_connection()
                    .await
                    .context("failed to acquire a database connection")?;
                let contents = conn
                    .list_all_contents()
                    .await
                    .context("failed to load contents")?;

                index
                    .ensure_index(false)
                    .await
                    .context("failed to initialize the content index")?;
                index
                    .upsert_all(&contents)
                    .await
                    .context("failed to index contents")?;

                tracing::info!(
                    target: TRACING_TARGET_COMMAND,
                    index = %cli.search.search_index,
                    documents = contents.len(),
                    "Content index synchronized"
                );
            }
        }

        Ok(())
    }
}
