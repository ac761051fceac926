//! Subcommands.

mod index;
mod list;
mod migrate;

use clap::Subcommand;
use mopl_core::{Backend, BackendsConfig};

pub use self::index::IndexCommand;
pub use self::list::{ListArgs, Resource};
use crate::config::Cli;

/// What a run does.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Prints one page of a resource as JSON.
    List(ListArgs),
    /// Applies pending relational schema migrations.
    Migrate,
    /// Maintains the content search index.
    #[command(subcommand)]
    Index(IndexCommand),
}

impl Command {
    /// Returns whether running this command can touch `backend`.
    pub fn needs(&self, backend: Backend, backends: &BackendsConfig) -> bool {
        match self {
            Self::List(args) => args.resource.backend(backends) == backend,
            Self::Migrate => backend == Backend::Postgres,
            Self::Index(command) => command.needs(backend),
        }
    }

    pub async fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        match self {
            Self::List(args) => list::execute(args, cli).await,
            Self::Migrate => migrate::execute(cli).await,
            Self::Index(command) => command.execute(cli).await,
        }
    }
}
