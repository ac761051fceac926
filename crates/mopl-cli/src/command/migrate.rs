use anyhow::Context;
use mopl_postgres::run_pending_migrations;

use crate::TRACING_TARGET_COMMAND;
use crate::config::Cli;

pub async fn execute(cli: &Cli) -> anyhow::Result<()> {
    let client = cli
        .postgres
        .clone()
        .build()
        .context("failed to create postgres client")?;

    let result = run_pending_migrations(&client)
        .await
        .context("failed to apply migrations")?;

    if result.is_noop() {
        tracing::info!(target: TRACING_TARGET_COMMAND, "Schema already current");
        return Ok(());
    }

    tracing::info!(
        target: TRACING_TARGET_COMMAND,
        applied = result.applied_count(),
        versions = ?result.applied_versions,
        duration_ms = result.duration.as_millis(),
        "Migrations applied"
    );

    Ok(())
}
