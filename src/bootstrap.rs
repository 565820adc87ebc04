//! Bootstrap orchestration: modules declare, the db crate applies.

use anyhow::Context;
use docchat_db::{BootstrapReport, SchemaReport, SchemaTarget};
use docchat_kernel::{CollectionSpec, InitCtx, ModuleRegistry, Settings};

use crate::modules;

/// Printed to stdout once the schema is in place.
pub const COMPLETION_MESSAGE: &str = "MongoDB initialization completed successfully!";

/// Initialize every module and collect the collections they declare.
pub async fn schema(settings: &Settings) -> anyhow::Result<Vec<CollectionSpec>> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry);

    let ctx = InitCtx { settings };
    registry.init_modules(&ctx).await?;

    Ok(registry.collect_collections())
}

/// Apply the declared schema to `target`.
pub async fn apply(target: &dyn SchemaTarget, settings: &Settings) -> anyhow::Result<BootstrapReport> {
    let specs = schema(settings).await?;

    let report = docchat_db::apply_schema(target, &specs)
        .await
        .with_context(|| format!("failed to bootstrap database '{}'", settings.database.database))?;

    tracing::info!(
        database = %settings.database.database,
        collections_created = report.collections_created.len(),
        indexes_created = report.indexes_created.len(),
        indexes_existing = report.indexes_existing.len(),
        "schema bootstrap finished"
    );

    Ok(report)
}

/// Connect to the configured database and apply the schema.
pub async fn run(settings: &Settings) -> anyhow::Result<BootstrapReport> {
    let target = docchat_db::mongo_target(&settings.database)
        .await
        .with_context(|| "database is not reachable")?;

    apply(&target, settings).await
}

/// Connect to the configured database and report what is missing, changing nothing.
pub async fn verify(settings: &Settings) -> anyhow::Result<SchemaReport> {
    let specs = schema(settings).await?;
    let target = docchat_db::mongo_target(&settings.database)
        .await
        .with_context(|| "database is not reachable")?;

    let report = docchat_db::verify_schema(&target, &specs)
        .await
        .with_context(|| format!("failed to inspect database '{}'", settings.database.database))?;

    if report.is_complete() {
        tracing::info!(database = %settings.database.database, "schema is complete");
    } else {
        tracing::warn!(
            database = %settings.database.database,
            missing_collections = ?report.missing_collections,
            missing_indexes = ?report.missing_indexes,
            "schema is incomplete"
        );
    }

    Ok(report)
}
