//! MongoDB client factory and idempotent schema bootstrap.

pub mod bootstrap;
pub mod client;
pub mod error;
#[cfg(any(test, feature = "testing"))]
pub mod memory;
pub mod target;

pub use bootstrap::{apply_schema, verify_schema, BootstrapReport, SchemaReport};
pub use client::connect;
pub use error::DbError;
pub use target::{MongoTarget, SchemaTarget};

/// Connect with `settings` and wrap the selected database as a [`SchemaTarget`].
pub async fn mongo_target(
    settings: &docchat_kernel::settings::DatabaseSettings,
) -> Result<MongoTarget, DbError> {
    Ok(MongoTarget::new(connect(settings).await?))
}
