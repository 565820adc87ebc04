use async_trait::async_trait;

use crate::schema::CollectionSpec;

/// Context provided to modules during initialization
pub struct InitCtx<'a> {
    pub settings: &'a crate::settings::Settings,
}

/// Unit of schema ownership: each module declares the collections it relies on.
#[async_trait]
pub trait Module: Sync + Send {
    /// Unique name for this module
    fn name(&self) -> &'static str;

    /// Initialize the module with the provided context.
    /// Called before any collection is created.
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Collections (and their indexes) this module needs to exist
    fn collections(&self) -> Vec<CollectionSpec> {
        vec![]
    }
}
