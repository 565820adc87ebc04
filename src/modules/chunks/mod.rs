pub mod models;

use async_trait::async_trait;
use docchat_kernel::{CollectionSpec, IndexSpec, InitCtx, Module};

use models::{CHUNK_INDEX_FIELD, DOCUMENT_ID_FIELD};

/// Collection holding one record per text chunk.
pub const CHUNKS_COLLECTION: &str = "chunks";

/// Owns the chunk collection and the indexes used for per-document retrieval.
///
/// Uploaded files live in GridFS, whose collections the driver provisions on
/// first write, so they are not declared here.
pub struct ChunksModule;

impl ChunksModule {
    pub const fn new() -> Self {
        Self
    }
}

impl Default for ChunksModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Module for ChunksModule {
    fn name(&self) -> &'static str {
        "chunks"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            database = %ctx.settings.database.database,
            "chunks module initialized"
        );
        Ok(())
    }

    fn collections(&self) -> Vec<CollectionSpec> {
        vec![CollectionSpec::new(CHUNKS_COLLECTION)
            .with_index(IndexSpec::ascending(&[DOCUMENT_ID_FIELD]))
            .with_index(IndexSpec::ascending(&[CHUNK_INDEX_FIELD]))
            .with_index(IndexSpec::ascending(&[
                DOCUMENT_ID_FIELD,
                CHUNK_INDEX_FIELD,
            ]))]
    }
}

/// Factory function to create the chunks module
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(ChunksModule::new())
}
