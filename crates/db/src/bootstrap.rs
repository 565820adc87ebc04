//! Idempotent schema application and read-only verification.

use std::collections::HashSet;

use docchat_kernel::schema::CollectionSpec;

use crate::error::DbError;
use crate::target::{keys_match, SchemaTarget};

/// What a bootstrap run changed. Index entries are `collection.index_name`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    pub collections_created: Vec<String>,
    pub collections_existing: Vec<String>,
    pub indexes_created: Vec<String>,
    pub indexes_existing: Vec<String>,
}

impl BootstrapReport {
    /// True when the run found everything already in place.
    pub fn is_noop(&self) -> bool {
        self.collections_created.is_empty() && self.indexes_created.is_empty()
    }
}

/// Differences between the declared schema and the database.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaReport {
    pub missing_collections: Vec<String>,
    pub missing_indexes: Vec<String>,
}

impl SchemaReport {
    pub fn is_complete(&self) -> bool {
        self.missing_collections.is_empty() && self.missing_indexes.is_empty()
    }
}

/// Make every declared collection and index exist.
///
/// Present collections and indexes with a matching key pattern are left alone, so
/// running this any number of times ends in the same state as running it once.
pub async fn apply_schema(
    target: &dyn SchemaTarget,
    specs: &[CollectionSpec],
) -> Result<BootstrapReport, DbError> {
    let existing: HashSet<String> = target.collection_names().await?.into_iter().collect();
    let mut report = BootstrapReport::default();

    for spec in specs {
        if existing.contains(&spec.name) {
            tracing::debug!(target: "docchat-db", collection = %spec.name, "collection already exists");
            report.collections_existing.push(spec.name.clone());
        } else {
            target.create_collection(&spec.name).await?;
            tracing::info!(target: "docchat-db", collection = %spec.name, "created collection");
            report.collections_created.push(spec.name.clone());
        }

        let present = target.index_keys(&spec.name).await?;
        for index in &spec.indexes {
            let qualified = format!("{}.{}", spec.name, index.name());

            if present.iter().any(|keys| keys_match(index, keys)) {
                tracing::debug!(target: "docchat-db", index = %qualified, "index already exists");
                report.indexes_existing.push(qualified);
                continue;
            }

            target.create_index(&spec.name, index).await?;
            tracing::info!(target: "docchat-db", index = %qualified, unique = index.unique, "created index");
            report.indexes_created.push(qualified);
        }
    }

    Ok(report)
}

/// Compare the declared schema with the database without changing anything.
pub async fn verify_schema(
    target: &dyn SchemaTarget,
    specs: &[CollectionSpec],
) -> Result<SchemaReport, DbError> {
    let existing: HashSet<String> = target.collection_names().await?.into_iter().collect();
    let mut report = SchemaReport::default();

    for spec in specs {
        if !existing.contains(&spec.name) {
            report.missing_collections.push(spec.name.clone());
            report.missing_indexes.extend(
                spec.indexes
                    .iter()
                    .map(|index| format!("{}.{}", spec.name, index.name())),
            );
            continue;
        }

        let present = target.index_keys(&spec.name).await?;
        for index in &spec.indexes {
            if !present.iter().any(|keys| keys_match(index, keys)) {
                report
                    .missing_indexes
                    .push(format!("{}.{}", spec.name, index.name()));
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryTarget;
    use docchat_kernel::schema::IndexSpec;
    use mongodb::bson::doc;

    fn chunk_schema() -> Vec<CollectionSpec> {
        vec![CollectionSpec::new("chunks")
            .with_index(IndexSpec::ascending(&["document_id"]))
            .with_index(IndexSpec::ascending(&["chunk_index"]))
            .with_index(IndexSpec::ascending(&["document_id", "chunk_index"]))]
    }

    #[tokio::test]
    async fn fresh_database_gets_collection_and_indexes() {
        let target = MemoryTarget::new();

        let report = apply_schema(&target, &chunk_schema()).await.unwrap();

        assert_eq!(report.collections_created, vec!["chunks"]);
        assert_eq!(
            report.indexes_created,
            vec![
                "chunks.document_id_1",
                "chunks.chunk_index_1",
                "chunks.document_id_1_chunk_index_1"
            ]
        );
        assert!(!report.is_noop());
        assert_eq!(
            target.index_keys_of("chunks"),
            vec![
                doc! { "_id": 1 },
                doc! { "document_id": 1 },
                doc! { "chunk_index": 1 },
                doc! { "document_id": 1, "chunk_index": 1 },
            ]
        );
    }

    #[tokio::test]
    async fn repeated_runs_leave_the_same_state() {
        let target = MemoryTarget::new();
        let schema = chunk_schema();

        apply_schema(&target, &schema).await.unwrap();
        let after_first = target.snapshot();

        for _ in 0..3 {
            let report = apply_schema(&target, &schema).await.unwrap();
            assert!(report.is_noop());
            assert_eq!(report.collections_existing, vec!["chunks"]);
            assert_eq!(report.indexes_existing.len(), 3);
        }

        assert_eq!(target.snapshot(), after_first);
        assert_eq!(target.create_index_calls(), 3);
    }

    #[tokio::test]
    async fn partially_initialized_database_is_completed() {
        let target = MemoryTarget::new();
        target.seed_collection("chunks", vec![doc! { "document_id": 1 }]);

        let report = apply_schema(&target, &chunk_schema()).await.unwrap();

        assert!(report.collections_created.is_empty());
        assert_eq!(report.indexes_existing, vec!["chunks.document_id_1"]);
        assert_eq!(
            report.indexes_created,
            vec!["chunks.chunk_index_1", "chunks.document_id_1_chunk_index_1"]
        );
        assert_eq!(target.index_keys_of("chunks").len(), 4);
    }

    #[tokio::test]
    async fn unrelated_collections_are_untouched() {
        let target = MemoryTarget::new();
        target.seed_collection("fs.files", vec![doc! { "filename": 1, "uploadDate": 1 }]);

        apply_schema(&target, &chunk_schema()).await.unwrap();

        assert_eq!(
            target.index_keys_of("fs.files"),
            vec![doc! { "_id": 1 }, doc! { "filename": 1, "uploadDate": 1 }]
        );
    }

    #[tokio::test]
    async fn unreachable_database_creates_nothing() {
        let target = MemoryTarget::unreachable();

        let err = apply_schema(&target, &chunk_schema()).await.unwrap_err();

        assert!(err.is_connection());
        assert!(target.snapshot().is_empty());
        assert_eq!(target.create_index_calls(), 0);
    }

    #[tokio::test]
    async fn verify_reports_missing_pieces() {
        let target = MemoryTarget::new();

        let report = verify_schema(&target, &chunk_schema()).await.unwrap();
        assert!(!report.is_complete());
        assert_eq!(report.missing_collections, vec!["chunks"]);
        assert_eq!(report.missing_indexes.len(), 3);

        target.seed_collection("chunks", vec![doc! { "chunk_index": 1 }]);
        let report = verify_schema(&target, &chunk_schema()).await.unwrap();
        assert!(report.missing_collections.is_empty());
        assert_eq!(
            report.missing_indexes,
            vec!["chunks.document_id_1", "chunks.document_id_1_chunk_index_1"]
        );
    }

    #[tokio::test]
    async fn verify_after_apply_is_complete_and_read_only() {
        let target = MemoryTarget::new();
        apply_schema(&target, &chunk_schema()).await.unwrap();
        let before = target.snapshot();

        let report = verify_schema(&target, &chunk_schema()).await.unwrap();

        assert!(report.is_complete());
        assert_eq!(target.snapshot(), before);
    }
}
