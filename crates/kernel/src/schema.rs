//! Driver-agnostic declarations of the collections and indexes a module needs.

use serde::Serialize;

/// Direction of a single index key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// Numeric form used in MongoDB key patterns.
    pub const fn as_i32(self) -> i32 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }
}

/// One index on a collection. Key order is significant for compound indexes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexSpec {
    pub keys: Vec<(String, SortOrder)>,
    pub unique: bool,
}

impl IndexSpec {
    /// Non-unique index with every field ascending, in the given order.
    pub fn ascending(fields: &[&str]) -> Self {
        Self {
            keys: fields
                .iter()
                .map(|field| (field.to_string(), SortOrder::Ascending))
                .collect(),
            unique: false,
        }
    }

    pub fn with_key(mut self, field: &str, order: SortOrder) -> Self {
        self.keys.push((field.to_string(), order));
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// The name MongoDB assigns when none is given, e.g. `document_id_1_chunk_index_1`.
    pub fn name(&self) -> String {
        self.keys
            .iter()
            .map(|(field, order)| format!("{}_{}", field, order.as_i32()))
            .collect::<Vec<_>>()
            .join("_")
    }

    /// Two specs describe the same index when their key patterns match.
    pub fn same_keys(&self, other: &IndexSpec) -> bool {
        self.keys == other.keys
    }
}

/// A collection and the indexes that must exist on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionSpec {
    pub name: String,
    pub indexes: Vec<IndexSpec>,
}

impl CollectionSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            indexes: Vec::new(),
        }
    }

    /// Add an index unless one with the same key pattern is already declared.
    pub fn with_index(mut self, index: IndexSpec) -> Self {
        self.push_index(index);
        self
    }

    pub(crate) fn push_index(&mut self, index: IndexSpec) {
        if !self.indexes.iter().any(|existing| existing.same_keys(&index)) {
            self.indexes.push(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_names_follow_mongodb_convention() {
        assert_eq!(IndexSpec::ascending(&["document_id"]).name(), "document_id_1");
        assert_eq!(
            IndexSpec::ascending(&["document_id", "chunk_index"]).name(),
            "document_id_1_chunk_index_1"
        );
        assert_eq!(
            IndexSpec::ascending(&["document_id"])
                .with_key("created_at", SortOrder::Descending)
                .name(),
            "document_id_1_created_at_-1"
        );
    }

    #[test]
    fn key_order_distinguishes_compound_indexes() {
        let forward = IndexSpec::ascending(&["document_id", "chunk_index"]);
        let reverse = IndexSpec::ascending(&["chunk_index", "document_id"]);
        assert!(!forward.same_keys(&reverse));
    }

    #[test]
    fn uniqueness_does_not_change_key_identity() {
        let plain = IndexSpec::ascending(&["document_id"]);
        let unique = IndexSpec::ascending(&["document_id"]).unique();
        assert!(plain.same_keys(&unique));
        assert!(unique.unique);
    }

    #[test]
    fn duplicate_indexes_are_declared_once() {
        let spec = CollectionSpec::new("chunks")
            .with_index(IndexSpec::ascending(&["document_id"]))
            .with_index(IndexSpec::ascending(&["document_id"]))
            .with_index(IndexSpec::ascending(&["chunk_index"]));
        assert_eq!(spec.indexes.len(), 2);
    }
}
