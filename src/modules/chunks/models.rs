use mongodb::bson::{DateTime, Document};
use serde::{Deserialize, Serialize};

/// Field holding the parent document's identifier.
pub const DOCUMENT_ID_FIELD: &str = "document_id";
/// Field holding the chunk's position within its parent document.
pub const CHUNK_INDEX_FIELD: &str = "chunk_index";

/// A segment of extracted text, stored one record per chunk.
///
/// The ingestion pipeline writes these; the bootstrap only prepares the
/// collection and indexes they are queried through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkDocument {
    /// Identifier of the source document this chunk belongs to
    pub document_id: String,
    /// Zero-based position within the source document
    pub chunk_index: u32,
    pub content: String,
    #[serde(default)]
    pub metadata: Document,
    pub created_at: DateTime,
}

impl ChunkDocument {
    pub fn new(document_id: impl Into<String>, chunk_index: u32, content: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            chunk_index,
            content: content.into(),
            metadata: Document::new(),
            created_at: DateTime::now(),
        }
    }

    pub fn with_metadata(mut self, metadata: Document) -> Self {
        self.metadata = metadata;
        self
    }
}
