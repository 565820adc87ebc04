use async_trait::async_trait;
use docchat_kernel::schema::IndexSpec;
use futures::TryStreamExt;
use mongodb::bson::Document;
use mongodb::error::ErrorKind;
use mongodb::options::IndexOptions;
use mongodb::{Database, IndexModel};

use crate::error::DbError;

/// Server reply code for `create` on a collection that already exists.
const NAMESPACE_EXISTS: i32 = 48;

/// Where collections and indexes are applied.
#[async_trait]
pub trait SchemaTarget: Send + Sync {
    async fn collection_names(&self) -> Result<Vec<String>, DbError>;

    /// Create `name`. A collection that already exists is not an error.
    async fn create_collection(&self, name: &str) -> Result<(), DbError>;

    /// Key patterns of every index on `collection`, `_id` included.
    async fn index_keys(&self, collection: &str) -> Result<Vec<Document>, DbError>;

    async fn create_index(&self, collection: &str, index: &IndexSpec) -> Result<(), DbError>;
}

/// `SchemaTarget` backed by a live MongoDB database.
pub struct MongoTarget {
    database: Database,
}

impl MongoTarget {
    pub fn new(database: Database) -> Self {
        Self { database }
    }
}

#[async_trait]
impl SchemaTarget for MongoTarget {
    async fn collection_names(&self) -> Result<Vec<String>, DbError> {
        self.database
            .list_collection_names()
            .await
            .map_err(|err| DbError::operation("list collections", self.database.name(), err))
    }

    async fn create_collection(&self, name: &str) -> Result<(), DbError> {
        match self.database.create_collection(name).await {
            Ok(()) => Ok(()),
            Err(err) if is_namespace_exists(&err) => {
                tracing::debug!(target: "docchat-db", collection = name, "collection created concurrently");
                Ok(())
            }
            Err(err) => Err(DbError::operation("create collection", name, err)),
        }
    }

    async fn index_keys(&self, collection: &str) -> Result<Vec<Document>, DbError> {
        let models: Vec<IndexModel> = self
            .database
            .collection::<Document>(collection)
            .list_indexes()
            .await
            .map_err(|err| DbError::operation("list indexes", collection, err))?
            .try_collect::<Vec<IndexModel>>()
            .await
            .map_err(|err| DbError::operation("list indexes", collection, err))?;

        Ok(models.into_iter().map(|model| model.keys).collect())
    }

    async fn create_index(&self, collection: &str, index: &IndexSpec) -> Result<(), DbError> {
        let mut model = IndexModel::builder().keys(key_document(index)).build();
        if index.unique {
            model.options = Some(IndexOptions::builder().unique(true).build());
        }

        self.database
            .collection::<Document>(collection)
            .create_index(model)
            .await
            .map_err(|err| {
                DbError::operation("create index", format!("{}.{}", collection, index.name()), err)
            })?;
        Ok(())
    }
}

fn is_namespace_exists(err: &mongodb::error::Error) -> bool {
    matches!(err.kind.as_ref(), ErrorKind::Command(command) if command.code == NAMESPACE_EXISTS)
}

/// MongoDB key pattern for an index, e.g. `{ document_id: 1, chunk_index: 1 }`.
pub fn key_document(index: &IndexSpec) -> Document {
    let mut keys = Document::new();
    for (field, order) in &index.keys {
        keys.insert(field.clone(), order.as_i32());
    }
    keys
}

/// Whether an existing key pattern is the one `index` declares.
///
/// Field order and direction must match; the numeric type the server reports
/// (int32, int64 or double) does not matter.
pub fn keys_match(index: &IndexSpec, keys: &Document) -> bool {
    if keys.len() != index.keys.len() {
        return false;
    }

    index
        .keys
        .iter()
        .zip(keys.iter())
        .all(|((field, order), (existing_field, value))| {
            let direction = match value {
                mongodb::bson::Bson::Int32(n) => n.signum(),
                mongodb::bson::Bson::Int64(n) => n.signum() as i32,
                mongodb::bson::Bson::Double(n) if *n > 0.0 => 1,
                mongodb::bson::Bson::Double(n) if *n < 0.0 => -1,
                // Text, hashed and geo indexes never equal an ordered index.
                _ => 0,
            };
            field == existing_field && direction == order.as_i32()
        })
}
