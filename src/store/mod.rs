//! Document store abstraction.
//!
//! Records are persisted as flat JSON objects grouped by collection name. A
//! store only has to support the handful of operations the persistence
//! adapters need: insert, find by filter, list, update by filter and delete
//! by filter.

use async_trait::async_trait;
use serde_json::{Map, Value};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// A stored document: the flat field set of one record.
pub type Document = Map<String, Value>;

/// Upper bound on the number of documents a listing returns.
pub const MAX_LIST_LEN: usize = 1000;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("malformed document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("document in `{collection}` has no string `id` field")]
    MissingId { collection: String },

    #[error("duplicate id `{id}` in `{collection}`")]
    DuplicateKey { collection: String, id: String },

    #[error("document `{id}` in `{collection}` disappeared before it could be re-read")]
    Vanished { collection: String, id: String },
}

/// Field-equality filter. An empty filter matches every document.
#[derive(Debug, Clone, Default)]
pub struct Filter(Document);

impl Filter {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn by_id(id: &str) -> Self {
        Self::eq("id", Value::String(id.to_owned()))
    }

    pub fn eq(field: &str, value: Value) -> Self {
        let mut doc = Document::new();
        doc.insert(field.to_owned(), value);
        Self(doc)
    }

    pub fn as_document(&self) -> &Document {
        &self.0
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.0.iter().all(|(k, v)| doc.get(k) == Some(v))
    }
}

/// Ordering for listings. Sort fields hold RFC 3339 timestamps; documents
/// with equal keys keep insertion order as the tie-breaker, newest first
/// when descending.
#[derive(Debug, Clone, Copy)]
pub struct Sort {
    pub field: &'static str,
    pub descending: bool,
}

impl Sort {
    pub const fn newest_first(field: &'static str) -> Self {
        Self {
            field,
            descending: true,
        }
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document. Its string `id` must be unique in the collection.
    async fn insert_one(&self, collection: &str, doc: Document) -> Result<(), StoreError>;

    /// The earliest inserted document matching `filter`.
    async fn find_one(&self, collection: &str, filter: &Filter)
        -> Result<Option<Document>, StoreError>;

    /// Matching documents, sorted if requested (insertion order otherwise),
    /// truncated to `limit`.
    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        sort: Option<Sort>,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError>;

    /// Merge `set` into the first matching document. Returns the number of
    /// documents matched (0 or 1).
    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        set: Document,
    ) -> Result<u64, StoreError>;

    /// Remove the first matching document. Returns the number removed.
    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError>;

    /// Release the underlying connection. Called once at shutdown.
    async fn close(&self) {}
}

pub(crate) fn document_id(collection: &str, doc: &Document) -> Result<String, StoreError> {
    doc.get("id")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| StoreError::MissingId {
            collection: collection.to_owned(),
        })
}

/// Serialize a record into a document. Fails unless it serializes to a JSON
/// object.
pub fn to_document<T: serde::Serialize>(value: &T) -> Result<Document, serde_json::Error> {
    match serde_json::to_value(value)? {
        Value::Object(doc) => Ok(doc),
        other => Err(<serde_json::Error as serde::ser::Error>::custom(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}
