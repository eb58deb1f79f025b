//! Document store seam.
//!
//! Handlers talk to the database only through [`DocumentStore`], a handful of
//! single-shot operations over JSON documents. [`MongoStore`] is the production
//! implementation; [`MemoryStore`] backs the router tests.

mod memory;
mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

use async_trait::async_trait;
use bson::oid::ObjectId;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// A stored document as it crosses the API boundary. `_id` is a hex string.
pub type Document = Map<String, Value>;

pub const ID_FIELD: &str = "_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Shows,
    CartTickets,
    Users,
}

impl Collection {
    pub fn name(self) -> &'static str {
        match self {
            Collection::Shows => "bandShows",
            Collection::CartTickets => "myCart",
            Collection::Users => "users",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    All,
    Id(ObjectId),
    Field { name: String, value: Value },
}

impl Filter {
    pub fn field(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Field {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub acknowledged: bool,
    pub inserted_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("document conversion failed: {0}")]
    Conversion(String),
    #[error("duplicate key {0}")]
    DuplicateKey(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<bson::ser::Error> for StoreError {
    fn from(value: bson::ser::Error) -> Self {
        Self::Conversion(value.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Top-level keys starting with `$` would reach the database as operators.
pub(crate) fn check_field_names(document: &Document) -> StoreResult<()> {
    match document.keys().find(|key| key.starts_with('$')) {
        Some(key) => Err(StoreError::Conversion(format!("field '{key}' is not allowed"))),
        None => Ok(()),
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All matching documents; `projection` limits the returned fields.
    async fn find(
        &self,
        collection: Collection,
        filter: Filter,
        projection: Option<&[&str]>,
    ) -> StoreResult<Vec<Document>>;

    async fn find_one(&self, collection: Collection, filter: Filter) -> StoreResult<Option<Document>>;

    async fn insert_one(&self, collection: Collection, document: Document) -> StoreResult<InsertOneResult>;

    /// `$set`s `fields` on the first match. With `upsert` a missing document is
    /// created from the filter plus `fields`.
    async fn update_one(
        &self,
        collection: Collection,
        filter: Filter,
        fields: Document,
        upsert: bool,
    ) -> StoreResult<UpdateResult>;

    async fn delete_one(&self, collection: Collection, filter: Filter) -> StoreResult<DeleteResult>;
}
