use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Bson};
use futures::TryStreamExt;
use mongodb::{Client, Database};
use serde_json::Value;
use tracing::debug;

use super::{
    check_field_names, Collection, DeleteResult, Document, DocumentStore, Filter, InsertOneResult,
    StoreResult, UpdateResult, ID_FIELD,
};

/// MongoDB-backed store. The driver's `Client` pools connections internally,
/// so one instance is shared by every request.
#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub async fn connect(uri: &str, database: &str) -> StoreResult<Self> {
        let client = Client::with_uri_str(uri).await?;
        Ok(Self::new(client.database(database)))
    }

    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn collection(&self, collection: Collection) -> mongodb::Collection<bson::Document> {
        self.db.collection(collection.name())
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn find(
        &self,
        collection: Collection,
        filter: Filter,
        projection: Option<&[&str]>,
    ) -> StoreResult<Vec<Document>> {
        let query = filter_document(&filter)?;
        let cursor = match projection {
            Some(fields) => {
                self.collection(collection)
                    .find(query)
                    .projection(projection_document(fields))
                    .await?
            }
            None => self.collection(collection).find(query).await?,
        };
        let rows: Vec<bson::Document> = cursor.try_collect().await?;
        debug!(collection = collection.name(), count = rows.len(), "find");
        Ok(rows.into_iter().map(to_json_document).collect())
    }

    async fn find_one(&self, collection: Collection, filter: Filter) -> StoreResult<Option<Document>> {
        let query = filter_document(&filter)?;
        let row = self.collection(collection).find_one(query).await?;
        Ok(row.map(to_json_document))
    }

    async fn insert_one(&self, collection: Collection, document: Document) -> StoreResult<InsertOneResult> {
        let document = to_bson_document(&document)?;
        let result = self.collection(collection).insert_one(document).await?;
        Ok(InsertOneResult {
            acknowledged: true,
            inserted_id: id_string(result.inserted_id),
        })
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: Filter,
        fields: Document,
        upsert: bool,
    ) -> StoreResult<UpdateResult> {
        let query = filter_document(&filter)?;
        let update = doc! { "$set": to_bson_document(&fields)? };
        let result = self
            .collection(collection)
            .update_one(query, update)
            .upsert(upsert)
            .await?;
        let upserted_id = result.upserted_id.map(id_string);
        Ok(UpdateResult {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_count: u64::from(upserted_id.is_some()),
            upserted_id,
        })
    }

    async fn delete_one(&self, collection: Collection, filter: Filter) -> StoreResult<DeleteResult> {
        let query = filter_document(&filter)?;
        let result = self.collection(collection).delete_one(query).await?;
        Ok(DeleteResult {
            acknowledged: true,
            deleted_count: result.deleted_count,
        })
    }
}

fn filter_document(filter: &Filter) -> StoreResult<bson::Document> {
    Ok(match filter {
        Filter::All => doc! {},
        Filter::Id(id) => doc! { "_id": *id },
        Filter::Field { name, value } => {
            let mut query = bson::Document::new();
            query.insert(name.clone(), bson::to_bson(value)?);
            query
        }
    })
}

fn projection_document(fields: &[&str]) -> bson::Document {
    fields
        .iter()
        .map(|field| (field.to_string(), Bson::Int32(1)))
        .collect()
}

/// A hex `_id` supplied by the client is stored as an ObjectId so that it can
/// be addressed through the `/:id` routes.
fn to_bson_document(document: &Document) -> StoreResult<bson::Document> {
    check_field_names(document)?;
    let mut out = bson::Document::new();
    for (key, value) in document {
        let converted = match (key.as_str(), value) {
            (ID_FIELD, Value::String(hex)) => match ObjectId::parse_str(hex) {
                Ok(id) => Bson::ObjectId(id),
                Err(_) => Bson::String(hex.clone()),
            },
            _ => bson::to_bson(value)?,
        };
        out.insert(key.clone(), converted);
    }
    Ok(out)
}

fn to_json_document(document: bson::Document) -> Document {
    document
        .into_iter()
        .map(|(key, value)| (key, to_json_value(value)))
        .collect()
}

fn to_json_value(value: Bson) -> Value {
    match value {
        Bson::ObjectId(id) => Value::String(id.to_hex()),
        Bson::Document(inner) => Value::Object(to_json_document(inner)),
        Bson::Array(items) => Value::Array(items.into_iter().map(to_json_value).collect()),
        other => other.into_relaxed_extjson(),
    }
}

fn id_string(id: Bson) -> String {
    match id {
        Bson::ObjectId(id) => id.to_hex(),
        Bson::String(value) => value,
        other => other.into_relaxed_extjson().to_string(),
    }
}
