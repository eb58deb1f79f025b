use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use bson::oid::ObjectId;
use serde_json::Value;

use super::{
    check_field_names, Collection, DeleteResult, Document, DocumentStore, Filter, InsertOneResult,
    StoreError, StoreResult, UpdateResult, ID_FIELD,
};

/// Process-local store with the same observable semantics as [`super::MongoStore`].
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<HashMap<Collection, Vec<Document>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection.
    pub fn count(&self, collection: Collection) -> usize {
        self.inner
            .read()
            .map(|guard| guard.get(&collection).map_or(0, Vec::len))
            .unwrap_or(0)
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Unavailable("memory store lock poisoned".to_string())
}

fn matches(document: &Document, filter: &Filter) -> bool {
    match filter {
        Filter::All => true,
        Filter::Id(id) => document.get(ID_FIELD) == Some(&Value::String(id.to_hex())),
        Filter::Field { name, value } => document.get(name) == Some(value),
    }
}

fn project(document: &Document, fields: &[&str]) -> Document {
    document
        .iter()
        .filter(|(key, _)| fields.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn id_of(document: &Document) -> String {
    match document.get(ID_FIELD) {
        Some(Value::String(id)) => id.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(
        &self,
        collection: Collection,
        filter: Filter,
        projection: Option<&[&str]>,
    ) -> StoreResult<Vec<Document>> {
        let guard = self.inner.read().map_err(poisoned)?;
        let rows = guard
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| matches(doc, &filter))
                    .map(|doc| match projection {
                        Some(fields) => project(doc, fields),
                        None => doc.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(rows)
    }

    async fn find_one(&self, collection: Collection, filter: Filter) -> StoreResult<Option<Document>> {
        let guard = self.inner.read().map_err(poisoned)?;
        Ok(guard
            .get(&collection)
            .and_then(|docs| docs.iter().find(|doc| matches(doc, &filter)).cloned()))
    }

    async fn insert_one(&self, collection: Collection, mut document: Document) -> StoreResult<InsertOneResult> {
        check_field_names(&document)?;
        if !document.contains_key(ID_FIELD) {
            document.insert(ID_FIELD.to_string(), Value::String(ObjectId::new().to_hex()));
        }
        let inserted_id = id_of(&document);

        let mut guard = self.inner.write().map_err(poisoned)?;
        let docs = guard.entry(collection).or_default();
        if docs.iter().any(|doc| id_of(doc) == inserted_id) {
            return Err(StoreError::DuplicateKey(inserted_id));
        }
        docs.push(document);

        Ok(InsertOneResult {
            acknowledged: true,
            inserted_id,
        })
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: Filter,
        fields: Document,
        upsert: bool,
    ) -> StoreResult<UpdateResult> {
        check_field_names(&fields)?;
        let mut guard = self.inner.write().map_err(poisoned)?;
        let docs = guard.entry(collection).or_default();

        if let Some(doc) = docs.iter_mut().find(|doc| matches(doc, &filter)) {
            let mut modified = false;
            for (key, value) in fields {
                if doc.get(&key) != Some(&value) {
                    doc.insert(key, value);
                    modified = true;
                }
            }
            return Ok(UpdateResult {
                acknowledged: true,
                matched_count: 1,
                modified_count: u64::from(modified),
                upserted_count: 0,
                upserted_id: None,
            });
        }

        if !upsert {
            return Ok(UpdateResult {
                acknowledged: true,
                matched_count: 0,
                modified_count: 0,
                upserted_count: 0,
                upserted_id: None,
            });
        }

        let mut created = Document::new();
        match filter {
            Filter::All => {}
            Filter::Id(id) => {
                created.insert(ID_FIELD.to_string(), Value::String(id.to_hex()));
            }
            Filter::Field { name, value } => {
                created.insert(name, value);
            }
        }
        created.extend(fields);
        if !created.contains_key(ID_FIELD) {
            created.insert(ID_FIELD.to_string(), Value::String(ObjectId::new().to_hex()));
        }
        let upserted_id = id_of(&created);
        docs.push(created);

        Ok(UpdateResult {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_count: 1,
            upserted_id: Some(upserted_id),
        })
    }

    async fn delete_one(&self, collection: Collection, filter: Filter) -> StoreResult<DeleteResult> {
        let mut guard = self.inner.write().map_err(poisoned)?;
        let deleted_count = match guard.get_mut(&collection) {
            Some(docs) => match docs.iter().position(|doc| matches(doc, &filter)) {
                Some(index) => {
                    docs.remove(index);
                    1
                }
                None => 0,
            },
            None => 0,
        };
        Ok(DeleteResult {
            acknowledged: true,
            deleted_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[tokio::test]
    async fn insert_assigns_object_id_and_find_by_id() {
        let store = MemoryStore::new();
        let inserted = store
            .insert_one(Collection::Shows, document(json!({"bandName": "The Amps"})))
            .await
            .unwrap();
        let id = ObjectId::parse_str(&inserted.inserted_id).expect("hex object id");

        let found = store.find(Collection::Shows, Filter::Id(id), None).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["bandName"], "The Amps");
    }

    #[tokio::test]
    async fn update_reports_unchanged_fields_as_not_modified() {
        let store = MemoryStore::new();
        store
            .insert_one(Collection::Users, document(json!({"email": "a@x.com", "role": "admin"})))
            .await
            .unwrap();

        let result = store
            .update_one(
                Collection::Users,
                Filter::field("email", "a@x.com"),
                document(json!({"role": "admin"})),
                false,
            )
            .await
            .unwrap();
        assert_eq!(result.matched_count, 1);
        assert_eq!(result.modified_count, 0);
    }

    #[tokio::test]
    async fn upsert_creates_document_with_filter_id() {
        let store = MemoryStore::new();
        let id = ObjectId::new();
        let result = store
            .update_one(Collection::Shows, Filter::Id(id), document(json!({"stage": "Main"})), true)
            .await
            .unwrap();
        assert_eq!(result.upserted_id.as_deref(), Some(id.to_hex().as_str()));

        let stored = store.find_one(Collection::Shows, Filter::Id(id)).await.unwrap().unwrap();
        assert_eq!(stored["stage"], "Main");
    }

    #[tokio::test]
    async fn delete_removes_only_first_match() {
        let store = MemoryStore::new();
        for _ in 0..2 {
            store
                .insert_one(Collection::CartTickets, document(json!({"email": "a@x.com"})))
                .await
                .unwrap();
        }
        let result = store
            .delete_one(Collection::CartTickets, Filter::field("email", "a@x.com"))
            .await
            .unwrap();
        assert_eq!(result.deleted_count, 1);
        assert_eq!(store.count(Collection::CartTickets), 1);
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected() {
        let store = MemoryStore::new();
        let id = ObjectId::new().to_hex();
        store
            .insert_one(Collection::Shows, document(json!({"_id": id})))
            .await
            .unwrap();
        let err = store
            .insert_one(Collection::Shows, document(json!({"_id": id})))
            .await
            .expect_err("duplicate");
        assert!(matches!(err, StoreError::DuplicateKey(_)));
    }

    #[tokio::test]
    async fn operator_keys_are_rejected_before_writing() {
        let store = MemoryStore::new();
        let err = store
            .insert_one(Collection::CartTickets, document(json!({"$inc": {"quantity": 1}})))
            .await
            .expect_err("operator on insert");
        assert!(matches!(err, StoreError::Conversion(_)));

        let err = store
            .update_one(Collection::Shows, Filter::All, document(json!({"$unset": "stage"})), true)
            .await
            .expect_err("operator on update");
        assert!(matches!(err, StoreError::Conversion(_)));
        assert_eq!(store.count(Collection::Shows), 0);
        assert_eq!(store.count(Collection::CartTickets), 0);
    }
}
