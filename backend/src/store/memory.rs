// src/store/memory.rs

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::DocumentStore;
use crate::error::AppError;

/// In-process document store.
/// Used when no database is configured and by the test suite.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.read_guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read_guard(&self) -> RwLockReadGuard<'_, BTreeMap<String, Value>> {
        self.documents.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, BTreeMap<String, Value>> {
        self.documents.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, path: &str) -> Result<Option<Value>, AppError> {
        Ok(self.read_guard().get(path).cloned())
    }

    async fn set(&self, path: &str, value: Value) -> Result<(), AppError> {
        self.write_guard().insert(path.to_string(), value);
        Ok(())
    }

    async fn update(&self, path: &str, fields: Map<String, Value>) -> Result<(), AppError> {
        let mut documents = self.write_guard();
        match documents.get_mut(path) {
            Some(Value::Object(existing)) => existing.extend(fields),
            _ => {
                documents.insert(path.to_string(), Value::Object(fields));
            }
        }
        Ok(())
    }

    async fn children(&self, path: &str) -> Result<Vec<String>, AppError> {
        let prefix = format!("{}/", path);
        let documents = self.read_guard();

        let children: BTreeSet<String> = documents
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .filter_map(|(key, _)| key[prefix.len()..].split('/').next())
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();

        Ok(children.into_iter().collect())
    }

    async fn set_many(&self, writes: Vec<(String, Value)>) -> Result<(), AppError> {
        let mut documents = self.write_guard();
        for (path, value) in writes {
            documents.insert(path, value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn set_then_get() {
        let store = MemoryStore::new();
        store.set("ns/a", json!({"x": 1})).await.unwrap();

        assert_eq!(store.get("ns/a").await.unwrap(), Some(json!({"x": 1})));
        assert_eq!(store.get("ns/b").await.unwrap(), None);
    }

    #[tokio::test]
    async fn update_merges_fields() {
        let store = MemoryStore::new();
        store.set("doc", json!({"a": 1, "b": 2})).await.unwrap();

        let mut fields = Map::new();
        fields.insert("b".into(), json!(3));
        fields.insert("c".into(), json!(4));
        store.update("doc", fields).await.unwrap();

        assert_eq!(store.get("doc").await.unwrap(), Some(json!({"a": 1, "b": 3, "c": 4})));
    }

    #[tokio::test]
    async fn update_creates_missing_document() {
        let store = MemoryStore::new();
        let mut fields = Map::new();
        fields.insert("name".into(), json!("Ada"));
        store.update("users/u1", fields).await.unwrap();

        assert_eq!(store.get("users/u1").await.unwrap(), Some(json!({"name": "Ada"})));
    }

    #[tokio::test]
    async fn children_lists_immediate_segments_once() {
        let store = MemoryStore::new();
        store.set("p/u1/c1", json!({})).await.unwrap();
        store.set("p/u1/c1/m1", json!({})).await.unwrap();
        store.set("p/u1/c1/m2", json!({})).await.unwrap();
        store.set("p/u1/c2/m1", json!({})).await.unwrap();
        store.set("p/u1/c1-x/m1", json!({})).await.unwrap();
        store.set("p/u10/c9", json!({})).await.unwrap();

        assert_eq!(store.children("p/u1").await.unwrap(), vec!["c1", "c1-x", "c2"]);
        assert_eq!(store.children("p/u1/c1").await.unwrap(), vec!["m1", "m2"]);
        assert!(store.children("p/nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn parent_and_child_documents_are_independent() {
        let store = MemoryStore::new();
        store.set("p/u/c/m", json!({"completed": true})).await.unwrap();
        store.set("p/u/c", json!({"progress": 100})).await.unwrap();

        assert_eq!(store.get("p/u/c/m").await.unwrap(), Some(json!({"completed": true})));
    }

    #[tokio::test]
    async fn set_many_writes_every_path() {
        let store = MemoryStore::new();
        store
            .set_many(vec![("a".into(), json!(1)), ("b".into(), json!(2))])
            .await
            .unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("b").await.unwrap(), Some(json!(2)));
    }
}
