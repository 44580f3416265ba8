// src/store/mod.rs

//! Hierarchical document store addressed by slash-delimited paths.
//!
//! Every path holds at most one JSON document. A parent path and its children are
//! independent documents, so writing a course summary never touches the module
//! records stored beneath it.

pub mod memory;
pub mod paths;
pub mod postgres;
pub mod records;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::error::AppError;

pub use memory::MemoryStore;
pub use paths::StorePaths;
pub use postgres::PgStore;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Reads the document stored at `path`.
    async fn get(&self, path: &str) -> Result<Option<Value>, AppError>;

    /// Replaces the document at `path`.
    async fn set(&self, path: &str, value: Value) -> Result<(), AppError>;

    /// Merges `fields` into the object at `path`, creating it when absent.
    async fn update(&self, path: &str, fields: Map<String, Value>) -> Result<(), AppError>;

    /// Lists the distinct immediate child segments below `path`, sorted.
    async fn children(&self, path: &str) -> Result<Vec<String>, AppError>;

    /// Replaces several documents as one unit: either all writes land or none do.
    async fn set_many(&self, writes: Vec<(String, Value)>) -> Result<(), AppError>;
}

/// Reads and decodes the document at `path`.
pub async fn read<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    path: &str,
) -> Result<Option<T>, AppError> {
    match store.get(path).await? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// Encodes `value` and writes it to `path`.
pub async fn write<T: Serialize>(
    store: &dyn DocumentStore,
    path: &str,
    value: &T,
) -> Result<(), AppError> {
    let value = encode(value)?;
    store.set(path, value).await
}

pub fn encode<T: Serialize>(value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value).map_err(|e| AppError::InternalServerError(e.to_string()))
}
