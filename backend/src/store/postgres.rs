// src/store/postgres.rs

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::{PgPool, types::Json};

use super::DocumentStore;
use crate::error::AppError;

/// Document store backed by the `documents` table (one JSONB row per path).
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn get(&self, path: &str) -> Result<Option<Value>, AppError> {
        let body: Option<Json<Value>> =
            sqlx::query_scalar("SELECT body FROM documents WHERE path = $1")
                .bind(path)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to read document {}: {:?}", path, e);
                    AppError::from(e)
                })?;

        Ok(body.map(|Json(value)| value))
    }

    async fn set(&self, path: &str, value: Value) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO documents (path, body, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (path) DO UPDATE SET
                body = EXCLUDED.body,
                updated_at = NOW()
            "#,
        )
        .bind(path)
        .bind(Json(value))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to write document {}: {:?}", path, e);
            AppError::from(e)
        })?;

        Ok(())
    }

    async fn update(&self, path: &str, fields: Map<String, Value>) -> Result<(), AppError> {
        // Shallow merge when the stored body is an object, otherwise replace it.
        sqlx::query(
            r#"
            INSERT INTO documents (path, body, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (path) DO UPDATE SET
                body = CASE
                    WHEN jsonb_typeof(documents.body) = 'object' THEN documents.body || EXCLUDED.body
                    ELSE EXCLUDED.body
                END,
                updated_at = NOW()
            "#,
        )
        .bind(path)
        .bind(Json(Value::Object(fields)))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update document {}: {:?}", path, e);
            AppError::from(e)
        })?;

        Ok(())
    }

    async fn children(&self, path: &str) -> Result<Vec<String>, AppError> {
        let prefix = format!("{}/", path);
        // substr() is 1-based and counts characters.
        let offset = prefix.chars().count() as i32 + 1;

        let children: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT split_part(substr(path, $2), '/', 1) AS child
            FROM documents
            WHERE starts_with(path, $1)
            ORDER BY child
            "#,
        )
        .bind(&prefix)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list children of {}: {:?}", path, e);
            AppError::from(e)
        })?;

        Ok(children.into_iter().filter(|c| !c.is_empty()).collect())
    }

    async fn set_many(&self, writes: Vec<(String, Value)>) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        for (path, value) in writes {
            sqlx::query(
                r#"
                INSERT INTO documents (path, body, updated_at)
                VALUES ($1, $2, NOW())
                ON CONFLICT (path) DO UPDATE SET
                    body = EXCLUDED.body,
                    updated_at = NOW()
                "#,
            )
            .bind(&path)
            .bind(Json(value))
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to write document {} in batch: {:?}", path, e);
                AppError::from(e)
            })?;
        }

        tx.commit().await?;
        Ok(())
    }
}
