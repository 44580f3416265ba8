// src/services/mod.rs

//! Progress & evaluation aggregation.
//!
//! Flow for a quiz: `evaluate` (pure scoring) -> `record_attempt` (unconfirmed)
//! -> `confirm_attempt` (module completion) -> `recalculate` (course summary).
//! Course and overall progress are always derived from module records, so they
//! can be recomputed at any time.

pub mod aggregate;
pub mod overall;
pub mod profile;
pub mod recorder;
pub mod scoring;

use std::sync::Arc;

use crate::{
    cache::TtlCache,
    config::Config,
    error::AppError,
    models::course::CourseDefinition,
    store::{self, DocumentStore, StorePaths},
};

pub use scoring::ScoringPolicy;

#[derive(Clone)]
pub struct ProgressService {
    store: Arc<dyn DocumentStore>,
    paths: StorePaths,
    policy: ScoringPolicy,
    cache: TtlCache,
}

impl ProgressService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        paths: StorePaths,
        policy: ScoringPolicy,
        cache: TtlCache,
    ) -> Self {
        Self {
            store,
            paths,
            policy,
            cache,
        }
    }

    pub fn from_config(store: Arc<dyn DocumentStore>, config: &Config) -> Self {
        Self::new(
            store,
            StorePaths::new(config.namespace.clone()),
            ScoringPolicy::new(config.passing_score),
            TtlCache::new(config.cache_ttl),
        )
    }

    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    pub fn policy(&self) -> ScoringPolicy {
        self.policy
    }

    pub fn cache(&self) -> &TtlCache {
        &self.cache
    }

    /// Reads a course definition. `None` when the course does not exist.
    pub async fn course(&self, course_id: &str) -> Result<Option<CourseDefinition>, AppError> {
        store::read(self.store.as_ref(), &self.paths.course(course_id)).await
    }

    /// Stores a course definition (authoring).
    pub async fn put_course(
        &self,
        course_id: &str,
        course: &CourseDefinition,
    ) -> Result<(), AppError> {
        crate::utils::ids::ensure_segment("course", course_id)?;
        store::write(self.store.as_ref(), &self.paths.course(course_id), course).await?;
        tracing::info!(course_id, modules = course.module_count(), "Course definition saved");
        Ok(())
    }

    fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }
}
