// src/services/recorder.rs

use chrono::Utc;

use super::ProgressService;
use crate::{
    error::AppError,
    models::{
        progress::{CourseProgress, ModuleProgress},
        quiz::AttemptResult,
    },
    store::{
        self,
        records::{EvaluationRecord, ModuleRecord},
    },
    utils::ids::ensure_segment,
};

impl ProgressService {
    /// Stores `result` as the user's latest, unconfirmed attempt on the module.
    /// Overwrites whatever attempt was stored before, except that the stored
    /// best score never goes down.
    pub async fn record_attempt(
        &self,
        user_id: &str,
        course_id: &str,
        module_id: &str,
        result: &AttemptResult,
    ) -> Result<(), AppError> {
        ensure_ids(user_id, course_id, module_id)?;

        let path = self.paths.evaluation(module_id, user_id);
        let mut record = EvaluationRecord::new(user_id, course_id, module_id, result);
        record.confirmed = false;

        let previous: Option<EvaluationRecord> = store::read(self.store(), &path).await?;
        if let Some(previous) = previous {
            record.best_score = record.best_score.max(previous.best_score);
        }

        store::write(self.store(), &path, &record).await
    }

    /// Accepts the latest attempt.
    ///
    /// The attempt is marked confirmed. When its best score reaches the pass
    /// threshold the module becomes completed with that score and the course
    /// summary is recalculated; otherwise module progress is left untouched.
    /// Safe to call again after a failure.
    pub async fn confirm_attempt(
        &self,
        user_id: &str,
        course_id: &str,
        module_id: &str,
    ) -> Result<ModuleProgress, AppError> {
        ensure_ids(user_id, course_id, module_id)?;

        let evaluation_path = self.paths.evaluation(module_id, user_id);
        let mut record: EvaluationRecord = store::read(self.store(), &evaluation_path)
            .await?
            .ok_or(AppError::NotFound("No attempt to confirm".to_string()))?;

        if record.course_id != course_id {
            return Err(AppError::BadRequest(format!(
                "Latest attempt on module '{}' belongs to course '{}'",
                module_id, record.course_id
            )));
        }

        record.confirmed = true;

        if !self.policy.passes(record.best_score) {
            store::write(self.store(), &evaluation_path, &record).await?;
            tracing::info!(
                user_id,
                module_id,
                best_score = record.best_score,
                "Attempt confirmed below pass threshold"
            );
            return self.module_progress(user_id, course_id, module_id).await;
        }

        let progress = ModuleProgress {
            module_id: module_id.to_string(),
            completed: true,
            score: record.best_score,
            last_updated: Some(Utc::now()),
        };

        self.store()
            .set_many(vec![
                (evaluation_path, store::encode(&record)?),
                (
                    self.paths.module_progress(user_id, course_id, module_id),
                    store::encode(&ModuleRecord::from(&progress))?,
                ),
            ])
            .await?;

        tracing::info!(user_id, course_id, module_id, score = progress.score, "Module completed");

        self.recalculate(user_id, course_id).await?;
        Ok(progress)
    }

    /// Completes a module without a quiz (e.g. reading material).
    /// Quiz modules only complete through `confirm_attempt`. An existing score is kept.
    pub async fn mark_module_complete(
        &self,
        user_id: &str,
        course_id: &str,
        module_id: &str,
    ) -> Result<ModuleProgress, AppError> {
        ensure_ids(user_id, course_id, module_id)?;

        let course = self
            .course(course_id)
            .await?
            .ok_or(AppError::NotFound("Course not found".to_string()))?;
        let module = course
            .module(module_id)
            .ok_or(AppError::NotFound("Module not found".to_string()))?;
        if module.quiz.is_some() {
            return Err(AppError::BadRequest(format!(
                "Module '{}' has a quiz and completes by passing it",
                module_id
            )));
        }

        let mut progress = self.module_progress(user_id, course_id, module_id).await?;
        progress.completed = true;
        progress.last_updated = Some(Utc::now());

        store::write(
            self.store(),
            &self.paths.module_progress(user_id, course_id, module_id),
            &ModuleRecord::from(&progress),
        )
        .await?;

        tracing::info!(user_id, course_id, module_id, "Module marked complete");

        self.recalculate(user_id, course_id).await?;
        Ok(progress)
    }

    /// Enrolls a user: every module without a record gets an incomplete one,
    /// then the course summary is created.
    pub async fn enroll(&self, user_id: &str, course_id: &str) -> Result<CourseProgress, AppError> {
        ensure_segment("user", user_id)?;
        ensure_segment("course", course_id)?;

        let course = self
            .course(course_id)
            .await?
            .ok_or(AppError::NotFound("Course not found".to_string()))?;

        let now = Utc::now();
        let mut writes = Vec::new();
        for module_id in course.module_ids() {
            let path = self.paths.module_progress(user_id, course_id, &module_id);
            if self.store().get(&path).await?.is_none() {
                let record = ModuleRecord {
                    completed: false,
                    score: 0,
                    last_updated: Some(now),
                };
                writes.push((path, store::encode(&record)?));
            }
        }

        if !writes.is_empty() {
            self.store().set_many(writes).await?;
        }

        tracing::info!(user_id, course_id, "User enrolled");
        self.recalculate(user_id, course_id).await
    }

    /// Current progress of one module. A missing record means not started.
    pub async fn module_progress(
        &self,
        user_id: &str,
        course_id: &str,
        module_id: &str,
    ) -> Result<ModuleProgress, AppError> {
        ensure_ids(user_id, course_id, module_id)?;

        let record: Option<ModuleRecord> = store::read(
            self.store(),
            &self.paths.module_progress(user_id, course_id, module_id),
        )
        .await?;

        Ok(record
            .map(|r| r.into_progress(module_id))
            .unwrap_or_else(|| ModuleProgress::not_started(module_id)))
    }

    /// The stored attempt for a module, if any.
    pub async fn latest_attempt(
        &self,
        user_id: &str,
        module_id: &str,
    ) -> Result<Option<AttemptResult>, AppError> {
        ensure_segment("user", user_id)?;
        ensure_segment("module", module_id)?;

        let record: Option<EvaluationRecord> =
            store::read(self.store(), &self.paths.evaluation(module_id, user_id)).await?;
        Ok(record.map(|r| r.to_result()))
    }
}

fn ensure_ids(user_id: &str, course_id: &str, module_id: &str) -> Result<(), AppError> {
    ensure_segment("user", user_id)?;
    ensure_segment("course", course_id)?;
    ensure_segment("module", module_id)?;
    Ok(())
}
