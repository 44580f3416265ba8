// src/services/overall.rs

use super::ProgressService;
use crate::{
    error::AppError,
    models::progress::OverallProgress,
    store::records::CourseRecord,
    utils::ids::ensure_segment,
};

/// Folds course summaries into the per-user overview.
pub fn fold_overall(courses: &[CourseRecord]) -> OverallProgress {
    if courses.is_empty() {
        return OverallProgress::default();
    }

    let total: u32 = courses.iter().map(|c| u32::from(c.progress)).sum();
    let mean = f64::from(total) / courses.len() as f64;

    OverallProgress {
        enrolled_courses: courses.len(),
        completed_courses: courses.iter().filter(|c| c.completed).count(),
        overall_progress: mean.round() as u8,
    }
}

impl ProgressService {
    /// Summarizes every course the user has a summary for.
    ///
    /// A course summary that cannot be read or decoded is skipped so the rest
    /// of the overview still renders.
    pub async fn summarize(&self, user_id: &str) -> Result<OverallProgress, AppError> {
        ensure_segment("user", user_id)?;

        let course_ids = self
            .store()
            .children(&self.paths.user_progression(user_id))
            .await?;

        let mut courses = Vec::with_capacity(course_ids.len());
        for course_id in course_ids {
            let path = self.paths.course_progress(user_id, &course_id);
            match self.store().get(&path).await {
                Ok(Some(value)) => match serde_json::from_value::<CourseRecord>(value) {
                    Ok(record) => courses.push(record),
                    Err(e) => {
                        tracing::warn!(user_id, course_id = %course_id, "Skipping malformed course summary: {}", e)
                    }
                },
                Ok(None) => {
                    tracing::debug!(user_id, course_id = %course_id, "No course summary yet, skipping")
                }
                Err(e) => {
                    tracing::warn!(user_id, course_id = %course_id, "Skipping unreadable course summary: {}", e)
                }
            }
        }

        Ok(fold_overall(&courses))
    }
}
