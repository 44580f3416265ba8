// src/services/aggregate.rs

use std::collections::BTreeMap;

use super::ProgressService;
use crate::{
    error::AppError,
    models::progress::{CourseProgress, ModuleProgress},
    store::{
        self,
        records::{CourseRecord, ModuleRecord},
    },
    utils::ids::ensure_segment,
};

/// Derives course progress from module records.
///
/// Only modules listed by the course definition count; records for modules that
/// were removed from the course are ignored. Modules without a record show up
/// as not started. `last_updated` is the newest module timestamp, so the same
/// inputs always give the same output.
pub fn derive_course_progress(
    user_id: &str,
    course_id: &str,
    module_ids: &[String],
    records: BTreeMap<String, ModuleProgress>,
) -> CourseProgress {
    let modules: BTreeMap<String, ModuleProgress> = module_ids
        .iter()
        .map(|id| {
            let progress = records
                .get(id)
                .cloned()
                .unwrap_or_else(|| ModuleProgress::not_started(id.clone()));
            (id.clone(), progress)
        })
        .collect();

    let total = modules.len();
    let completed = modules.values().filter(|m| m.completed).count();

    let progress = if total > 0 {
        ((200 * completed + total) / (2 * total)) as u8
    } else {
        0
    };

    CourseProgress {
        course_id: course_id.to_string(),
        user_id: user_id.to_string(),
        progress,
        completed: total > 0 && completed == total,
        last_updated: modules.values().filter_map(|m| m.last_updated).max(),
        modules,
    }
}

impl ProgressService {
    /// Recomputes and stores the course summary from the current module records.
    ///
    /// A course that does not exist (or has no modules yet) yields progress 0,
    /// not completed.
    pub async fn recalculate(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> Result<CourseProgress, AppError> {
        ensure_segment("user", user_id)?;
        ensure_segment("course", course_id)?;

        let module_ids = match self.course(course_id).await? {
            Some(course) => course.module_ids(),
            None => {
                tracing::debug!(course_id, "Course definition missing, treating as empty");
                Vec::new()
            }
        };

        let records = self.module_records(user_id, course_id).await?;
        let progress = derive_course_progress(user_id, course_id, &module_ids, records);

        store::write(
            self.store(),
            &self.paths.course_progress(user_id, course_id),
            &CourseRecord::from(&progress),
        )
        .await?;

        tracing::debug!(
            user_id,
            course_id,
            progress = progress.progress,
            completed = progress.completed,
            "Course progress recalculated"
        );
        Ok(progress)
    }

    /// Every module record stored under a user's course.
    async fn module_records(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> Result<BTreeMap<String, ModuleProgress>, AppError> {
        let course_path = self.paths.course_progress(user_id, course_id);
        let mut records = BTreeMap::new();

        for module_id in self.store().children(&course_path).await? {
            let path = self.paths.module_progress(user_id, course_id, &module_id);
            if let Some(record) = store::read::<ModuleRecord>(self.store(), &path).await? {
                records.insert(module_id.clone(), record.into_progress(&module_id));
            }
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("m{}", i)).collect()
    }

    fn completed(ids: &[&str]) -> BTreeMap<String, ModuleProgress> {
        ids.iter()
            .map(|id| {
                (
                    id.to_string(),
                    ModuleProgress {
                        module_id: id.to_string(),
                        completed: true,
                        score: 100,
                        last_updated: None,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn half_the_modules_is_fifty_percent() {
        let progress = derive_course_progress("u", "c", &ids(4), completed(&["m1", "m3"]));
        assert_eq!(progress.progress, 50);
        assert!(!progress.completed);
        assert_eq!(progress.modules.len(), 4);
        assert!(!progress.modules["m2"].completed);
    }

    #[test]
    fn all_modules_completes_course() {
        let progress =
            derive_course_progress("u", "c", &ids(4), completed(&["m1", "m2", "m3", "m4"]));
        assert_eq!(progress.progress, 100);
        assert!(progress.completed);
    }

    #[test]
    fn no_modules_is_zero_and_incomplete() {
        let progress = derive_course_progress("u", "c", &[], completed(&["m1"]));
        assert_eq!(progress.progress, 0);
        assert!(!progress.completed);
        assert!(progress.modules.is_empty());
    }

    #[test]
    fn records_outside_the_course_are_ignored() {
        let progress = derive_course_progress("u", "c", &ids(2), completed(&["m1", "old"]));
        assert_eq!(progress.progress, 50);
        assert!(!progress.modules.contains_key("old"));
    }

    #[test]
    fn repeated_ids_keep_the_stored_record() {
        let ids = vec!["a".to_string(), "a".to_string(), "b".to_string()];
        let progress = derive_course_progress("u", "c", &ids, completed(&["a"]));
        assert!(progress.modules["a"].completed);
        assert_eq!(progress.modules.len(), 2);
        assert_eq!(progress.progress, 50);
    }

    #[test]
    fn progress_rounds_half_up() {
        let progress = derive_course_progress("u", "c", &ids(3), completed(&["m1", "m2"]));
        assert_eq!(progress.progress, 67);
        let progress = derive_course_progress("u", "c", &ids(8), completed(&["m1"]));
        assert_eq!(progress.progress, 13);
    }

    #[test]
    fn derivation_is_deterministic() {
        let a = derive_course_progress("u", "c", &ids(3), completed(&["m2"]));
        let b = derive_course_progress("u", "c", &ids(3), completed(&["m2"]));
        assert_eq!(a, b);
    }
}
