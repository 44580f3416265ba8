// src/store/paths.rs

/// Builds document paths under a namespace.
///
/// Layout:
/// * `<ns>/Progression/{userId}/{courseId}/{moduleId}`: module progress
/// * `<ns>/Progression/{userId}/{courseId}`: course summary
/// * `<ns>/Evaluations/{moduleId}/{userId}`: latest quiz attempt
/// * `<ns>/Courses/{courseId}`: course definition
/// * `<ns>/Users/{userId}`: user profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    namespace: String,
}

impl StorePaths {
    pub fn new(namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        Self {
            namespace: namespace.trim_matches('/').to_string(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn module_progress(&self, user_id: &str, course_id: &str, module_id: &str) -> String {
        self.join(&["Progression", user_id, course_id, module_id])
    }

    pub fn course_progress(&self, user_id: &str, course_id: &str) -> String {
        self.join(&["Progression", user_id, course_id])
    }

    pub fn user_progression(&self, user_id: &str) -> String {
        self.join(&["Progression", user_id])
    }

    pub fn evaluation(&self, module_id: &str, user_id: &str) -> String {
        self.join(&["Evaluations", module_id, user_id])
    }

    pub fn course(&self, course_id: &str) -> String {
        self.join(&["Courses", course_id])
    }

    pub fn user(&self, user_id: &str) -> String {
        self.join(&["Users", user_id])
    }

    fn join(&self, segments: &[&str]) -> String {
        let tail = segments.join("/");
        if self.namespace.is_empty() {
            tail
        } else {
            format!("{}/{}", self.namespace, tail)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_existing_data() {
        let paths = StorePaths::new("school");

        assert_eq!(paths.module_progress("u1", "c1", "m1"), "school/Progression/u1/c1/m1");
        assert_eq!(paths.course_progress("u1", "c1"), "school/Progression/u1/c1");
        assert_eq!(paths.user_progression("u1"), "school/Progression/u1");
        assert_eq!(paths.evaluation("m1", "u1"), "school/Evaluations/m1/u1");
        assert_eq!(paths.course("c1"), "school/Courses/c1");
        assert_eq!(paths.user("u1"), "school/Users/u1");
    }

    #[test]
    fn empty_namespace_has_no_leading_slash() {
        let paths = StorePaths::new("/");
        assert_eq!(paths.course("c1"), "Courses/c1");
    }
}
