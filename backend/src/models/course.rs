// src/models/course.rs

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    error::AppError,
    models::quiz::{Question, QuizDefinition},
    utils::{html, ids},
};

/// Course definition as stored at `<ns>/Courses/{courseId}`.
/// Only the module collection matters to progress tracking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseDefinition {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub modules: ModuleCollection,
}

/// Modules are either keyed by id or listed in order.
/// Listed modules without an explicit `id` are identified by their position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModuleCollection {
    Keyed(BTreeMap<String, ModuleDefinition>),
    Ordered(Vec<ModuleDefinition>),
}

impl Default for ModuleCollection {
    fn default() -> Self {
        ModuleCollection::Keyed(BTreeMap::new())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz: Option<QuizDefinition>,
}

impl CourseDefinition {
    /// Total number of distinct modules (N in the progress formula).
    pub fn module_count(&self) -> usize {
        self.module_ids().len()
    }

    /// Module ids in definition order. A listed id that repeats an earlier one
    /// (explicit or positional) is dropped, matching what `module` resolves.
    pub fn module_ids(&self) -> Vec<String> {
        match &self.modules {
            ModuleCollection::Keyed(map) => map.keys().cloned().collect(),
            ModuleCollection::Ordered(list) => {
                let mut seen = BTreeSet::new();
                list.iter()
                    .enumerate()
                    .map(|(i, m)| m.id.clone().unwrap_or_else(|| i.to_string()))
                    .filter(|id| seen.insert(id.clone()))
                    .collect()
            }
        }
    }

    pub fn module(&self, module_id: &str) -> Option<&ModuleDefinition> {
        match &self.modules {
            ModuleCollection::Keyed(map) => map.get(module_id),
            ModuleCollection::Ordered(list) => list.iter().enumerate().find_map(|(i, m)| {
                let matches = match &m.id {
                    Some(id) => id == module_id,
                    None => i.to_string() == module_id,
                };
                matches.then_some(m)
            }),
        }
    }
}

/// DTO for authoring a course (admin / instructor).
#[derive(Debug, Deserialize, Validate)]
pub struct PutCourseRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 500), nested)]
    pub modules: Vec<ModuleInput>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ModuleInput {
    #[validate(custom(function = validate_id))]
    pub id: String,

    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(nested)]
    pub quiz: Option<QuizInput>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct QuizInput {
    #[validate(length(min = 1, max = 200), nested)]
    pub questions: Vec<QuestionInput>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuestionInput {
    #[validate(length(min = 1, max = 2000))]
    pub prompt: String,

    #[validate(custom(function = validate_options))]
    pub options: Vec<String>,

    pub correct_index: usize,
}

impl PutCourseRequest {
    /// Checks cross-field rules and builds the stored definition with sanitized text.
    pub fn into_definition(self) -> Result<CourseDefinition, AppError> {
        let mut seen = BTreeSet::new();
        let mut modules = BTreeMap::new();

        for module in self.modules {
            if !seen.insert(module.id.clone()) {
                return Err(AppError::BadRequest(format!(
                    "Duplicate module id '{}'",
                    module.id
                )));
            }

            let quiz = match module.quiz {
                Some(quiz) => Some(quiz.into_definition(&module.id)?),
                None => None,
            };

            modules.insert(
                module.id,
                ModuleDefinition {
                    id: None,
                    title: html::clean_text(&module.title),
                    quiz,
                },
            );
        }

        Ok(CourseDefinition {
            title: html::clean_text(&self.title),
            modules: ModuleCollection::Keyed(modules),
        })
    }
}

impl QuizInput {
    fn into_definition(self, module_id: &str) -> Result<QuizDefinition, AppError> {
        let questions = self
            .questions
            .into_iter()
            .enumerate()
            .map(|(index, q)| {
                if q.correct_index >= q.options.len() {
                    return Err(AppError::BadRequest(format!(
                        "Module '{}' question {}: correct index {} is out of range",
                        module_id, index, q.correct_index
                    )));
                }
                Ok(Question {
                    prompt: html::clean_html(&q.prompt),
                    options: q.options.iter().map(|o| html::clean_text(o)).collect(),
                    correct_index: q.correct_index,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(QuizDefinition { questions })
    }
}

fn validate_id(id: &str) -> Result<(), validator::ValidationError> {
    if !ids::is_valid_segment(id) {
        return Err(validator::ValidationError::new("invalid_id"));
    }
    Ok(())
}

fn validate_options(options: &[String]) -> Result<(), validator::ValidationError> {
    if options.len() < 2 {
        return Err(validator::ValidationError::new("at_least_two_options"));
    }
    for opt in options {
        if opt.is_empty() || opt.len() > 500 {
            return Err(validator::ValidationError::new("option_length"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keyed_modules_are_counted() {
        let course: CourseDefinition = serde_json::from_value(json!({
            "title": "Rust",
            "modules": { "m1": { "title": "Intro" }, "m2": { "title": "Ownership" } }
        }))
        .unwrap();

        assert_eq!(course.module_count(), 2);
        assert_eq!(course.module_ids(), vec!["m1", "m2"]);
        assert_eq!(course.module("m2").unwrap().title, "Ownership");
    }

    #[test]
    fn ordered_modules_use_id_or_position() {
        let course: CourseDefinition = serde_json::from_value(json!({
            "modules": [ { "title": "First" }, { "id": "named", "title": "Second" } ]
        }))
        .unwrap();

        assert_eq!(course.module_ids(), vec!["0", "named"]);
        assert_eq!(course.module("0").unwrap().title, "First");
        assert_eq!(course.module("named").unwrap().title, "Second");
        assert!(course.module("1").is_none());
    }

    #[test]
    fn repeated_ordered_ids_count_once() {
        let course: CourseDefinition = serde_json::from_value(json!({
            "modules": [ { "id": "a" }, { "id": "a" }, { "id": "b" }, { "id": "0" }, { "title": "Fifth" } ]
        }))
        .unwrap();

        assert_eq!(course.module_ids(), vec!["a", "b", "0", "4"]);
        assert_eq!(course.module_count(), 4);
    }

    #[test]
    fn missing_modules_means_empty_course() {
        let course: CourseDefinition = serde_json::from_value(json!({ "title": "Soon" })).unwrap();
        assert_eq!(course.module_count(), 0);
    }

    fn question(correct_index: usize) -> QuestionInput {
        QuestionInput {
            prompt: "<b>Pick</b><script>alert(1)</script>".into(),
            options: vec!["A".into(), "B".into()],
            correct_index,
        }
    }

    #[test]
    fn authoring_rejects_out_of_range_answer() {
        let request = PutCourseRequest {
            title: "Course".into(),
            modules: vec![ModuleInput {
                id: "m1".into(),
                title: "Module".into(),
                quiz: Some(QuizInput { questions: vec![question(2)] }),
            }],
        };

        assert!(matches!(request.into_definition(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn authoring_rejects_duplicate_module_ids() {
        let module = || ModuleInput { id: "m1".into(), title: "Module".into(), quiz: None };
        let request = PutCourseRequest { title: "Course".into(), modules: vec![module(), module()] };

        assert!(matches!(request.into_definition(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn authoring_sanitizes_prompts() {
        let request = PutCourseRequest {
            title: "Course".into(),
            modules: vec![ModuleInput {
                id: "m1".into(),
                title: "Module".into(),
                quiz: Some(QuizInput { questions: vec![question(1)] }),
            }],
        };

        let course = request.into_definition().unwrap();
        let quiz = course.module("m1").unwrap().quiz.as_ref().unwrap();
        assert_eq!(quiz.questions[0].prompt, "<b>Pick</b>");
        assert_eq!(quiz.questions[0].correct_index, 1);
    }

    #[test]
    fn well_formed_request_passes_validation() {
        let request = PutCourseRequest {
            title: "Course".into(),
            modules: vec![ModuleInput {
                id: "m1".into(),
                title: "Module".into(),
                quiz: Some(QuizInput { questions: vec![question(0)] }),
            }],
        };

        assert!(request.validate().is_ok());
    }

    #[test]
    fn validation_catches_bad_ids_and_options() {
        let request = PutCourseRequest {
            title: "Course".into(),
            modules: vec![ModuleInput {
                id: "../etc".into(),
                title: "Module".into(),
                quiz: Some(QuizInput {
                    questions: vec![QuestionInput {
                        prompt: "Only one option".into(),
                        options: vec!["A".into()],
                        correct_index: 0,
                    }],
                }),
            }],
        };

        assert!(request.validate().is_err());
    }
}
