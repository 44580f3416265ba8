// src/store/records.rs

//! Persisted document shapes. Ids live in the path, not in the body,
//! except for evaluations which also carry them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{
    progress::{CourseProgress, ModuleProgress},
    quiz::{AnswerSet, AttemptResult, QuestionOutcome},
};

/// `<ns>/Progression/{userId}/{courseId}/{moduleId}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleRecord {
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub score: u8,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl ModuleRecord {
    pub fn into_progress(self, module_id: &str) -> ModuleProgress {
        ModuleProgress {
            module_id: module_id.to_string(),
            completed: self.completed,
            score: self.score,
            last_updated: self.last_updated,
        }
    }
}

impl From<&ModuleProgress> for ModuleRecord {
    fn from(progress: &ModuleProgress) -> Self {
        Self {
            completed: progress.completed,
            score: progress.score,
            last_updated: progress.last_updated,
        }
    }
}

/// `<ns>/Progression/{userId}/{courseId}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecord {
    pub progress: u8,
    pub completed: bool,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl From<&CourseProgress> for CourseRecord {
    fn from(progress: &CourseProgress) -> Self {
        Self {
            progress: progress.progress,
            completed: progress.completed,
            last_updated: progress.last_updated,
        }
    }
}

/// `<ns>/Evaluations/{moduleId}/{userId}`. Only the latest attempt is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRecord {
    pub user_id: String,
    pub module_id: String,
    pub course_id: String,
    pub score: u8,
    pub best_score: u8,
    pub date: DateTime<Utc>,
    pub answers: AnswerSet,
    pub passed: bool,
    pub confirmed: bool,
    #[serde(default)]
    pub per_question: BTreeMap<usize, QuestionOutcome>,
}

impl EvaluationRecord {
    pub fn new(user_id: &str, course_id: &str, module_id: &str, result: &AttemptResult) -> Self {
        let answers = result
            .per_question
            .iter()
            .map(|(index, outcome)| (*index, outcome.selected))
            .collect();

        Self {
            user_id: user_id.to_string(),
            module_id: module_id.to_string(),
            course_id: course_id.to_string(),
            score: result.score,
            best_score: result.best_score,
            date: result.timestamp,
            answers,
            passed: result.passed,
            confirmed: result.confirmed,
            per_question: result.per_question.clone(),
        }
    }

    pub fn to_result(&self) -> AttemptResult {
        AttemptResult {
            score: self.score,
            best_score: self.best_score,
            passed: self.passed,
            per_question: self.per_question.clone(),
            confirmed: self.confirmed,
            timestamp: self.date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn evaluation_record_uses_stored_field_names() {
        let mut per_question = BTreeMap::new();
        per_question.insert(0, QuestionOutcome { selected: 1, correct: 1, is_correct: true });
        let result = AttemptResult {
            score: 100,
            best_score: 100,
            passed: true,
            per_question,
            confirmed: false,
            timestamp: DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z").unwrap().to_utc(),
        };

        let value = serde_json::to_value(EvaluationRecord::new("u1", "c1", "m1", &result)).unwrap();

        assert_eq!(value["userId"], "u1");
        assert_eq!(value["moduleId"], "m1");
        assert_eq!(value["courseId"], "c1");
        assert_eq!(value["bestScore"], 100);
        assert_eq!(value["confirmed"], false);
        assert_eq!(value["answers"], json!({"0": 1}));
        assert!(value.get("date").is_some());
    }

    #[test]
    fn module_record_tolerates_missing_fields() {
        let record: ModuleRecord = serde_json::from_value(json!({"completed": true})).unwrap();
        assert_eq!(record.score, 0);
        assert!(record.last_updated.is_none());
    }
}
