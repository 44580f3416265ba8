// src/models/quiz.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub prompt: String,

    /// Option texts in display order.
    pub options: Vec<String>,

    /// Index into `options` of the right answer.
    pub correct_index: usize,
}

/// Ordered questions of a module quiz.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizDefinition {
    pub questions: Vec<Question>,
}

impl QuizDefinition {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Questions as shown to a learner, without the correct answers.
    pub fn public_questions(&self) -> Vec<PublicQuestion> {
        self.questions
            .iter()
            .enumerate()
            .map(|(index, q)| PublicQuestion {
                index,
                prompt: q.prompt.clone(),
                options: q.options.clone(),
            })
            .collect()
    }
}

/// Question index -> selected option index.
pub type AnswerSet = BTreeMap<usize, usize>;

/// DTO for sending a question to the client (excludes the correct index).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicQuestion {
    pub index: usize,
    pub prompt: String,
    pub options: Vec<String>,
}

/// How one question was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOutcome {
    pub selected: usize,
    pub correct: usize,
    pub is_correct: bool,
}

/// Outcome of scoring one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptResult {
    /// Percentage of correct answers, 0..=100.
    pub score: u8,

    /// Highest score across this user's attempts on the module.
    pub best_score: u8,

    pub passed: bool,

    pub per_question: BTreeMap<usize, QuestionOutcome>,

    /// Set once the learner accepts the attempt; never reset.
    pub confirmed: bool,

    pub timestamp: DateTime<Utc>,
}

/// DTO for submitting a quiz attempt.
#[derive(Debug, Deserialize)]
pub struct SubmitAttemptRequest {
    pub answers: AnswerSet,
}
