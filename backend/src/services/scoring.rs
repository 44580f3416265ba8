// src/services/scoring.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::ProgressService;
use crate::{
    config::PASSING_SCORE_PERCENTAGE,
    error::AppError,
    models::quiz::{AnswerSet, AttemptResult, QuestionOutcome, QuizDefinition},
    store::{self, records::EvaluationRecord},
    utils::ids::ensure_segment,
};

/// Pass threshold applied to attempt scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringPolicy {
    pub passing_score: u8,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self::new(PASSING_SCORE_PERCENTAGE)
    }
}

impl ScoringPolicy {
    pub fn new(passing_score: u8) -> Self {
        Self {
            passing_score: passing_score.min(100),
        }
    }

    pub fn passes(&self, score: u8) -> bool {
        score >= self.passing_score
    }
}

/// Percentage of `correct` out of `total`, rounded half up.
///
/// Integer form of `round(100 * correct / total)`; `total` must be non-zero.
fn percentage(correct: usize, total: usize) -> u8 {
    ((200 * correct + total) / (2 * total)) as u8
}

/// Scores one submission against a quiz. Pure: no reads, no writes.
///
/// Every question must have an answer, otherwise `IncompleteSubmission` lists the
/// unanswered indices. `best_score` is the larger of this score and `previous_best`.
pub fn score_attempt(
    quiz: &QuizDefinition,
    answers: &AnswerSet,
    previous_best: u8,
    policy: ScoringPolicy,
    now: DateTime<Utc>,
) -> Result<AttemptResult, AppError> {
    if quiz.is_empty() {
        return Err(AppError::BadRequest("Quiz has no questions".to_string()));
    }

    if let Some(index) = answers.keys().find(|&&index| index >= quiz.len()) {
        return Err(AppError::BadRequest(format!(
            "Answer given for unknown question {}",
            index
        )));
    }

    let missing: Vec<usize> = (0..quiz.len())
        .filter(|index| !answers.contains_key(index))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::IncompleteSubmission { missing });
    }

    let mut per_question = BTreeMap::new();
    let mut correct_count = 0;

    for (index, question) in quiz.questions.iter().enumerate() {
        let selected = answers[&index];
        if selected >= question.options.len() {
            return Err(AppError::BadRequest(format!(
                "Question {} has no option {}",
                index, selected
            )));
        }

        let is_correct = selected == question.correct_index;
        if is_correct {
            correct_count += 1;
        }

        per_question.insert(
            index,
            QuestionOutcome {
                selected,
                correct: question.correct_index,
                is_correct,
            },
        );
    }

    let score = percentage(correct_count, quiz.len());

    Ok(AttemptResult {
        score,
        best_score: score.max(previous_best),
        passed: policy.passes(score),
        per_question,
        confirmed: false,
        timestamp: now,
    })
}

impl ProgressService {
    /// Loads the quiz attached to a module of a course.
    pub async fn quiz(&self, course_id: &str, module_id: &str) -> Result<QuizDefinition, AppError> {
        ensure_segment("course", course_id)?;
        ensure_segment("module", module_id)?;

        let course = self
            .course(course_id)
            .await?
            .ok_or(AppError::NotFound("Course not found".to_string()))?;

        course
            .module(module_id)
            .ok_or(AppError::NotFound("Module not found".to_string()))?
            .quiz
            .clone()
            .ok_or(AppError::NotFound("Module has no quiz".to_string()))
    }

    /// Best score of the user's stored attempt on a module, 0 when there is none.
    pub async fn previous_best_score(&self, user_id: &str, module_id: &str) -> Result<u8, AppError> {
        let record: Option<EvaluationRecord> =
            store::read(self.store(), &self.paths.evaluation(module_id, user_id)).await?;
        Ok(record.map(|r| r.best_score).unwrap_or(0))
    }

    /// Scores answers for a module quiz without persisting anything.
    pub async fn evaluate(
        &self,
        user_id: &str,
        course_id: &str,
        module_id: &str,
        answers: &AnswerSet,
    ) -> Result<AttemptResult, AppError> {
        ensure_segment("user", user_id)?;
        let quiz = self.quiz(course_id, module_id).await?;
        let previous_best = self.previous_best_score(user_id, module_id).await?;

        score_attempt(&quiz, answers, previous_best, self.policy, Utc::now())
    }

    /// Scores a submission and stores it as the user's unconfirmed attempt.
    pub async fn submit_attempt(
        &self,
        user_id: &str,
        course_id: &str,
        module_id: &str,
        answers: &AnswerSet,
    ) -> Result<AttemptResult, AppError> {
        let result = self.evaluate(user_id, course_id, module_id, answers).await?;
        self.record_attempt(user_id, course_id, module_id, &result).await?;

        tracing::debug!(
            user_id,
            course_id,
            module_id,
            score = result.score,
            best_score = result.best_score,
            "Quiz attempt recorded"
        );
        Ok(result)
    }
}
