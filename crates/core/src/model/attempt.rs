use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::answers::AnswerMap;
use crate::model::ids::{ExamId, QuestionId};
use crate::model::result::{FinishReason, SessionResult};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AttemptError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("correct answers ({correct}) exceed total questions ({total})")]
    CountMismatch { correct: u32, total: u32 },

    #[error("score must be <= 100, got {0}")]
    InvalidScore(u8),

    #[error("attempt has no questions")]
    NoQuestions,

    #[error("question order lists {order} questions, attempt has {total}")]
    OrderMismatch { order: usize, total: u32 },
}

/// Persisted record of one completed exam attempt.
///
/// `answers` are keyed by the position a question had in the session. The
/// presented order maps those positions back to question ids, so an attempt
/// taken with shuffled questions still resolves against its exam. An empty
/// order means the questions were presented in the exam's stored order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRecord {
    exam_id: ExamId,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    passed: bool,
    question_order: Vec<QuestionId>,
    result: SessionResult,
}

impl AttemptRecord {
    /// Build a record for a result that was just computed by a session.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::InvalidTimeRange` if `completed_at` is before `started_at`.
    pub fn from_result(
        exam_id: ExamId,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        passing_score: u8,
        result: SessionResult,
    ) -> Result<Self, AttemptError> {
        let passed = result.passed(passing_score);
        Self::from_persisted(exam_id, started_at, completed_at, passed, result)
    }

    /// Rehydrate a record from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError` if the stored counters or timestamps are inconsistent.
    pub fn from_persisted(
        exam_id: ExamId,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        passed: bool,
        result: SessionResult,
    ) -> Result<Self, AttemptError> {
        if completed_at < started_at {
            return Err(AttemptError::InvalidTimeRange);
        }
        if result.total_questions == 0 {
            return Err(AttemptError::NoQuestions);
        }
        if result.correct_count > result.total_questions {
            return Err(AttemptError::CountMismatch {
                correct: result.correct_count,
                total: result.total_questions,
            });
        }
        if result.score > 100 {
            return Err(AttemptError::InvalidScore(result.score));
        }

        Ok(Self {
            exam_id,
            started_at,
            completed_at,
            passed,
            question_order: Vec::new(),
            result,
        })
    }

    /// Attach the order questions were presented in.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::OrderMismatch` unless the order is empty or
    /// lists exactly `total_questions` ids.
    pub fn with_question_order(mut self, order: Vec<QuestionId>) -> Result<Self, AttemptError> {
        let matches_total =
            u32::try_from(order.len()).is_ok_and(|n| n == self.result.total_questions);
        if !order.is_empty() && !matches_total {
            return Err(AttemptError::OrderMismatch {
                order: order.len(),
                total: self.result.total_questions,
            });
        }
        self.question_order = order;
        Ok(self)
    }

    #[must_use]
    pub fn exam_id(&self) -> ExamId {
        self.exam_id
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.passed
    }

    #[must_use]
    pub fn score(&self) -> u8 {
        self.result.score
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.result.correct_count
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.result.total_questions
    }

    #[must_use]
    pub fn time_spent_secs(&self) -> u32 {
        self.result.time_spent_secs
    }

    #[must_use]
    pub fn reason(&self) -> FinishReason {
        self.result.reason
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerMap {
        &self.result.answers
    }

    #[must_use]
    pub fn result(&self) -> &SessionResult {
        &self.result
    }

    #[must_use]
    pub fn question_order(&self) -> &[QuestionId] {
        &self.question_order
    }

    /// Question shown at `position`, if the presented order was recorded.
    #[must_use]
    pub fn question_at(&self, position: usize) -> Option<QuestionId> {
        self.question_order.get(position).copied()
    }
}
