use chrono::{DateTime, Utc};
use std::sync::Arc;

use bda_core::model::{AttemptRecord, ExamId, FinishReason};
use storage::repository::{
    AttemptId, AttemptRepository, AttemptRow, AttemptSummary, InMemoryRepository, StorageError,
};

use crate::error::HistoryError;

/// Presentation-agnostic list item for a completed attempt.
///
/// No pre-formatted strings: the UI owns localisation of dates and durations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptListItem {
    pub id: AttemptId,
    pub completed_at: DateTime<Utc>,
    pub score: u8,
    pub correct_count: u32,
    pub total_questions: u32,
    pub time_spent_secs: u32,
    pub passed: bool,
    pub reason: FinishReason,
}

impl AttemptListItem {
    #[must_use]
    pub fn from_attempt(id: AttemptId, attempt: &AttemptRecord) -> Self {
        Self {
            id,
            completed_at: attempt.completed_at(),
            score: attempt.score(),
            correct_count: attempt.correct_count(),
            total_questions: attempt.total_questions(),
            time_spent_secs: attempt.time_spent_secs(),
            passed: attempt.passed(),
            reason: attempt.reason(),
        }
    }

    #[must_use]
    pub fn from_row(row: &AttemptRow) -> Self {
        Self::from_attempt(row.id, &row.attempt)
    }
}

/// Aggregate of every stored attempt at one exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExamStats {
    pub attempt_count: u32,
    pub best_score: Option<u8>,
    pub average_score: Option<u8>,
    pub last_attempt_at: Option<DateTime<Utc>>,
    pub has_passed: bool,
}

impl ExamStats {
    #[must_use]
    pub fn from_summary(summary: &AttemptSummary) -> Self {
        if summary.attempt_count == 0 {
            return Self::default();
        }

        let count = u64::from(summary.attempt_count);
        // Half-up, matching how session scores are rounded.
        let average = (2 * summary.score_sum + count) / (2 * count);

        Self {
            attempt_count: summary.attempt_count,
            best_score: summary.best_score,
            average_score: u8::try_from(average).ok(),
            last_attempt_at: summary.last_completed_at,
            has_passed: summary.has_passed,
        }
    }

    #[must_use]
    pub fn has_attempts(&self) -> bool {
        self.attempt_count > 0
    }
}

/// Read-side facade over stored attempts.
#[derive(Clone)]
pub struct AttemptHistoryService {
    attempts: Arc<dyn AttemptRepository>,
}

impl AttemptHistoryService {
    #[must_use]
    pub fn new(attempts: Arc<dyn AttemptRepository>) -> Self {
        Self { attempts }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryRepository::new()))
    }

    /// Recent attempts for an exam, newest first.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Storage` on repository failures.
    pub async fn list_attempts(
        &self,
        exam_id: ExamId,
        limit: u32,
    ) -> Result<Vec<AttemptListItem>, HistoryError> {
        let rows = self.attempts.list_attempt_rows(exam_id, limit).await?;
        Ok(rows.iter().map(AttemptListItem::from_row).collect())
    }

    /// # Errors
    ///
    /// Returns `HistoryError::AttemptNotFound` for an unknown id.
    pub async fn get_attempt(&self, id: AttemptId) -> Result<AttemptRecord, HistoryError> {
        match self.attempts.get_attempt(id).await {
            Err(StorageError::NotFound) => Err(HistoryError::AttemptNotFound(id)),
            other => Ok(other?),
        }
    }

    /// Stats over all attempts for an exam.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Storage` on repository failures.
    pub async fn exam_stats(&self, exam_id: ExamId) -> Result<ExamStats, HistoryError> {
        let summary = self.attempts.attempt_summary(exam_id).await?;
        Ok(ExamStats::from_summary(&summary))
    }
}
