use async_trait::async_trait;
use bda_core::model::{AttemptRecord, Exam, ExamId};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Storage identifier for a persisted attempt (`SQLite` row id).
pub type AttemptId = i64;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// A persisted attempt together with its storage id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRow {
    pub id: AttemptId,
    pub attempt: AttemptRecord,
}

impl AttemptRow {
    #[must_use]
    pub fn new(id: AttemptId, attempt: AttemptRecord) -> Self {
        Self { id, attempt }
    }
}

/// Aggregate over every stored attempt of one exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttemptSummary {
    pub attempt_count: u32,
    pub best_score: Option<u8>,
    pub score_sum: u64,
    pub last_completed_at: Option<DateTime<Utc>>,
    pub has_passed: bool,
}

impl AttemptSummary {
    /// Fold one attempt into the summary.
    #[must_use]
    pub fn with_attempt(self, attempt: &AttemptRecord) -> Self {
        Self {
            attempt_count: self.attempt_count.saturating_add(1),
            best_score: self.best_score.max(Some(attempt.score())),
            score_sum: self.score_sum + u64::from(attempt.score()),
            last_completed_at: self.last_completed_at.max(Some(attempt.completed_at())),
            has_passed: self.has_passed || attempt.passed(),
        }
    }
}

/// Repository contract for the exam catalog.
#[async_trait]
pub trait ExamRepository: Send + Sync {
    /// Persist or replace an exam including its question set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the exam cannot be stored.
    async fn upsert_exam(&self, exam: &Exam) -> Result<(), StorageError>;

    /// Fetch an exam by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for storage or decoding failures.
    async fn get_exam(&self, id: ExamId) -> Result<Option<Exam>, StorageError>;

    /// List exams ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for storage or decoding failures.
    async fn list_exams(&self, active_only: bool, limit: u32) -> Result<Vec<Exam>, StorageError>;
}

/// Repository contract for completed attempts.
#[async_trait]
pub trait AttemptRepository: Send + Sync {
    /// Append a completed attempt and return its id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the attempt cannot be stored.
    async fn append_attempt(&self, attempt: &AttemptRecord) -> Result<AttemptId, StorageError>;

    /// Fetch an attempt by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing.
    async fn get_attempt(&self, id: AttemptId) -> Result<AttemptRecord, StorageError>;

    /// Attempts for an exam, newest `completed_at` first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for storage or decoding failures.
    async fn list_attempt_rows(
        &self,
        exam_id: ExamId,
        limit: u32,
    ) -> Result<Vec<AttemptRow>, StorageError>;

    /// Count, best, score sum, latest completion and pass flag over all
    /// attempts for an exam.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for storage or decoding failures.
    async fn attempt_summary(&self, exam_id: ExamId) -> Result<AttemptSummary, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    exams: Arc<Mutex<HashMap<ExamId, Exam>>>,
    attempts: Arc<Mutex<Vec<AttemptRow>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn limit_usize(limit: u32) -> usize {
    usize::try_from(limit).unwrap_or(usize::MAX)
}

#[async_trait]
impl ExamRepository for InMemoryRepository {
    async fn upsert_exam(&self, exam: &Exam) -> Result<(), StorageError> {
        let mut guard = self.exams.lock().map_err(poisoned)?;
        guard.insert(exam.id(), exam.clone());
        Ok(())
    }

    async fn get_exam(&self, id: ExamId) -> Result<Option<Exam>, StorageError> {
        let guard = self.exams.lock().map_err(poisoned)?;
        Ok(guard.get(&id).cloned())
    }

    async fn list_exams(&self, active_only: bool, limit: u32) -> Result<Vec<Exam>, StorageError> {
        let guard = self.exams.lock().map_err(poisoned)?;
        let mut exams: Vec<Exam> = guard
            .values()
            .filter(|exam| !active_only || exam.is_active())
            .cloned()
            .collect();
        exams.sort_by_key(Exam::id);
        exams.truncate(limit_usize(limit));
        Ok(exams)
    }
}

#[async_trait]
impl AttemptRepository for InMemoryRepository {
    async fn append_attempt(&self, attempt: &AttemptRecord) -> Result<AttemptId, StorageError> {
        let mut guard = self.attempts.lock().map_err(poisoned)?;
        let id = AttemptId::try_from(guard.len() + 1)
            .map_err(|_| StorageError::Serialization("attempt id overflow".into()))?;
        guard.push(AttemptRow::new(id, attempt.clone()));
        Ok(id)
    }

    async fn get_attempt(&self, id: AttemptId) -> Result<AttemptRecord, StorageError> {
        let guard = self.attempts.lock().map_err(poisoned)?;
        guard
            .iter()
            .find(|row| row.id == id)
            .map(|row| row.attempt.clone())
            .ok_or(StorageError::NotFound)
    }

    async fn list_attempt_rows(
        &self,
        exam_id: ExamId,
        limit: u32,
    ) -> Result<Vec<AttemptRow>, StorageError> {
        let guard = self.attempts.lock().map_err(poisoned)?;
        let mut rows: Vec<AttemptRow> = guard
            .iter()
            .filter(|row| row.attempt.exam_id() == exam_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.attempt
                .completed_at()
                .cmp(&a.attempt.completed_at())
                .then(b.id.cmp(&a.id))
        });
        rows.truncate(limit_usize(limit));
        Ok(rows)
    }

    async fn attempt_summary(&self, exam_id: ExamId) -> Result<AttemptSummary, StorageError> {
        let guard = self.attempts.lock().map_err(poisoned)?;
        Ok(guard
            .iter()
            .filter(|row| row.attempt.exam_id() == exam_id)
            .fold(AttemptSummary::default(), |summary, row| {
                summary.with_attempt(&row.attempt)
            }))
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub exams: Arc<dyn ExamRepository>,
    pub attempts: Arc<dyn AttemptRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let exams: Arc<dyn ExamRepository> = Arc::new(repo.clone());
        let attempts: Arc<dyn AttemptRepository> = Arc::new(repo);
        Self { exams, attempts }
    }
}
