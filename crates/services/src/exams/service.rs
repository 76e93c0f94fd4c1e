use std::sync::Arc;

use rand::rng;
use rand::seq::SliceRandom;
use tracing::{info, warn};

use bda_core::model::{
    AttemptRecord, Exam, ExamId, ExamOutcome, FinishReason, Question, SessionResult,
};
use storage::repository::{AttemptId, AttemptRepository, ExamRepository, InMemoryRepository};

use super::run::{ExamMeta, ExamRun};
use crate::Clock;
use crate::error::ExamServiceError;

/// A finished run that has been persisted.
///
/// `questions` are in the order the run presented them, so
/// `result.answers` indexes straight into them. Empty when the stored
/// attempt no longer matches its exam's questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedExam {
    pub attempt_id: AttemptId,
    pub exam: ExamMeta,
    pub questions: Vec<Question>,
    pub result: SessionResult,
}

impl CompletedExam {
    /// Rebuild a completed attempt from storage for review.
    #[must_use]
    pub fn from_stored(attempt_id: AttemptId, exam: &Exam, attempt: &AttemptRecord) -> Self {
        Self {
            attempt_id,
            exam: ExamMeta::from(exam),
            questions: presented_questions(exam, attempt).unwrap_or_default(),
            result: attempt.result().clone(),
        }
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.result.passed(self.exam.passing_score)
    }

    #[must_use]
    pub fn outcome(&self) -> ExamOutcome {
        ExamOutcome::Completed(self.result.clone())
    }
}

fn presented_questions(exam: &Exam, attempt: &AttemptRecord) -> Option<Vec<Question>> {
    if attempt.question_order().is_empty() {
        let total = usize::try_from(attempt.total_questions()).ok()?;
        return (exam.question_count() == total).then(|| exam.questions().to_vec());
    }
    attempt
        .question_order()
        .iter()
        .map(|id| exam.questions().iter().find(|q| q.id() == *id).cloned())
        .collect()
}

/// Starts exam runs from storage and persists their results.
#[derive(Clone)]
pub struct ExamSessionService {
    clock: Clock,
    exams: Arc<dyn ExamRepository>,
    attempts: Arc<dyn AttemptRepository>,
    shuffle_questions: bool,
}

impl ExamSessionService {
    #[must_use]
    pub fn new(
        clock: Clock,
        exams: Arc<dyn ExamRepository>,
        attempts: Arc<dyn AttemptRepository>,
    ) -> Self {
        Self {
            clock,
            exams,
            attempts,
            shuffle_questions: false,
        }
    }

    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        let repo = InMemoryRepository::new();
        Self::new(clock, Arc::new(repo.clone()), Arc::new(repo))
    }

    #[must_use]
    pub fn with_shuffle_questions(mut self, shuffle_questions: bool) -> Self {
        self.shuffle_questions = shuffle_questions;
        self
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Load an exam and start a run over its questions.
    ///
    /// # Errors
    ///
    /// Returns `ExamServiceError::NotFound` for an unknown id,
    /// `ExamServiceError::Inactive` for a retired exam, and storage or
    /// session errors otherwise.
    pub async fn start_exam(&self, exam_id: ExamId) -> Result<ExamRun, ExamServiceError> {
        let exam = self
            .exams
            .get_exam(exam_id)
            .await?
            .ok_or(ExamServiceError::NotFound(exam_id))?;
        if !exam.is_active() {
            return Err(ExamServiceError::Inactive(exam_id));
        }

        let meta = ExamMeta::from(&exam);
        let mut questions = exam.into_questions();
        if self.shuffle_questions {
            let mut rng = rng();
            questions.as_mut_slice().shuffle(&mut rng);
        }

        Ok(ExamRun::start(meta, questions, self.clock.now())?)
    }

    /// Finish the run as submitted by the user and persist it.
    ///
    /// A run the timer already finished is persisted with its expired result.
    ///
    /// # Errors
    ///
    /// Returns `ExamServiceError` for session or persistence failures.
    pub async fn submit(&self, run: &mut ExamRun) -> Result<CompletedExam, ExamServiceError> {
        if !run.is_finished() {
            run.finish(FinishReason::Submitted)?;
        }
        self.persist_result(run).await
    }

    /// Persist a run the countdown finished.
    ///
    /// Takes the run mutably to record the attempt id on it.
    ///
    /// # Errors
    ///
    /// Returns `ExamServiceError::NotFinished` if the run is still in progress
    /// and `ExamServiceError::NotExpired` if it was submitted instead.
    pub async fn record_expired(&self, run: &mut ExamRun) -> Result<CompletedExam, ExamServiceError> {
        let reason = run.result().map(|result| result.reason);
        match reason {
            None => Err(ExamServiceError::NotFinished),
            Some(FinishReason::TimeExpired) => self.persist_result(run).await,
            Some(FinishReason::Submitted) => Err(ExamServiceError::NotExpired),
        }
    }

    /// Append the run's result as an attempt, at most once per run.
    ///
    /// Calling this again after a successful write returns the stored id
    /// without writing another row; a failed write can be retried.
    ///
    /// # Errors
    ///
    /// Returns `ExamServiceError::NotFinished` for an unfinished run, or
    /// attempt validation and storage errors.
    pub async fn persist_result(&self, run: &mut ExamRun) -> Result<CompletedExam, ExamServiceError> {
        let result = run.result().cloned().ok_or(ExamServiceError::NotFinished)?;

        if let Some(attempt_id) = run.attempt_id() {
            return Ok(completed_exam(run, attempt_id, result));
        }

        let completed_at = self.clock.now().max(run.started_at());
        let record = AttemptRecord::from_result(
            run.exam_id(),
            run.started_at(),
            completed_at,
            run.meta().passing_score,
            result.clone(),
        )?
        .with_question_order(run.question_order())?;

        let attempt_id = match self.attempts.append_attempt(&record).await {
            Ok(id) => id,
            Err(err) => {
                warn!(run = %run.id(), error = %err, "failed to persist exam attempt");
                return Err(err.into());
            }
        };
        run.mark_persisted(attempt_id);
        info!(
            run = %run.id(),
            attempt = attempt_id,
            passed = record.passed(),
            "exam attempt persisted"
        );

        Ok(completed_exam(run, attempt_id, result))
    }
}

fn completed_exam(run: &ExamRun, attempt_id: AttemptId, result: SessionResult) -> CompletedExam {
    CompletedExam {
        attempt_id,
        exam: run.meta().clone(),
        questions: run.session().questions().to_vec(),
        result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bda_core::model::OptionIndex;
    use bda_core::session::SessionError;
    use bda_core::time::fixed_now;
    use storage::fixtures::practice_exam;
    use storage::repository::StorageError;

    async fn service_with_exam(active: bool) -> (ExamSessionService, InMemoryRepository) {
        let repo = InMemoryRepository::new();
        let exam = practice_exam(ExamId::new(1)).unwrap().with_active(active);
        repo.upsert_exam(&exam).await.unwrap();
        let svc = ExamSessionService::new(
            Clock::fixed(fixed_now()),
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
        );
        (svc, repo)
    }

    #[tokio::test]
    async fn start_exam_rejects_missing_and_inactive() {
        let (svc, _) = service_with_exam(false).await;
        assert!(matches!(
            svc.start_exam(ExamId::new(1)).await,
            Err(ExamServiceError::Inactive(_))
        ));
        assert!(matches!(
            svc.start_exam(ExamId::new(2)).await,
            Err(ExamServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn start_exam_keeps_authored_order_without_shuffle() {
        let (svc, _) = service_with_exam(true).await;
        let run = svc.start_exam(ExamId::new(1)).await.unwrap();
        let ids: Vec<u64> = run
            .session()
            .questions()
            .iter()
            .map(|q| q.id().value())
            .collect();
        assert_eq!(ids, (1..=50).collect::<Vec<_>>());
        assert_eq!(run.session().remaining_secs(), 3600);
        assert_eq!(run.started_at(), fixed_now());
    }

    #[tokio::test]
    async fn shuffle_preserves_question_set() {
        let (svc, _) = service_with_exam(true).await;
        let svc = svc.with_shuffle_questions(true);
        let run = svc.start_exam(ExamId::new(1)).await.unwrap();
        let mut ids: Vec<u64> = run
            .session()
            .questions()
            .iter()
            .map(|q| q.id().value())
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=50).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn submit_persists_exactly_once() {
        let (svc, repo) = service_with_exam(true).await;
        let mut run = svc.start_exam(ExamId::new(1)).await.unwrap();
        run.select_answer(0, OptionIndex::new(1).unwrap()).unwrap();

        let first = svc.submit(&mut run).await.unwrap();
        let second = svc.submit(&mut run).await.unwrap();
        assert_eq!(first.attempt_id, second.attempt_id);
        assert_eq!(first.result.correct_count, 1);
        assert_eq!(first.result.score, 2);
        assert!(!first.passed());

        let rows = repo.list_attempt_rows(ExamId::new(1), 10).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].attempt.reason(), FinishReason::Submitted);
    }

    #[tokio::test]
    async fn record_expired_requires_finished_run() {
        let (svc, _) = service_with_exam(true).await;
        let mut run = svc.start_exam(ExamId::new(1)).await.unwrap();
        assert!(matches!(
            svc.record_expired(&mut run).await,
            Err(ExamServiceError::NotFinished)
        ));

        for _ in 0..3600 {
            let _ = run.tick();
        }
        let completed = svc.record_expired(&mut run).await.unwrap();
        assert_eq!(completed.result.reason, FinishReason::TimeExpired);
        assert_eq!(completed.result.time_spent_secs, 3600);
        assert_eq!(completed.outcome().result(), Some(&completed.result));
        assert_eq!(completed.questions.len(), 50);
    }

    #[tokio::test]
    async fn record_expired_rejects_submitted_run() {
        let (svc, repo) = service_with_exam(true).await;
        let mut run = svc.start_exam(ExamId::new(1)).await.unwrap();
        run.finish(FinishReason::Submitted).unwrap();

        assert!(matches!(
            svc.record_expired(&mut run).await,
            Err(ExamServiceError::NotExpired)
        ));
        assert!(run.attempt_id().is_none());
        assert!(repo.list_attempt_rows(ExamId::new(1), 10).await.unwrap().is_empty());

        let submitted = svc.submit(&mut run).await.unwrap();
        assert_eq!(submitted.result.reason, FinishReason::Submitted);
    }

    #[tokio::test]
    async fn stored_attempt_rebuilds_presented_questions() {
        let (svc, repo) = service_with_exam(true).await;
        let svc = svc.with_shuffle_questions(true);
        let mut run = svc.start_exam(ExamId::new(1)).await.unwrap();
        let live = svc.submit(&mut run).await.unwrap();

        let exam = repo.get_exam(ExamId::new(1)).await.unwrap().unwrap();
        let attempt = repo.get_attempt(live.attempt_id).await.unwrap();
        let stored = CompletedExam::from_stored(live.attempt_id, &exam, &attempt);
        assert_eq!(stored, live);

        let fewer = Exam::new(
            exam.id(),
            exam.title(),
            exam.category(),
            exam.difficulty(),
            exam.duration_secs(),
            exam.questions()[..10].to_vec(),
        )
        .unwrap();
        assert!(
            CompletedExam::from_stored(live.attempt_id, &fewer, &attempt)
                .questions
                .is_empty()
        );
    }

    #[tokio::test]
    async fn submit_after_expiry_keeps_expired_result() {
        let (svc, _) = service_with_exam(true).await;
        let mut run = svc.start_exam(ExamId::new(1)).await.unwrap();
        for _ in 0..3600 {
            let _ = run.tick();
        }
        let completed = svc.submit(&mut run).await.unwrap();
        assert_eq!(completed.result.reason, FinishReason::TimeExpired);
        assert_eq!(
            run.select_answer(0, OptionIndex::new(0).unwrap()),
            Err(SessionError::Finished)
        );
    }

    struct FailingAttempts;

    #[async_trait::async_trait]
    impl AttemptRepository for FailingAttempts {
        async fn append_attempt(&self, _attempt: &AttemptRecord) -> Result<AttemptId, StorageError> {
            Err(StorageError::Connection("offline".into()))
        }

        async fn get_attempt(&self, _id: AttemptId) -> Result<AttemptRecord, StorageError> {
            Err(StorageError::NotFound)
        }

        async fn list_attempt_rows(
            &self,
            _exam_id: ExamId,
            _limit: u32,
        ) -> Result<Vec<storage::repository::AttemptRow>, StorageError> {
            Ok(Vec::new())
        }

        async fn attempt_summary(
            &self,
            _exam_id: ExamId,
        ) -> Result<storage::repository::AttemptSummary, StorageError> {
            Ok(storage::repository::AttemptSummary::default())
        }
    }

    #[tokio::test]
    async fn failed_persist_leaves_run_retryable() {
        let repo = InMemoryRepository::new();
        repo.upsert_exam(&practice_exam(ExamId::new(1)).unwrap())
            .await
            .unwrap();
        let failing = ExamSessionService::new(
            Clock::fixed(fixed_now()),
            Arc::new(repo.clone()),
            Arc::new(FailingAttempts),
        );
        let mut run = failing.start_exam(ExamId::new(1)).await.unwrap();
        assert!(matches!(
            failing.submit(&mut run).await,
            Err(ExamServiceError::Storage(_))
        ));
        assert!(run.is_finished());
        assert!(run.attempt_id().is_none());

        let working = ExamSessionService::new(
            Clock::fixed(fixed_now()),
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
        );
        let completed = working.persist_result(&mut run).await.unwrap();
        assert_eq!(run.attempt_id(), Some(completed.attempt_id));
    }
}
