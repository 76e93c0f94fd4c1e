use chrono::{DateTime, Utc};
use tracing::{debug, info, trace};
use uuid::Uuid;

use bda_core::model::{
    Exam, ExamCategory, ExamDifficulty, ExamId, ExamOutcome, FinishReason, OptionIndex, Question,
    QuestionId, SessionResult,
};
use bda_core::session::{ExamSession, SessionError, TickOutcome};
use storage::repository::AttemptId;

/// Correlation id for one exam attempt, carried on every log event of the run.
pub type RunId = Uuid;

//
// ─── EXAM META ─────────────────────────────────────────────────────────────────
//

/// Exam metadata a run keeps after its questions move into the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamMeta {
    pub id: ExamId,
    pub title: String,
    pub category: ExamCategory,
    pub difficulty: ExamDifficulty,
    pub duration_secs: u32,
    pub passing_score: u8,
}

impl From<&Exam> for ExamMeta {
    fn from(exam: &Exam) -> Self {
        Self {
            id: exam.id(),
            title: exam.title().to_owned(),
            category: exam.category(),
            difficulty: exam.difficulty(),
            duration_secs: exam.duration_secs(),
            passing_score: exam.passing_score(),
        }
    }
}

//
// ─── RUN ───────────────────────────────────────────────────────────────────────
//

/// One attempt at an exam: a started `ExamSession` plus the context needed
/// to persist it.
#[derive(Debug, Clone)]
pub struct ExamRun {
    id: RunId,
    meta: ExamMeta,
    session: ExamSession,
    started_at: DateTime<Utc>,
    attempt_id: Option<AttemptId>,
}

impl ExamRun {
    /// Builds and starts a run over `questions` with the budget from `meta`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the question set is empty or the budget is zero.
    pub fn start(
        meta: ExamMeta,
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        let mut session = ExamSession::new(questions, meta.duration_secs)?;
        session.start()?;

        let id = Uuid::new_v4();
        info!(
            run = %id,
            exam = %meta.id,
            questions = session.total_questions(),
            duration_secs = meta.duration_secs,
            "exam run started"
        );

        Ok(Self {
            id,
            meta,
            session,
            started_at,
            attempt_id: None,
        })
    }

    #[must_use]
    pub fn id(&self) -> RunId {
        self.id
    }

    #[must_use]
    pub fn meta(&self) -> &ExamMeta {
        &self.meta
    }

    #[must_use]
    pub fn exam_id(&self) -> ExamId {
        self.meta.id
    }

    /// Read-only view of the underlying session.
    #[must_use]
    pub fn session(&self) -> &ExamSession {
        &self.session
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Storage id once the result has been persisted.
    #[must_use]
    pub fn attempt_id(&self) -> Option<AttemptId> {
        self.attempt_id
    }

    /// Question ids in the order this run presents them.
    #[must_use]
    pub fn question_order(&self) -> Vec<QuestionId> {
        self.session.questions().iter().map(Question::id).collect()
    }

    pub(crate) fn mark_persisted(&mut self, attempt_id: AttemptId) {
        self.attempt_id = Some(attempt_id);
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.session.is_finished()
    }

    #[must_use]
    pub fn result(&self) -> Option<&SessionResult> {
        self.session.result()
    }

    /// `Completed` once finished, `NoAttempt` before.
    #[must_use]
    pub fn outcome(&self) -> ExamOutcome {
        ExamOutcome::from(self.session.result().cloned())
    }

    /// # Errors
    ///
    /// Propagates `SessionError` from [`ExamSession::select_answer`].
    pub fn select_answer(
        &mut self,
        question_index: usize,
        option: OptionIndex,
    ) -> Result<Option<OptionIndex>, SessionError> {
        let previous = self.session.select_answer(question_index, option)?;
        debug!(run = %self.id, question = question_index, option = option.get(), "answer selected");
        Ok(previous)
    }

    /// # Errors
    ///
    /// Propagates `SessionError` from [`ExamSession::clear_answer`].
    pub fn clear_answer(&mut self, question_index: usize) -> Result<Option<OptionIndex>, SessionError> {
        self.session.clear_answer(question_index)
    }

    /// # Errors
    ///
    /// Propagates `SessionError` from [`ExamSession::navigate`].
    pub fn navigate(&mut self, target: usize) -> Result<usize, SessionError> {
        self.session.navigate(target)
    }

    /// # Errors
    ///
    /// Propagates `SessionError` from [`ExamSession::next`].
    pub fn next(&mut self) -> Result<usize, SessionError> {
        self.session.next()
    }

    /// # Errors
    ///
    /// Propagates `SessionError` from [`ExamSession::previous`].
    pub fn previous(&mut self) -> Result<usize, SessionError> {
        self.session.previous()
    }

    /// Applies one countdown step.
    pub fn tick(&mut self) -> TickOutcome {
        let outcome = self.session.tick();
        match &outcome {
            TickOutcome::Running { remaining_secs } => {
                trace!(run = %self.id, remaining_secs, "tick");
            }
            TickOutcome::Expired(result) => {
                info!(
                    run = %self.id,
                    exam = %self.meta.id,
                    score = result.score,
                    correct = result.correct_count,
                    total = result.total_questions,
                    "exam run expired"
                );
            }
            TickOutcome::Idle => {}
        }
        outcome
    }

    /// Finishes the run explicitly.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Finished` if the run already finished.
    pub fn finish(&mut self, reason: FinishReason) -> Result<SessionResult, SessionError> {
        let result = self.session.finish(reason)?;
        info!(
            run = %self.id,
            exam = %self.meta.id,
            reason = %reason,
            score = result.score,
            correct = result.correct_count,
            total = result.total_questions,
            time_spent_secs = result.time_spent_secs,
            "exam run finished"
        );
        Ok(result)
    }
}
