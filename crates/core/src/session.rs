//! Timed single-choice exam session.
//!
//! `ExamSession` is a pure state machine: it owns the countdown, the question
//! pointer and the answer map, and derives a `SessionResult` exactly once.
//! Driving the countdown (one `tick` per second) is left to the caller.

use thiserror::Error;

use crate::model::{
    AnswerMap, FinishReason, OptionIndex, Question, QuestionStatus, SessionResult, score_percent,
};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session has no questions")]
    NoQuestions,

    #[error("session duration must be > 0 seconds")]
    ZeroDuration,

    #[error("session has already been started")]
    AlreadyStarted,

    #[error("session is not in progress")]
    NotInProgress,

    #[error("session already finished")]
    Finished,

    #[error("question index {index} is out of range (total {total})")]
    QuestionOutOfRange { index: usize, total: usize },
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    InProgress,
    Finished,
}

/// What a single countdown step did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Clock decremented, time remains.
    Running { remaining_secs: u32 },
    /// Clock hit zero on this tick and the session finished.
    Expired(SessionResult),
    /// Session is not in progress; the tick was ignored.
    Idle,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone)]
pub struct ExamSession {
    questions: Vec<Question>,
    initial_secs: u32,
    remaining_secs: u32,
    current: usize,
    answers: AnswerMap,
    state: SessionState,
    result: Option<SessionResult>,
}

impl ExamSession {
    /// Creates a session that has not started yet.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoQuestions` for an empty set and
    /// `SessionError::ZeroDuration` for a zero budget.
    pub fn new(questions: Vec<Question>, duration_secs: u32) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::NoQuestions);
        }
        if duration_secs == 0 {
            return Err(SessionError::ZeroDuration);
        }

        Ok(Self {
            questions,
            initial_secs: duration_secs,
            remaining_secs: duration_secs,
            current: 0,
            answers: AnswerMap::new(),
            state: SessionState::NotStarted,
            result: None,
        })
    }

    /// `NotStarted -> InProgress`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyStarted` or `SessionError::Finished`
    /// when called a second time.
    pub fn start(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::NotStarted => {
                self.remaining_secs = self.initial_secs;
                self.current = 0;
                self.answers = AnswerMap::new();
                self.state = SessionState::InProgress;
                Ok(())
            }
            SessionState::InProgress => Err(SessionError::AlreadyStarted),
            SessionState::Finished => Err(SessionError::Finished),
        }
    }

    /// Advances the countdown by one second, finishing the session at zero.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != SessionState::InProgress {
            return TickOutcome::Idle;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return TickOutcome::Running {
                remaining_secs: self.remaining_secs,
            };
        }

        TickOutcome::Expired(self.complete(FinishReason::TimeExpired))
    }

    /// Records `option` for the question at `question_index`, replacing any earlier choice.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInProgress`/`Finished` outside `InProgress`,
    /// or `SessionError::QuestionOutOfRange` for an unknown index.
    pub fn select_answer(
        &mut self,
        question_index: usize,
        option: OptionIndex,
    ) -> Result<Option<OptionIndex>, SessionError> {
        self.ensure_in_progress()?;
        self.ensure_index(question_index)?;
        Ok(self.answers.select(question_index, option))
    }

    /// Removes the answer for `question_index`, if any.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ExamSession::select_answer`].
    pub fn clear_answer(&mut self, question_index: usize) -> Result<Option<OptionIndex>, SessionError> {
        self.ensure_in_progress()?;
        self.ensure_index(question_index)?;
        Ok(self.answers.clear(question_index))
    }

    /// Moves the pointer to `target`, clamped into the question range.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInProgress`/`Finished` outside `InProgress`.
    pub fn navigate(&mut self, target: usize) -> Result<usize, SessionError> {
        self.ensure_in_progress()?;
        self.current = target.min(self.last_index());
        Ok(self.current)
    }

    /// # Errors
    ///
    /// See [`ExamSession::navigate`].
    pub fn next(&mut self) -> Result<usize, SessionError> {
        self.navigate(self.current.saturating_add(1))
    }

    /// # Errors
    ///
    /// See [`ExamSession::navigate`].
    pub fn previous(&mut self) -> Result<usize, SessionError> {
        self.navigate(self.current.saturating_sub(1))
    }

    /// `InProgress -> Finished`, computing the result.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Finished` if the session already finished and
    /// `SessionError::NotInProgress` if it never started.
    pub fn finish(&mut self, reason: FinishReason) -> Result<SessionResult, SessionError> {
        self.ensure_in_progress()?;
        Ok(self.complete(reason))
    }

    fn complete(&mut self, reason: FinishReason) -> SessionResult {
        let result = self.compute_result(reason);
        self.state = SessionState::Finished;
        self.result = Some(result.clone());
        result
    }

    fn compute_result(&self, reason: FinishReason) -> SessionResult {
        let correct = self
            .answers
            .iter()
            .filter(|(index, option)| {
                self.questions
                    .get(*index)
                    .is_some_and(|question| question.is_correct(*option))
            })
            .count();
        let correct_count = u32::try_from(correct).unwrap_or(u32::MAX);
        let total_questions = u32::try_from(self.questions.len()).unwrap_or(u32::MAX);

        SessionResult {
            score: score_percent(correct_count, total_questions),
            correct_count,
            total_questions,
            time_spent_secs: self.elapsed_secs(),
            answers: self.answers.clone(),
            reason,
        }
    }

    fn ensure_in_progress(&self) -> Result<(), SessionError> {
        match self.state {
            SessionState::InProgress => Ok(()),
            SessionState::NotStarted => Err(SessionError::NotInProgress),
            SessionState::Finished => Err(SessionError::Finished),
        }
    }

    fn ensure_index(&self, index: usize) -> Result<(), SessionError> {
        if index < self.questions.len() {
            Ok(())
        } else {
            Err(SessionError::QuestionOutOfRange {
                index,
                total: self.questions.len(),
            })
        }
    }

    fn last_index(&self) -> usize {
        self.questions.len().saturating_sub(1)
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state == SessionState::Finished
    }

    #[must_use]
    pub fn initial_secs(&self) -> u32 {
        self.initial_secs
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    #[must_use]
    pub fn elapsed_secs(&self) -> u32 {
        self.initial_secs - self.remaining_secs
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current == self.last_index()
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    #[must_use]
    pub fn answer(&self, question_index: usize) -> Option<OptionIndex> {
        self.answers.get(question_index)
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn question_status(&self, question_index: usize) -> QuestionStatus {
        self.answers.status(question_index)
    }

    /// The result, once the session has finished.
    #[must_use]
    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
