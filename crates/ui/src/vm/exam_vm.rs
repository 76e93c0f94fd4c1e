use bda_core::model::{ExamId, FinishReason, OptionIndex, QuestionStatus};
use bda_core::session::TickOutcome;
use services::{CompletedExam, ExamRun, ExamSessionService};

use super::time_fmt::format_hms;
use crate::views::ViewError;

/// Countdown below this many seconds is shown as low time.
pub const LOW_TIME_THRESHOLD_SECS: u32 = 300;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExamIntent {
    Select(OptionIndex),
    Jump(usize),
    Next,
    Previous,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub index: OptionIndex,
    pub letter: char,
    pub text: String,
    pub selected: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridCellVm {
    pub index: usize,
    pub number: usize,
    pub answered: bool,
    pub current: bool,
}

pub struct ExamVm {
    run: ExamRun,
}

impl ExamVm {
    #[must_use]
    pub fn new(run: ExamRun) -> Self {
        Self { run }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.run.meta().title
    }

    /// 1-based position of the current question.
    #[must_use]
    pub fn question_number(&self) -> usize {
        self.run.session().current_index() + 1
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.run.session().total_questions()
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        self.run.session().current_question().prompt()
    }

    #[must_use]
    pub fn options(&self) -> Vec<OptionVm> {
        let session = self.run.session();
        let question = session.current_question();
        let chosen = session.answer(session.current_index());
        OptionIndex::all()
            .map(|index| OptionVm {
                index,
                letter: index.letter(),
                text: question.option(index).to_owned(),
                selected: chosen == Some(index),
            })
            .collect()
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.run.session().remaining_secs()
    }

    #[must_use]
    pub fn remaining_str(&self) -> String {
        format_hms(self.remaining_secs())
    }

    #[must_use]
    pub fn is_low_time(&self) -> bool {
        self.remaining_secs() < LOW_TIME_THRESHOLD_SECS
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.run.session().answered_count()
    }

    #[must_use]
    pub fn unanswered_count(&self) -> usize {
        self.total_questions().saturating_sub(self.answered_count())
    }

    #[must_use]
    pub fn can_go_previous(&self) -> bool {
        !self.is_finished() && !self.run.session().is_first()
    }

    #[must_use]
    pub fn can_go_next(&self) -> bool {
        !self.is_finished() && !self.run.session().is_last()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.run.is_finished()
    }

    #[must_use]
    pub fn grid(&self) -> Vec<GridCellVm> {
        let session = self.run.session();
        (0..session.total_questions())
            .map(|index| GridCellVm {
                index,
                number: index + 1,
                answered: session.question_status(index) == QuestionStatus::Answered,
                current: index == session.current_index(),
            })
            .collect()
    }

    /// Applies a user action. Ignored once the run has finished.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if the session rejects the action.
    pub fn apply(&mut self, intent: ExamIntent) -> Result<(), ViewError> {
        if self.is_finished() {
            return Ok(());
        }
        let current = self.run.session().current_index();
        let applied = match intent {
            ExamIntent::Select(option) => self.run.select_answer(current, option).map(|_| ()),
            ExamIntent::Jump(index) => self.run.navigate(index).map(|_| ()),
            ExamIntent::Next => self.run.next().map(|_| ()),
            ExamIntent::Previous => self.run.previous().map(|_| ()),
        };
        applied.map_err(|_| ViewError::Unknown)
    }

    pub fn tick(&mut self) -> TickOutcome {
        self.run.tick()
    }

    /// Persists the run, finishing it as submitted if the timer has not.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if persistence fails; the run stays
    /// finished and can be retried.
    pub async fn finish(&mut self, sessions: &ExamSessionService) -> Result<CompletedExam, ViewError> {
        let expired = self
            .run
            .result()
            .is_some_and(|result| result.reason == FinishReason::TimeExpired);
        let completed = if expired {
            sessions.record_expired(&mut self.run).await
        } else {
            sessions.submit(&mut self.run).await
        };
        completed.map_err(|err| ViewError::from(&err))
    }
}

/// # Errors
///
/// Returns `ViewError::NotFound` or `ViewError::Inactive` for unusable exams,
/// and `ViewError::Unknown` for other failures.
pub async fn start_exam(
    sessions: &ExamSessionService,
    exam_id: ExamId,
) -> Result<ExamVm, ViewError> {
    let run = sessions
        .start_exam(exam_id)
        .await
        .map_err(|err| ViewError::from(&err))?;
    Ok(ExamVm::new(run))
}
