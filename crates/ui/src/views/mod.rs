mod attempt_history;
mod dashboard;
mod mock_exams;
mod results;
mod state;
mod take_exam;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use attempt_history::AttemptHistoryView;
pub use dashboard::DashboardView;
pub use mock_exams::MockExamsView;
pub use results::{AttemptReviewView, ExamResultsView};
pub use state::{ViewError, ViewState, view_state_from_resource};
pub use take_exam::TakeExamView;
