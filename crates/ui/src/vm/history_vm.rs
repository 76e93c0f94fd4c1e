use bda_core::model::FinishReason;
use services::AttemptListItem;

use super::time_fmt::{format_date, format_hms};

/// Attempts shown on the history screen.
pub const HISTORY_LIMIT: u32 = 50;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttemptRowVm {
    pub id: i64,
    pub completed_at: String,
    pub score: u8,
    pub correct: u32,
    pub total: u32,
    pub time_spent_str: String,
    pub passed: bool,
    pub expired: bool,
}

impl From<&AttemptListItem> for AttemptRowVm {
    fn from(item: &AttemptListItem) -> Self {
        Self {
            id: item.id,
            completed_at: format_date(item.completed_at),
            score: item.score,
            correct: item.correct_count,
            total: item.total_questions,
            time_spent_str: format_hms(item.time_spent_secs),
            passed: item.passed,
            expired: item.reason == FinishReason::TimeExpired,
        }
    }
}
