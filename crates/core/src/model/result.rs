use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::model::answers::AnswerMap;

//
// ─── FINISH REASON ─────────────────────────────────────────────────────────────
//

/// Why a session reached its terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// The candidate confirmed the finish dialog.
    Submitted,
    /// The countdown reached zero.
    TimeExpired,
}

impl FinishReason {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FinishReason::Submitted => "submitted",
            FinishReason::TimeExpired => "time_expired",
        }
    }
}

impl FromStr for FinishReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(Self::Submitted),
            "time_expired" => Ok(Self::TimeExpired),
            other => Err(format!("unknown finish reason: {other}")),
        }
    }
}

impl fmt::Display for FinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── SCORE ─────────────────────────────────────────────────────────────────────
//

/// Percentage of `correct` over `total`, rounded half up. Zero when `total == 0`.
#[must_use]
pub fn score_percent(correct: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let correct = u64::from(correct.min(total));
    let total = u64::from(total);
    let rounded = (200 * correct + total) / (2 * total);
    u8::try_from(rounded).unwrap_or(100)
}

/// Performance band shown on the results screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Performance {
    Excellent,
    Good,
    Pass,
    Fail,
}

impl Performance {
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => Performance::Excellent,
            80..=89 => Performance::Good,
            70..=79 => Performance::Pass,
            _ => Performance::Fail,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Performance::Excellent => "excellent",
            Performance::Good => "good",
            Performance::Pass => "pass",
            Performance::Fail => "fail",
        }
    }
}

//
// ─── SESSION RESULT ────────────────────────────────────────────────────────────
//

/// Derived outcome of a finished session. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    pub score: u8,
    pub correct_count: u32,
    pub total_questions: u32,
    pub time_spent_secs: u32,
    pub answers: AnswerMap,
    pub reason: FinishReason,
}

impl SessionResult {
    #[must_use]
    pub fn passed(&self, passing_score: u8) -> bool {
        self.score >= passing_score
    }

    #[must_use]
    pub fn performance(&self) -> Performance {
        Performance::from_score(self.score)
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }
}

//
// ─── HAND-OFF ──────────────────────────────────────────────────────────────────
//

/// Payload handed to the results screen.
///
/// `NoAttempt` is distinct from a completed attempt that scored zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExamOutcome {
    #[default]
    NoAttempt,
    Completed(SessionResult),
}

impl ExamOutcome {
    #[must_use]
    pub fn result(&self) -> Option<&SessionResult> {
        match self {
            ExamOutcome::NoAttempt => None,
            ExamOutcome::Completed(result) => Some(result),
        }
    }

    #[must_use]
    pub fn is_attempt(&self) -> bool {
        matches!(self, ExamOutcome::Completed(_))
    }
}

impl From<Option<SessionResult>> for ExamOutcome {
    fn from(value: Option<SessionResult>) -> Self {
        value.map_or(ExamOutcome::NoAttempt, ExamOutcome::Completed)
    }
}
