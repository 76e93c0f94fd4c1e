use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::ExamId;
use crate::model::question::Question;

/// Passing threshold used when an exam does not specify one.
pub const DEFAULT_PASSING_SCORE: u8 = 70;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExamError {
    #[error("exam title cannot be empty")]
    EmptyTitle,

    #[error("exam must contain at least one question")]
    NoQuestions,

    #[error("exam duration must be > 0 seconds")]
    ZeroDuration,

    #[error("passing score must be between 0 and 100, got {0}")]
    InvalidPassingScore(u8),

    #[error("unknown exam category: {0}")]
    UnknownCategory(String),

    #[error("unknown exam difficulty: {0}")]
    UnknownDifficulty(String),
}

//
// ─── CATEGORY / DIFFICULTY ─────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamCategory {
    Cp,
    Scp,
    General,
}

impl ExamCategory {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ExamCategory::Cp => "cp",
            ExamCategory::Scp => "scp",
            ExamCategory::General => "general",
        }
    }
}

impl FromStr for ExamCategory {
    type Err = ExamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cp" => Ok(Self::Cp),
            "scp" => Ok(Self::Scp),
            "general" => Ok(Self::General),
            other => Err(ExamError::UnknownCategory(other.to_owned())),
        }
    }
}

impl fmt::Display for ExamCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamDifficulty {
    Easy,
    Medium,
    Hard,
}

impl ExamDifficulty {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ExamDifficulty::Easy => "easy",
            ExamDifficulty::Medium => "medium",
            ExamDifficulty::Hard => "hard",
        }
    }
}

impl FromStr for ExamDifficulty {
    type Err = ExamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(ExamError::UnknownDifficulty(other.to_owned())),
        }
    }
}

impl fmt::Display for ExamDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── EXAM ──────────────────────────────────────────────────────────────────────
//

/// A mock exam: metadata plus the ordered question set delivered to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exam {
    id: ExamId,
    title: String,
    description: Option<String>,
    category: ExamCategory,
    difficulty: ExamDifficulty,
    duration_secs: u32,
    passing_score: u8,
    is_active: bool,
    questions: Vec<Question>,
}

impl Exam {
    /// Creates an active exam with the default passing score.
    ///
    /// # Errors
    ///
    /// Returns `ExamError` if the title is blank, there are no questions,
    /// or the duration is zero.
    pub fn new(
        id: ExamId,
        title: impl Into<String>,
        category: ExamCategory,
        difficulty: ExamDifficulty,
        duration_secs: u32,
        questions: Vec<Question>,
    ) -> Result<Self, ExamError> {
        let title = title.into().trim().to_owned();
        if title.is_empty() {
            return Err(ExamError::EmptyTitle);
        }
        if questions.is_empty() {
            return Err(ExamError::NoQuestions);
        }
        if duration_secs == 0 {
            return Err(ExamError::ZeroDuration);
        }

        Ok(Self {
            id,
            title,
            description: None,
            category,
            difficulty,
            duration_secs,
            passing_score: DEFAULT_PASSING_SCORE,
            is_active: true,
            questions,
        })
    }

    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty());
        self
    }

    /// Overrides the passing threshold.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::InvalidPassingScore` if `score > 100`.
    pub fn with_passing_score(mut self, score: u8) -> Result<Self, ExamError> {
        if score > 100 {
            return Err(ExamError::InvalidPassingScore(score));
        }
        self.passing_score = score;
        Ok(self)
    }

    #[must_use]
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    #[must_use]
    pub fn id(&self) -> ExamId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn category(&self) -> ExamCategory {
        self.category
    }

    #[must_use]
    pub fn difficulty(&self) -> ExamDifficulty {
        self.difficulty
    }

    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    #[must_use]
    pub fn passing_score(&self) -> u8 {
        self.passing_score
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Consumes the exam, yielding the question set for a session.
    #[must_use]
    pub fn into_questions(self) -> Vec<Question> {
        self.questions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OptionIndex, QuestionId};

    fn question(id: u64) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Q{id}"),
            ["a".into(), "b".into(), "c".into(), "d".into()],
            OptionIndex::new(0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn new_exam_defaults() {
        let exam = Exam::new(
            ExamId::new(1),
            " Practice ",
            ExamCategory::General,
            ExamDifficulty::Medium,
            3600,
            vec![question(1)],
        )
        .unwrap();

        assert_eq!(exam.title(), "Practice");
        assert_eq!(exam.passing_score(), DEFAULT_PASSING_SCORE);
        assert!(exam.is_active());
        assert_eq!(exam.question_count(), 1);
    }

    #[test]
    fn new_exam_validates_inputs() {
        let empty = Exam::new(
            ExamId::new(1),
            "T",
            ExamCategory::Cp,
            ExamDifficulty::Easy,
            60,
            Vec::new(),
        );
        assert_eq!(empty.unwrap_err(), ExamError::NoQuestions);

        let zero = Exam::new(
            ExamId::new(1),
            "T",
            ExamCategory::Cp,
            ExamDifficulty::Easy,
            0,
            vec![question(1)],
        );
        assert_eq!(zero.unwrap_err(), ExamError::ZeroDuration);

        let exam = Exam::new(
            ExamId::new(1),
            "T",
            ExamCategory::Cp,
            ExamDifficulty::Easy,
            60,
            vec![question(1)],
        )
        .unwrap();
        assert_eq!(
            exam.with_passing_score(101).unwrap_err(),
            ExamError::InvalidPassingScore(101)
        );
    }

    #[test]
    fn category_and_difficulty_parse() {
        assert_eq!("SCP".parse::<ExamCategory>().unwrap(), ExamCategory::Scp);
        assert_eq!(
            "hard".parse::<ExamDifficulty>().unwrap(),
            ExamDifficulty::Hard
        );
        assert!("expert".parse::<ExamDifficulty>().is_err());
    }
}
