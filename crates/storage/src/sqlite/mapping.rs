use bda_core::model::{
    AnswerMap, AttemptRecord, Exam, ExamCategory, ExamDifficulty, ExamId, FinishReason,
    OptionIndex, Question, QuestionId, SessionResult,
};
use chrono::{DateTime, Utc};
use sqlx::Row;

use crate::repository::{AttemptRow, AttemptSummary, StorageError};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(crate) fn id_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

fn u64_from_i64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

fn u8_from_i64(field: &'static str, v: i64) -> Result<u8, StorageError> {
    u8::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn exam_id_from_i64(v: i64) -> Result<ExamId, StorageError> {
    Ok(ExamId::new(u64_from_i64("exam_id", v)?))
}

pub(crate) fn map_question_row(row: &sqlx::sqlite::SqliteRow) -> Result<Question, StorageError> {
    let id = QuestionId::new(u64_from_i64(
        "question_id",
        row.try_get::<i64, _>("question_id").map_err(ser)?,
    )?);
    let prompt: String = row.try_get("prompt").map_err(ser)?;
    let options: [String; 4] = [
        row.try_get("option_a").map_err(ser)?,
        row.try_get("option_b").map_err(ser)?,
        row.try_get("option_c").map_err(ser)?,
        row.try_get("option_d").map_err(ser)?,
    ];
    let correct = u8_from_i64(
        "correct_option",
        row.try_get::<i64, _>("correct_option").map_err(ser)?,
    )?;
    let correct = OptionIndex::try_from(correct).map_err(ser)?;
    let explanation: Option<String> = row.try_get("explanation").map_err(ser)?;

    Ok(Question::new(id, prompt, options, correct)
        .map_err(ser)?
        .with_explanation(explanation))
}

pub(crate) fn map_exam_row(
    row: &sqlx::sqlite::SqliteRow,
    questions: Vec<Question>,
) -> Result<Exam, StorageError> {
    let id = exam_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?;
    let title: String = row.try_get("title").map_err(ser)?;
    let description: Option<String> = row.try_get("description").map_err(ser)?;
    let category: ExamCategory = row
        .try_get::<String, _>("category")
        .map_err(ser)?
        .parse()
        .map_err(ser)?;
    let difficulty: ExamDifficulty = row
        .try_get::<String, _>("difficulty")
        .map_err(ser)?
        .parse()
        .map_err(ser)?;
    let duration_secs = u32_from_i64(
        "duration_secs",
        row.try_get::<i64, _>("duration_secs").map_err(ser)?,
    )?;
    let passing_score = u8_from_i64(
        "passing_score",
        row.try_get::<i64, _>("passing_score").map_err(ser)?,
    )?;
    let is_active: bool = row.try_get("is_active").map_err(ser)?;

    Exam::new(id, title, category, difficulty, duration_secs, questions)
        .and_then(|exam| exam.with_passing_score(passing_score))
        .map(|exam| exam.with_description(description).with_active(is_active))
        .map_err(ser)
}

pub(crate) fn map_attempt_row(row: &sqlx::sqlite::SqliteRow) -> Result<AttemptRecord, StorageError> {
    let exam_id = exam_id_from_i64(row.try_get::<i64, _>("exam_id").map_err(ser)?)?;
    let started_at: DateTime<Utc> = row.try_get("started_at").map_err(ser)?;
    let completed_at: DateTime<Utc> = row.try_get("completed_at").map_err(ser)?;
    let score = u8_from_i64("score", row.try_get::<i64, _>("score").map_err(ser)?)?;
    let correct_count = u32_from_i64(
        "correct_count",
        row.try_get::<i64, _>("correct_count").map_err(ser)?,
    )?;
    let total_questions = u32_from_i64(
        "total_questions",
        row.try_get::<i64, _>("total_questions").map_err(ser)?,
    )?;
    let time_spent_secs = u32_from_i64(
        "time_spent_secs",
        row.try_get::<i64, _>("time_spent_secs").map_err(ser)?,
    )?;
    let passed: bool = row.try_get("passed").map_err(ser)?;
    let reason: FinishReason = row
        .try_get::<String, _>("reason")
        .map_err(ser)?
        .parse()
        .map_err(ser)?;
    let answers: AnswerMap =
        serde_json::from_str(&row.try_get::<String, _>("answers").map_err(ser)?).map_err(ser)?;
    let question_order: Vec<QuestionId> =
        serde_json::from_str(&row.try_get::<String, _>("question_order").map_err(ser)?)
            .map_err(ser)?;

    let result = SessionResult {
        score,
        correct_count,
        total_questions,
        time_spent_secs,
        answers,
        reason,
    };

    AttemptRecord::from_persisted(exam_id, started_at, completed_at, passed, result)
        .and_then(|attempt| attempt.with_question_order(question_order))
        .map_err(ser)
}

pub(crate) fn map_summary_row(row: &sqlx::sqlite::SqliteRow) -> Result<AttemptSummary, StorageError> {
    let attempt_count = u32_from_i64(
        "attempt_count",
        row.try_get::<i64, _>("attempt_count").map_err(ser)?,
    )?;
    let best_score = row
        .try_get::<Option<i64>, _>("best_score")
        .map_err(ser)?
        .map(|v| u8_from_i64("best_score", v))
        .transpose()?;
    let score_sum = u64_from_i64("score_sum", row.try_get::<i64, _>("score_sum").map_err(ser)?)?;
    let last_completed_at: Option<DateTime<Utc>> =
        row.try_get("last_completed_at").map_err(ser)?;
    let has_passed = row.try_get::<i64, _>("has_passed").map_err(ser)? != 0;

    Ok(AttemptSummary {
        attempt_count,
        best_score,
        score_sum,
        last_completed_at,
        has_passed,
    })
}

pub(crate) fn map_attempt_row_with_id(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<AttemptRow, StorageError> {
    let id: i64 = row.try_get("id").map_err(ser)?;
    Ok(AttemptRow::new(id, map_attempt_row(row)?))
}
