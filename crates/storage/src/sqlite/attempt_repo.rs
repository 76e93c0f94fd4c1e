use bda_core::model::{AttemptRecord, ExamId};

use super::SqliteRepository;
use super::mapping::{
    conn, id_i64, map_attempt_row, map_attempt_row_with_id, map_summary_row, ser,
};
use crate::repository::{AttemptId, AttemptRepository, AttemptRow, AttemptSummary, StorageError};

#[async_trait::async_trait]
impl AttemptRepository for SqliteRepository {
    async fn append_attempt(&self, attempt: &AttemptRecord) -> Result<AttemptId, StorageError> {
        let answers = serde_json::to_string(attempt.answers()).map_err(ser)?;
        let question_order = serde_json::to_string(attempt.question_order()).map_err(ser)?;

        let res = sqlx::query(
            r"
            INSERT INTO exam_attempts (exam_id, started_at, completed_at, score, correct_count, total_questions, time_spent_secs, passed, reason, answers, question_order)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            ",
        )
        .bind(id_i64("exam_id", attempt.exam_id().value())?)
        .bind(attempt.started_at())
        .bind(attempt.completed_at())
        .bind(i64::from(attempt.score()))
        .bind(i64::from(attempt.correct_count()))
        .bind(i64::from(attempt.total_questions()))
        .bind(i64::from(attempt.time_spent_secs()))
        .bind(attempt.passed())
        .bind(attempt.reason().as_str())
        .bind(answers)
        .bind(question_order)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(res.last_insert_rowid())
    }

    async fn get_attempt(&self, id: AttemptId) -> Result<AttemptRecord, StorageError> {
        let row = sqlx::query(
            r"
            SELECT exam_id, started_at, completed_at, score, correct_count, total_questions, time_spent_secs, passed, reason, answers, question_order
            FROM exam_attempts
            WHERE id = ?1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        let Some(row) = row else {
            return Err(StorageError::NotFound);
        };
        map_attempt_row(&row)
    }

    async fn list_attempt_rows(
        &self,
        exam_id: ExamId,
        limit: u32,
    ) -> Result<Vec<AttemptRow>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, exam_id, started_at, completed_at, score, correct_count, total_questions, time_spent_secs, passed, reason, answers, question_order
            FROM exam_attempts
            WHERE exam_id = ?1
            ORDER BY completed_at DESC, id DESC
            LIMIT ?2
            ",
        )
        .bind(id_i64("exam_id", exam_id.value())?)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_attempt_row_with_id).collect()
    }

    async fn attempt_summary(&self, exam_id: ExamId) -> Result<AttemptSummary, StorageError> {
        let row = sqlx::query(
            r"
            SELECT COUNT(*) AS attempt_count,
                   MAX(score) AS best_score,
                   COALESCE(SUM(score), 0) AS score_sum,
                   MAX(completed_at) AS last_completed_at,
                   COALESCE(MAX(passed), 0) AS has_passed
            FROM exam_attempts
            WHERE exam_id = ?1
            ",
        )
        .bind(id_i64("exam_id", exam_id.value())?)
        .fetch_one(&self.pool)
        .await
        .map_err(conn)?;

        map_summary_row(&row)
    }
}
