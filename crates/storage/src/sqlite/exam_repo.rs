use bda_core::model::{Exam, ExamId, Question};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use super::SqliteRepository;
use super::mapping::{conn, id_i64, map_exam_row, map_question_row, ser};
use crate::repository::{ExamRepository, StorageError};

impl SqliteRepository {
    async fn load_questions(&self, exam_id: i64) -> Result<Vec<Question>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT question_id, prompt, option_a, option_b, option_c, option_d, correct_option, explanation
            FROM exam_questions
            WHERE exam_id = ?1
            ORDER BY position ASC
            ",
        )
        .bind(exam_id)
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_question_row).collect()
    }

    async fn hydrate(&self, row: &SqliteRow) -> Result<Exam, StorageError> {
        let id: i64 = row.try_get("id").map_err(ser)?;
        let questions = self.load_questions(id).await?;
        map_exam_row(row, questions)
    }
}

#[async_trait::async_trait]
impl ExamRepository for SqliteRepository {
    async fn upsert_exam(&self, exam: &Exam) -> Result<(), StorageError> {
        let exam_id = id_i64("exam_id", exam.id().value())?;
        let mut tx = self.pool.begin().await.map_err(conn)?;

        sqlx::query(
            r"
            INSERT INTO exams (id, title, description, category, difficulty, duration_secs, passing_score, is_active)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                category = excluded.category,
                difficulty = excluded.difficulty,
                duration_secs = excluded.duration_secs,
                passing_score = excluded.passing_score,
                is_active = excluded.is_active
            ",
        )
        .bind(exam_id)
        .bind(exam.title())
        .bind(exam.description())
        .bind(exam.category().as_str())
        .bind(exam.difficulty().as_str())
        .bind(i64::from(exam.duration_secs()))
        .bind(i64::from(exam.passing_score()))
        .bind(exam.is_active())
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        // The question set is replaced wholesale so positions stay dense.
        sqlx::query("DELETE FROM exam_questions WHERE exam_id = ?1")
            .bind(exam_id)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

        for (position, question) in exam.questions().iter().enumerate() {
            let position = id_i64("position", position as u64)?;
            let [a, b, c, d] = question.options();
            sqlx::query(
                r"
                INSERT INTO exam_questions (exam_id, position, question_id, prompt, option_a, option_b, option_c, option_d, correct_option, explanation)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                ",
            )
            .bind(exam_id)
            .bind(position)
            .bind(id_i64("question_id", question.id().value())?)
            .bind(question.prompt())
            .bind(a.as_str())
            .bind(b.as_str())
            .bind(c.as_str())
            .bind(d.as_str())
            .bind(i64::from(u8::from(question.correct_option())))
            .bind(question.explanation())
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }

        tx.commit().await.map_err(conn)?;
        Ok(())
    }

    async fn get_exam(&self, id: ExamId) -> Result<Option<Exam>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, title, description, category, difficulty, duration_secs, passing_score, is_active
            FROM exams
            WHERE id = ?1
            ",
        )
        .bind(id_i64("exam_id", id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        match row {
            Some(row) => self.hydrate(&row).await.map(Some),
            None => Ok(None),
        }
    }

    async fn list_exams(&self, active_only: bool, limit: u32) -> Result<Vec<Exam>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, title, description, category, difficulty, duration_secs, passing_score, is_active
            FROM exams
            WHERE (?1 = 0 OR is_active = 1)
            ORDER BY id ASC
            LIMIT ?2
            ",
        )
        .bind(active_only)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut exams = Vec::with_capacity(rows.len());
        for row in &rows {
            exams.push(self.hydrate(row).await?);
        }
        Ok(exams)
    }
}
