use std::sync::Arc;

use tracing::info;

use bda_core::model::ExamId;
use storage::fixtures::practice_exam;
use storage::repository::{ExamRepository, Storage};

use crate::Clock;
use crate::error::AppServicesError;
use crate::exams::{AttemptHistoryService, ExamCatalogService, ExamSessionService};

/// Assembles app-facing services and resolves a usable exam id.
#[derive(Clone)]
pub struct AppServices {
    exam_id: ExamId,
    provisioned: bool,
    catalog: Arc<ExamCatalogService>,
    sessions: Arc<ExamSessionService>,
    history: Arc<AttemptHistoryService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or default exam setup fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        preferred_exam_id: ExamId,
        shuffle_questions: bool,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::from_storage(storage, clock, preferred_exam_id, shuffle_questions).await
    }

    /// Build services backed by an in-memory store seeded with the practice exam.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the practice exam cannot be built.
    pub async fn in_memory(clock: Clock) -> Result<Self, AppServicesError> {
        Self::from_storage(Storage::in_memory(), clock, ExamId::new(1), false).await
    }

    /// # Errors
    ///
    /// Returns `AppServicesError` if default exam setup fails.
    pub async fn from_storage(
        storage: Storage,
        clock: Clock,
        preferred_exam_id: ExamId,
        shuffle_questions: bool,
    ) -> Result<Self, AppServicesError> {
        let (exam_id, provisioned) =
            ensure_default_exam(storage.exams.as_ref(), preferred_exam_id).await?;

        let catalog = Arc::new(ExamCatalogService::new(Arc::clone(&storage.exams)));
        let sessions = Arc::new(
            ExamSessionService::new(
                clock,
                Arc::clone(&storage.exams),
                Arc::clone(&storage.attempts),
            )
            .with_shuffle_questions(shuffle_questions),
        );
        let history = Arc::new(AttemptHistoryService::new(Arc::clone(&storage.attempts)));

        Ok(Self {
            exam_id,
            provisioned,
            catalog,
            sessions,
            history,
        })
    }

    /// Exam opened when the user picks "Mock Exams" without choosing one.
    #[must_use]
    pub fn exam_id(&self) -> ExamId {
        self.exam_id
    }

    /// Whether this launch wrote the built-in practice exam.
    #[must_use]
    pub fn provisioned_practice_exam(&self) -> bool {
        self.provisioned
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<ExamCatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn sessions(&self) -> Arc<ExamSessionService> {
        Arc::clone(&self.sessions)
    }

    #[must_use]
    pub fn history(&self) -> Arc<AttemptHistoryService> {
        Arc::clone(&self.history)
    }
}

async fn ensure_default_exam(
    exams: &dyn ExamRepository,
    preferred_id: ExamId,
) -> Result<(ExamId, bool), AppServicesError> {
    if exams.get_exam(preferred_id).await?.is_some() {
        return Ok((preferred_id, false));
    }

    let existing = exams.list_exams(true, 1).await?;
    if let Some(first) = existing.first() {
        return Ok((first.id(), false));
    }

    let exam = practice_exam(preferred_id)?;
    exams.upsert_exam(&exam).await?;
    info!(exam = %preferred_id, questions = exam.question_count(), "provisioned practice exam");

    Ok((preferred_id, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bda_core::time::fixed_clock;
    use storage::repository::InMemoryRepository;

    #[tokio::test]
    async fn provisions_practice_exam_once() {
        let storage = Storage::in_memory();
        let first = AppServices::from_storage(storage.clone(), fixed_clock(), ExamId::new(4), false)
            .await
            .unwrap();
        assert!(first.provisioned_practice_exam());
        assert_eq!(first.exam_id(), ExamId::new(4));

        let second = AppServices::from_storage(storage, fixed_clock(), ExamId::new(4), false)
            .await
            .unwrap();
        assert!(!second.provisioned_practice_exam());
    }

    #[tokio::test]
    async fn falls_back_to_first_active_exam() {
        let repo = InMemoryRepository::new();
        repo.upsert_exam(&practice_exam(ExamId::new(9)).unwrap())
            .await
            .unwrap();

        let (id, provisioned) = ensure_default_exam(&repo, ExamId::new(1)).await.unwrap();
        assert_eq!(id, ExamId::new(9));
        assert!(!provisioned);
    }
}
