use std::sync::Arc;

use bda_core::model::{Exam, ExamId};
use storage::repository::{ExamRepository, InMemoryRepository};

use crate::error::ExamServiceError;

/// Catalog page size when the caller does not care.
pub const DEFAULT_CATALOG_LIMIT: u32 = 64;

/// Read-side facade over the exam catalog.
#[derive(Clone)]
pub struct ExamCatalogService {
    exams: Arc<dyn ExamRepository>,
}

impl ExamCatalogService {
    #[must_use]
    pub fn new(exams: Arc<dyn ExamRepository>) -> Self {
        Self { exams }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryRepository::new()))
    }

    /// Active exams ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `ExamServiceError::Storage` on repository failures.
    pub async fn list_active_exams(&self, limit: u32) -> Result<Vec<Exam>, ExamServiceError> {
        Ok(self.exams.list_exams(true, limit).await?)
    }

    /// # Errors
    ///
    /// Returns `ExamServiceError::NotFound` if the id is unknown.
    pub async fn get_exam(&self, id: ExamId) -> Result<Exam, ExamServiceError> {
        self.exams
            .get_exam(id)
            .await?
            .ok_or(ExamServiceError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::fixtures::practice_exam;

    #[tokio::test]
    async fn lists_only_active_exams() {
        let repo = InMemoryRepository::new();
        repo.upsert_exam(&practice_exam(ExamId::new(1)).unwrap())
            .await
            .unwrap();
        repo.upsert_exam(&practice_exam(ExamId::new(2)).unwrap().with_active(false))
            .await
            .unwrap();

        let svc = ExamCatalogService::new(Arc::new(repo));
        let exams = svc.list_active_exams(DEFAULT_CATALOG_LIMIT).await.unwrap();
        assert_eq!(exams.len(), 1);
        assert_eq!(exams[0].id(), ExamId::new(1));

        assert!(svc.get_exam(ExamId::new(2)).await.is_ok());
        assert!(matches!(
            svc.get_exam(ExamId::new(3)).await,
            Err(ExamServiceError::NotFound(_))
        ));
    }
}
