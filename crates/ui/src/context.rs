use std::sync::{Arc, Mutex};

use bda_core::model::{ExamId, ExamOutcome, Question, Role};
use services::{AttemptHistoryService, CompletedExam, ExamCatalogService, ExamMeta, ExamSessionService};

use crate::dashboard::{DashboardKind, dashboard_for};
use crate::i18n::Translations;

/// Services and launch settings the composition root hands to the UI.
pub trait UiApp: Send + Sync {
    fn default_exam_id(&self) -> ExamId;

    fn catalog(&self) -> Arc<ExamCatalogService>;
    fn sessions(&self) -> Arc<ExamSessionService>;
    fn history(&self) -> Arc<AttemptHistoryService>;
}

/// Signed-in user as far as the UI is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalSession {
    pub display_name: String,
    pub role: Role,
}

impl PortalSession {
    #[must_use]
    pub fn new(display_name: impl Into<String>, role: Role) -> Self {
        Self {
            display_name: display_name.into(),
            role,
        }
    }
}

/// What the results screen receives from the exam screen.
///
/// `questions` follow the presented order, matching the answer indices.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExamHandoff {
    pub exam: Option<ExamMeta>,
    pub questions: Vec<Question>,
    pub outcome: ExamOutcome,
}

impl From<CompletedExam> for ExamHandoff {
    fn from(completed: CompletedExam) -> Self {
        Self {
            outcome: ExamOutcome::Completed(completed.result),
            exam: Some(completed.exam),
            questions: completed.questions,
        }
    }
}

#[derive(Clone)]
pub struct AppContext {
    session: PortalSession,
    translations: Translations,
    default_exam_id: ExamId,

    catalog: Arc<ExamCatalogService>,
    sessions: Arc<ExamSessionService>,
    history: Arc<AttemptHistoryService>,

    results_handoff: Arc<Mutex<Option<ExamHandoff>>>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>, session: PortalSession, translations: Translations) -> Self {
        Self {
            session,
            translations,
            default_exam_id: app.default_exam_id(),
            catalog: app.catalog(),
            sessions: app.sessions(),
            history: app.history(),
            results_handoff: Arc::new(Mutex::new(None)),
        }
    }

    #[must_use]
    pub fn session(&self) -> &PortalSession {
        &self.session
    }

    #[must_use]
    pub fn dashboard(&self) -> DashboardKind {
        dashboard_for(self.session.role)
    }

    #[must_use]
    pub fn translations(&self) -> Translations {
        self.translations.clone()
    }

    #[must_use]
    pub fn default_exam_id(&self) -> ExamId {
        self.default_exam_id
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

    /// Stores a finished exam for the results screen, replacing any unread one.
    pub fn hand_off_results(&self, completed: CompletedExam) {
        if let Ok(mut slot) = self.results_handoff.lock() {
            *slot = Some(ExamHandoff::from(completed));
        }
    }

    /// Takes the pending hand-off. Empty slot means `NoAttempt`.
    #[must_use]
    pub fn take_results(&self) -> ExamHandoff {
        self.results_handoff
            .lock()
            .ok()
            .and_then(|mut slot| slot.take())
            .unwrap_or_default()
    }
}

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(
    app: &Arc<dyn UiApp>,
    session: PortalSession,
    translations: Translations,
) -> AppContext {
    AppContext::new(app, session, translations)
}
