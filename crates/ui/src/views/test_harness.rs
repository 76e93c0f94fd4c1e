use std::sync::Arc;

use bda_core::model::{Exam, ExamId, Locale, Role};
use bda_core::time::fixed_clock;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::{AttemptHistoryService, CompletedExam, ExamCatalogService, ExamSessionService};
use storage::fixtures::practice_exam;
use storage::repository::{ExamRepository, Storage};

use crate::context::{PortalSession, UiApp, build_app_context};
use crate::i18n::Translations;
use crate::views::{
    AttemptHistoryView, AttemptReviewView, DashboardView, ExamResultsView, MockExamsView,
    TakeExamView,
};

#[derive(Clone)]
struct TestApp {
    exam_id: ExamId,
    catalog: Arc<ExamCatalogService>,
    sessions: Arc<ExamSessionService>,
    history: Arc<AttemptHistoryService>,
}

impl UiApp for TestApp {
    fn default_exam_id(&self) -> ExamId {
        self.exam_id
    }

    fn catalog(&self) -> Arc<ExamCatalogService> {
        Arc::clone(&self.catalog)
    }

    fn sessions(&self) -> Arc<ExamSessionService> {
        Arc::clone(&self.sessions)
    }

    fn history(&self) -> Arc<AttemptHistoryService> {
        Arc::clone(&self.history)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Dashboard,
    MockExams,
    TakeExam(u64),
    Results,
    AttemptHistory(u64),
    AttemptReview(i64),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    session: PortalSession,
    handoff: Option<CompletedExam>,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    let session = props.session.clone();
    let handoff = props.handoff.clone();
    use_context_provider(move || {
        let translations = Translations::embedded(Locale::En).expect("embedded translations");
        let ctx = build_app_context(&app, session, translations);
        if let Some(completed) = handoff {
            ctx.hand_off_results(completed);
        }
        ctx
    });
    use_context_provider(|| props.view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
    // Same path as `Route::ExamResults`, so views can navigate there.
    #[route("/mock-exams/results")]
    ResultsPage {},
}

#[component]
fn ResultsPage() -> Element {
    rsx! { ExamResultsView {} }
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Dashboard => rsx! { DashboardView {} },
        ViewKind::MockExams => rsx! { MockExamsView {} },
        ViewKind::TakeExam(exam_id) => rsx! { TakeExamView { exam_id } },
        ViewKind::Results => rsx! { ExamResultsView {} },
        ViewKind::AttemptHistory(exam_id) => rsx! { AttemptHistoryView { exam_id } },
        ViewKind::AttemptReview(attempt_id) => rsx! { AttemptReviewView { attempt_id } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub storage: Storage,
    pub exam_id: ExamId,
    pub sessions: Arc<ExamSessionService>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub struct HarnessOptions {
    pub role: Role,
    pub seed_exam: bool,
    /// Overrides the seeded exam's time budget.
    pub exam_duration_secs: Option<u32>,
    pub handoff: Option<CompletedExam>,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self {
            role: Role::Individual,
            seed_exam: true,
            exam_duration_secs: None,
            handoff: None,
        }
    }
}

pub async fn setup_view_harness(view: ViewKind) -> ViewHarness {
    setup_view_harness_with(view, Storage::in_memory(), HarnessOptions::default()).await
}

pub async fn setup_view_harness_with(
    view: ViewKind,
    storage: Storage,
    options: HarnessOptions,
) -> ViewHarness {
    let clock = fixed_clock();
    let exam_id = ExamId::new(1);
    if options.seed_exam {
        let mut exam = practice_exam(exam_id).expect("practice exam");
        if let Some(secs) = options.exam_duration_secs {
            exam = Exam::new(
                exam.id(),
                exam.title().to_owned(),
                exam.category(),
                exam.difficulty(),
                secs,
                exam.into_questions(),
            )
            .expect("short exam");
        }
        storage.exams.upsert_exam(&exam).await.expect("seed exam");
    }

    let catalog = Arc::new(ExamCatalogService::new(Arc::clone(&storage.exams)));
    let sessions = Arc::new(ExamSessionService::new(
        clock,
        Arc::clone(&storage.exams),
        Arc::clone(&storage.attempts),
    ));
    let history = Arc::new(AttemptHistoryService::new(Arc::clone(&storage.attempts)));

    let app = Arc::new(TestApp {
        exam_id,
        catalog,
        sessions: Arc::clone(&sessions),
        history,
    });

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            session: PortalSession::new("Sam Member", options.role),
            handoff: options.handoff,
        },
    );

    ViewHarness {
        dom,
        storage,
        exam_id,
        sessions,
    }
}
