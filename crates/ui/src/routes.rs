use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::context::AppContext;
use crate::dashboard::NavTarget;
use crate::views::{
    AttemptHistoryView, AttemptReviewView, DashboardView, ExamResultsView, MockExamsView,
    TakeExamView,
};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", DashboardView)] Dashboard {},
        #[route("/mock-exams", MockExamsView)] MockExams {},
        #[route("/mock-exams/:exam_id/take", TakeExamView)] TakeExam { exam_id: u64 },
        #[route("/mock-exams/results", ExamResultsView)] ExamResults {},
        #[route("/mock-exams/:exam_id/attempts", AttemptHistoryView)] AttemptHistory { exam_id: u64 },
        #[route("/mock-exams/attempts/:attempt_id", AttemptReviewView)] AttemptReview { attempt_id: i64 },
}

impl NavTarget {
    #[must_use]
    pub fn route(self) -> Option<Route> {
        match self {
            NavTarget::Dashboard => Some(Route::Dashboard {}),
            NavTarget::MockExams => Some(Route::MockExams {}),
            NavTarget::Unavailable => None,
        }
    }
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    let ctx = use_context::<AppContext>();
    let tr = ctx.translations();
    let dashboard = ctx.dashboard();
    let name = ctx.session().display_name.clone();
    let title = tr.t("app.title");

    rsx! {
        nav { class: "sidebar",
            h1 { "{title}" }
            p { class: "user", "{name}" }
            ul {
                for entry in dashboard.nav_entries() {
                    li { key: "{entry.label_key}",
                        match entry.target.route() {
                            Some(route) => rsx! {
                                Link { to: route, {tr.t(entry.label_key)} }
                            },
                            None => rsx! {
                                span {
                                    class: "nav-disabled",
                                    title: tr.t("nav.comingSoon"),
                                    {tr.t(entry.label_key)}
                                }
                            },
                        }
                    }
                }
            }
        }
    }
}
