use dioxus::prelude::*;
use dioxus_router::Link;

use bda_core::model::ExamId;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{AttemptRowVm, HISTORY_LIMIT};

#[component]
pub fn AttemptHistoryView(exam_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let tr = ctx.translations();
    let allowed = ctx.session().role.can_take_exams();
    let catalog = ctx.catalog();
    let history = ctx.history();

    let resource = use_resource(move || {
        let catalog = catalog.clone();
        let history = history.clone();
        async move {
            let exam = catalog
                .get_exam(ExamId::new(exam_id))
                .await
                .map_err(|err| ViewError::from(&err))?;
            let rows = history
                .list_attempts(exam.id(), HISTORY_LIMIT)
                .await
                .map_err(|err| ViewError::from(&err))?
                .iter()
                .map(AttemptRowVm::from)
                .collect::<Vec<_>>();
            Ok::<_, ViewError>((exam.title().to_owned(), rows))
        }
    });

    let state = view_state_from_resource(&resource);
    let title = tr.t("history.title");

    if !allowed {
        return rsx! {
            div { class: "page attempt-history",
                h2 { "{title}" }
                p { class: "no-attempt", {tr.t("mockExams.notForRole")} }
            }
        };
    }

    rsx! {
        div { class: "page attempt-history",
            h2 { "{title}" }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { {tr.t("state.loading")} }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", {tr.t(err.message_key())} }
                },
                ViewState::Ready((exam_title, rows)) => rsx! {
                    p { class: "exam-title", "{exam_title}" }
                    if rows.is_empty() {
                        p { {tr.t("history.empty")} }
                    } else {
                        table { class: "attempts",
                            thead {
                                tr {
                                    th { {tr.t("history.date")} }
                                    th { {tr.t("history.score")} }
                                    th { {tr.t("results.correct")} }
                                    th { {tr.t("results.timeSpent")} }
                                    th { {tr.t("history.result")} }
                                    th {}
                                }
                            }
                            tbody {
                                for row in rows {
                                    AttemptRow { key: "{row.id}", row: row.clone() }
                                }
                            }
                        }
                    }
                },
            }
            div { class: "results-actions",
                Link { to: Route::MockExams {}, {tr.t("results.backToExams")} }
                Link { to: Route::TakeExam { exam_id }, {tr.t("mockExams.startExam")} }
            }
        }
    }
}

#[component]
fn AttemptRow(row: AttemptRowVm) -> Element {
    let ctx = use_context::<AppContext>();
    let tr = ctx.translations();
    let verdict_key = if row.passed { "results.passed" } else { "results.failed" };
    let class = if row.passed { "attempt passed" } else { "attempt failed" };
    let expired_label = format!(" · {}", tr.t("history.timeExpired"));

    rsx! {
        tr { class,
            td { "{row.completed_at}" }
            td { class: "score", "{row.score}%" }
            td { "{row.correct} / {row.total}" }
            td { "{row.time_spent_str}" }
            td {
                {tr.t(verdict_key)}
                if row.expired {
                    span { class: "warning", "{expired_label}" }
                }
            }
            td {
                Link { to: Route::AttemptReview { attempt_id: row.id }, {tr.t("history.review")} }
            }
        }
    }
}
