use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use services::DEFAULT_CATALOG_LIMIT;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{ExamCardVm, map_exam_card};

#[component]
pub fn MockExamsView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let tr = ctx.translations();
    let allowed = ctx.session().role.can_take_exams();
    let catalog = ctx.catalog();
    let history = ctx.history();

    let resource = use_resource(move || {
        let catalog = catalog.clone();
        let history = history.clone();
        async move {
            let exams = catalog
                .list_active_exams(DEFAULT_CATALOG_LIMIT)
                .await
                .map_err(|err| ViewError::from(&err))?;
            let mut cards = Vec::with_capacity(exams.len());
            for exam in &exams {
                let stats = history
                    .exam_stats(exam.id())
                    .await
                    .map_err(|_| ViewError::Unknown)?;
                cards.push(map_exam_card(exam, &stats));
            }
            Ok::<_, ViewError>(cards)
        }
    });

    let state = view_state_from_resource(&resource);
    let title = tr.t("mockExams.title");

    if !allowed {
        return rsx! {
            div { class: "page mock-exams",
                h2 { "{title}" }
                p { class: "no-attempt", {tr.t("mockExams.notForRole")} }
            }
        };
    }

    rsx! {
        div { class: "page mock-exams",
            h2 { "{title}" }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { {tr.t("state.loading")} }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", {tr.t(err.message_key())} }
                    button {
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        {tr.t("state.retry")}
                    }
                },
                ViewState::Ready(cards) if cards.is_empty() => rsx! {
                    p { {tr.t("mockExams.empty")} }
                },
                ViewState::Ready(cards) => rsx! {
                    div { class: "exam-list",
                        for card in cards {
                            ExamCard {
                                key: "{card.id}",
                                card: card.clone(),
                                on_start: move |exam_id: u64| {
                                    let _ = navigator.push(Route::TakeExam { exam_id });
                                },
                            }
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn ExamCard(card: ExamCardVm, on_start: EventHandler<u64>) -> Element {
    let ctx = use_context::<AppContext>();
    let tr = ctx.translations();
    let exam_id = card.id;

    rsx! {
        div { class: "exam-card",
            div { class: "exam-card-header",
                h3 { "{card.title}" }
                if card.has_passed {
                    span { class: "badge-pass", {tr.t("mockExams.passedBadge")} }
                }
            }
            if let Some(description) = card.description.as_ref() {
                p { "{description}" }
            }
            ul { class: "exam-card-meta",
                li { "{card.category} · {card.difficulty}" }
                li { {format!("{}: {}", tr.t("mockExams.questions"), card.question_count)} }
                li {
                    {format!(
                        "{}: {} {}",
                        tr.t("mockExams.duration"),
                        card.duration_minutes,
                        tr.t("mockExams.minutes"),
                    )}
                }
                li { {format!("{}: {}", tr.t("mockExams.attempts"), card.attempt_count)} }
                if let Some(best) = card.best_score {
                    li { {format!("{}: {best}%", tr.t("mockExams.bestScore"))} }
                }
                if let Some(date) = card.last_attempt.as_ref() {
                    li { {format!("{}: {date}", tr.t("mockExams.lastAttempt"))} }
                }
            }
            div { class: "exam-card-actions",
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: move |_| on_start.call(exam_id),
                    {tr.t("mockExams.startExam")}
                }
                if card.attempt_count > 0 {
                    Link { to: Route::AttemptHistory { exam_id }, {tr.t("mockExams.viewAttempts")} }
                }
            }
        }
    }
}
