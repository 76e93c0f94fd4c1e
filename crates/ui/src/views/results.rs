use dioxus::prelude::*;
use dioxus_router::Link;

use services::CompletedExam;

use crate::context::{AppContext, ExamHandoff};
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{CompletedResultsVm, ResultsVm, ReviewItemVm, ReviewOptionVm};

#[component]
pub fn ExamResultsView() -> Element {
    let ctx = use_context::<AppContext>();
    let tr = ctx.translations();
    // Taken once per mount; a refresh of this screen shows no attempt.
    let handoff = use_hook(|| ctx.take_results());
    let exam_id = handoff.exam.as_ref().map(|exam| exam.id.value());
    let results = ResultsVm::from_handoff(&handoff);

    rsx! {
        div { class: "page results",
            match results {
                ResultsVm::NoAttempt => rsx! {
                    div { class: "no-attempt",
                        h2 { {tr.t("results.noAttempt")} }
                        p { {tr.t("results.noAttemptHint")} }
                        Link { to: Route::MockExams {}, {tr.t("results.backToExams")} }
                    }
                },
                ResultsVm::Completed(vm) => rsx! {
                    CompletedResults { vm, exam_id }
                },
            }
        }
    }
}

/// Results of a stored attempt, opened from the attempt history.
#[component]
pub fn AttemptReviewView(attempt_id: i64) -> Element {
    let ctx = use_context::<AppContext>();
    let tr = ctx.translations();
    let catalog = ctx.catalog();
    let history = ctx.history();

    let resource = use_resource(move || {
        let catalog = catalog.clone();
        let history = history.clone();
        async move {
            let attempt = history
                .get_attempt(attempt_id)
                .await
                .map_err(|err| ViewError::from(&err))?;
            let exam = catalog
                .get_exam(attempt.exam_id())
                .await
                .map_err(|err| ViewError::from(&err))?;
            let completed = CompletedExam::from_stored(attempt_id, &exam, &attempt);
            Ok::<_, ViewError>((
                ResultsVm::from_handoff(&ExamHandoff::from(completed)),
                exam.id().value(),
            ))
        }
    });

    rsx! {
        div { class: "page results",
            match view_state_from_resource(&resource) {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { {tr.t("state.loading")} }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", {tr.t(err.message_key())} }
                    Link { to: Route::MockExams {}, {tr.t("results.backToExams")} }
                },
                ViewState::Ready((ResultsVm::Completed(vm), exam_id)) => rsx! {
                    CompletedResults { vm, exam_id: Some(exam_id) }
                },
                ViewState::Ready((ResultsVm::NoAttempt, _)) => rsx! {
                    p { class: "no-attempt", {tr.t("results.noAttempt")} }
                },
            }
        }
    }
}

#[component]
fn CompletedResults(vm: CompletedResultsVm, exam_id: Option<u64>) -> Element {
    let ctx = use_context::<AppContext>();
    let tr = ctx.translations();

    let verdict_key = if vm.passed { "results.passed" } else { "results.failed" };
    let class = if vm.passed { "results-summary" } else { "results-summary failed" };

    rsx! {
        h2 { {tr.t("results.title")} }
        p { class: "exam-title", "{vm.title}" }
        if vm.expired {
            p { class: "warning", {tr.t("results.timeExpired")} }
        }
        div { class,
            p { class: "score", "{vm.score}%" }
            p { class: "verdict", {tr.t(verdict_key)} }
        }
        h3 { {tr.t("results.yourResults")} }
        dl {
            dt { {tr.t("results.correct")} }
            dd { "{vm.correct} / {vm.total}" }
            dt { {tr.t("results.incorrect")} }
            dd { "{vm.incorrect}" }
            dt { {tr.t("results.unanswered")} }
            dd { "{vm.unanswered}" }
            dt { {tr.t("results.timeSpent")} }
            dd { "{vm.time_spent_str}" }
            dt { {tr.t("results.passingScore")} }
            dd { "{vm.passing_score}%" }
        }
        p { class: "performance", {tr.t(vm.performance_key)} }
        if !vm.review.is_empty() {
            section { class: "question-review",
                h3 { {tr.t("results.questionReview")} }
                for item in vm.review.iter() {
                    ReviewItem { key: "{item.number}", item: item.clone() }
                }
            }
        }
        div { class: "results-actions",
            Link { to: Route::MockExams {}, {tr.t("results.backToExams")} }
            if let Some(exam_id) = exam_id {
                Link { to: Route::AttemptHistory { exam_id }, {tr.t("mockExams.viewAttempts")} }
                Link { to: Route::TakeExam { exam_id }, {tr.t("results.retake")} }
            }
        }
    }
}

#[component]
fn ReviewItem(item: ReviewItemVm) -> Element {
    let ctx = use_context::<AppContext>();
    let tr = ctx.translations();

    let class = if item.is_correct { "review-item correct" } else { "review-item incorrect" };
    let heading = format!("{} {}", tr.t("exam.question"), item.number);
    let chosen = item
        .chosen
        .map_or_else(|| tr.t("results.notAnswered"), |letter| letter.to_string());

    rsx! {
        details { class, open: !item.is_correct,
            summary {
                strong { "{heading}" }
                span { class: "review-prompt", "{item.prompt}" }
            }
            ul { class: "review-options",
                for option in item.options.iter() {
                    li { key: "{option.letter}", class: review_option_class(option),
                        span { class: "letter", "{option.letter}" }
                        span { "{option.text}" }
                    }
                }
            }
            p { {format!("{}: {chosen}", tr.t("results.yourAnswer"))} }
            p { {format!("{}: {}", tr.t("results.correctAnswer"), item.correct_letter)} }
            if let Some(explanation) = item.explanation.as_ref() {
                div { class: "explanation",
                    strong { {tr.t("results.explanation")} }
                    p { "{explanation}" }
                }
            }
        }
    }
}

fn review_option_class(option: &ReviewOptionVm) -> &'static str {
    match (option.is_key, option.chosen) {
        (true, _) => "review-option key",
        (false, true) => "review-option chosen",
        (false, false) => "review-option",
    }
}
