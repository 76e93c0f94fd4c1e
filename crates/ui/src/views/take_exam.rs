use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use bda_core::model::ExamId;
use bda_core::session::TickOutcome;
use services::SessionTicker;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{ExamIntent, ExamVm, GridCellVm, OptionVm, start_exam};

/// Render-time copy of the exam screen, so event handlers never hold a borrow of the run.
#[derive(Clone, Debug, PartialEq, Eq)]
struct ExamScreen {
    title: String,
    question_number: usize,
    total_questions: usize,
    prompt: String,
    options: Vec<OptionVm>,
    remaining: String,
    low_time: bool,
    answered: usize,
    unanswered: usize,
    can_go_previous: bool,
    can_go_next: bool,
    finished: bool,
    grid: Vec<GridCellVm>,
}

impl ExamScreen {
    fn from_vm(vm: &ExamVm) -> Self {
        Self {
            title: vm.title().to_owned(),
            question_number: vm.question_number(),
            total_questions: vm.total_questions(),
            prompt: vm.prompt().to_owned(),
            options: vm.options(),
            remaining: vm.remaining_str(),
            low_time: vm.is_low_time(),
            answered: vm.answered_count(),
            unanswered: vm.unanswered_count(),
            can_go_previous: vm.can_go_previous(),
            can_go_next: vm.can_go_next(),
            finished: vm.is_finished(),
            grid: vm.grid(),
        }
    }
}

#[component]
pub fn TakeExamView(exam_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let tr = ctx.translations();
    let sessions = ctx.sessions();
    let exam_id = ExamId::new(exam_id);

    let vm = use_signal(|| None::<ExamVm>);
    let confirming = use_signal(|| false);
    let submitting = use_signal(|| false);
    let submit_error = use_signal(|| None::<ViewError>);

    let sessions_for_resource = sessions.clone();
    let resource = use_resource(move || {
        let sessions = sessions_for_resource.clone();
        let mut vm = vm;
        async move {
            let started = start_exam(&sessions, exam_id).await?;
            vm.set(Some(started));
            Ok::<_, ViewError>(())
        }
    });

    let finish = {
        let ctx = ctx.clone();
        use_callback(move |()| {
            let mut vm = vm;
            let mut confirming = confirming;
            let mut submitting = submitting;
            let mut submit_error = submit_error;
            if submitting() {
                return;
            }
            let sessions = sessions.clone();
            let ctx = ctx.clone();

            spawn(async move {
                submitting.set(true);
                confirming.set(false);
                let taken = vm.write().take();
                let Some(mut exam) = taken else {
                    submitting.set(false);
                    return;
                };

                let result = exam.finish(&sessions).await;

                // Put the run back so a failed write can be retried from the same screen.
                vm.set(Some(exam));
                submitting.set(false);

                match result {
                    Ok(completed) => {
                        submit_error.set(None);
                        ctx.hand_off_results(completed);
                        let _ = navigator.push(Route::ExamResults {});
                    }
                    Err(err) => submit_error.set(Some(err)),
                }
            });
        })
    };

    let dispatch = use_callback(move |intent: ExamIntent| {
        let mut vm = vm;
        let mut submit_error = submit_error;
        let applied = match vm.write().as_mut() {
            Some(exam) => exam.apply(intent),
            None => Ok(()),
        };
        if let Err(err) = applied {
            submit_error.set(Some(err));
        }
    });

    use_future(move || async move {
        let mut vm = vm;
        let mut ticker = SessionTicker::new();
        loop {
            ticker.tick().await;
            let outcome = match vm.write().as_mut() {
                Some(exam) => exam.tick(),
                None => continue,
            };
            if matches!(outcome, TickOutcome::Expired(_)) {
                tracing::info!(exam = %exam_id, "exam time expired");
                finish.call(());
                break;
            }
        }
    });

    let state = view_state_from_resource(&resource);
    let screen = vm.read().as_ref().map(ExamScreen::from_vm);

    rsx! {
        div { class: "page take-exam",
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { {tr.t("state.loading")} }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", {tr.t(err.message_key())} }
                    Link { to: Route::MockExams {}, {tr.t("results.backToExams")} }
                },
                ViewState::Ready(()) => match screen {
                    Some(screen) => rsx! {
                        ExamBody {
                            screen,
                            submitting: submitting(),
                            confirming: confirming(),
                            error: submit_error(),
                            on_intent: move |intent| dispatch.call(intent),
                            on_confirm: move |open: bool| {
                                let mut confirming = confirming;
                                confirming.set(open);
                            },
                            on_finish: move |()| finish.call(()),
                        }
                    },
                    None => rsx! {
                        p { {tr.t("exam.submitting")} }
                    },
                },
            }
        }
    }
}

#[component]
fn ExamBody(
    screen: ExamScreen,
    submitting: bool,
    confirming: bool,
    error: Option<ViewError>,
    on_intent: EventHandler<ExamIntent>,
    on_confirm: EventHandler<bool>,
    on_finish: EventHandler<()>,
) -> Element {
    let ctx = use_context::<AppContext>();
    let tr = ctx.translations();

    let timer_class = if screen.low_time { "timer low-time" } else { "timer" };
    let progress = format!(
        "{} {} {} {}",
        tr.t("exam.question"),
        screen.question_number,
        tr.t("exam.of"),
        screen.total_questions
    );
    let answered_label = format!(
        "{} {} {} {}",
        tr.t("exam.confirmBody"),
        screen.answered,
        tr.t("exam.of"),
        screen.total_questions
    );
    let locked = screen.finished || submitting;

    let option_nodes = screen.options.iter().map(|option| {
        let index = option.index;
        let class = if option.selected { "option selected" } else { "option" };
        rsx! {
            button {
                key: "{option.letter}",
                class,
                r#type: "button",
                disabled: locked,
                onclick: move |_| on_intent.call(ExamIntent::Select(index)),
                span { class: "letter", "{option.letter}" }
                span { "{option.text}" }
            }
        }
    });

    let grid_nodes = screen.grid.iter().map(|cell| {
        let index = cell.index;
        let class = match (cell.current, cell.answered) {
            (true, _) => "grid-cell current",
            (false, true) => "grid-cell answered",
            (false, false) => "grid-cell",
        };
        rsx! {
            button {
                key: "{cell.number}",
                class,
                r#type: "button",
                disabled: locked,
                onclick: move |_| on_intent.call(ExamIntent::Jump(index)),
                "{cell.number}"
            }
        }
    });

    rsx! {
        header { class: "exam-header",
            h2 { "{screen.title}" }
            span { class: "progress", "{progress}" }
            div { class: timer_class,
                span { {tr.t("exam.timeRemaining")} }
                strong { "{screen.remaining}" }
            }
        }
        if let Some(err) = error {
            p { class: "error", {tr.t(err.message_key())} }
        }
        div { class: "exam-body",
            section { class: "question",
                p { class: "prompt", "{screen.prompt}" }
                div { class: "options", {option_nodes} }
                div { class: "exam-nav",
                    button {
                        r#type: "button",
                        disabled: locked || !screen.can_go_previous,
                        onclick: move |_| on_intent.call(ExamIntent::Previous),
                        {tr.t("exam.previous")}
                    }
                    button {
                        r#type: "button",
                        disabled: locked || !screen.can_go_next,
                        onclick: move |_| on_intent.call(ExamIntent::Next),
                        {tr.t("exam.next")}
                    }
                    if !screen.can_go_next {
                        button {
                            class: "btn btn-primary",
                            r#type: "button",
                            disabled: submitting,
                            onclick: move |_| on_confirm.call(true),
                            {tr.t("exam.finish")}
                        }
                    }
                }
            }
            aside { class: "navigator",
                h3 { {tr.t("exam.navigator")} }
                div { class: "grid", {grid_nodes} }
                p { {format!("{}: {}", tr.t("exam.answered"), screen.answered)} }
                p { {format!("{}: {}", tr.t("exam.notAnswered"), screen.unanswered)} }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: submitting,
                    onclick: move |_| on_confirm.call(true),
                    {tr.t("exam.finish")}
                }
            }
        }
        if confirming {
            div { class: "confirm",
                div { class: "confirm-dialog",
                    h3 { {tr.t("exam.confirmTitle")} }
                    p { "{answered_label}" }
                    if screen.unanswered > 0 {
                        p { class: "warning", {tr.t("exam.confirmUnanswered")} }
                    }
                    button {
                        r#type: "button",
                        onclick: move |_| on_confirm.call(false),
                        {tr.t("exam.cancel")}
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        disabled: submitting,
                        onclick: move |_| on_finish.call(()),
                        if submitting {
                            {tr.t("exam.submitting")}
                        } else {
                            {tr.t("exam.confirm")}
                        }
                    }
                }
            }
        }
    }
}
