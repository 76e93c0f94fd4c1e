use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;

#[component]
pub fn DashboardView() -> Element {
    let ctx = use_context::<AppContext>();
    let tr = ctx.translations();
    let dashboard = ctx.dashboard();
    let name = ctx.session().display_name.clone();

    let welcome = tr.t("app.welcome");
    let title = tr.t(dashboard.title_key());

    rsx! {
        div { class: "page dashboard",
            header { class: "view-header",
                h2 { "{title}" }
                p { "{welcome}, {name}" }
            }
            if dashboard.offers_mock_exams() {
                Link { class: "btn btn-primary", to: Route::MockExams {}, {tr.t("nav.mockExams")} }
            }
        }
    }
}
