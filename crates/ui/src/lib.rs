pub mod app;
pub mod context;
pub mod dashboard;
pub mod i18n;
pub mod routes;
pub mod vm;
pub mod views;

pub use app::App;
pub use context::{AppContext, ExamHandoff, PortalSession, UiApp, build_app_context};
pub use dashboard::{DashboardKind, NavEntry, NavTarget, dashboard_for};
pub use i18n::{Translations, TranslationsError};
