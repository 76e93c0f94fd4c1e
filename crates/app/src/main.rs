mod config;
mod telemetry;

use std::sync::Arc;

use clap::Parser;
use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use thiserror::Error;
use tracing::info;

use bda_core::model::ExamId;
use services::{
    AppServices, AppServicesError, AttemptHistoryService, Clock, ExamCatalogService,
    ExamSessionService,
};
use storage::fixtures::practice_exam;
use storage::repository::{ExamRepository, Storage, StorageError};
use storage::sqlite::SqliteInitError;
use ui::{App, PortalSession, Translations, TranslationsError, UiApp, build_app_context};

use crate::config::{Cli, Command, ConfigError, SeedArgs, UiArgs, prepare_sqlite_file};
use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
#[non_exhaustive]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    #[error(transparent)]
    Bootstrap(#[from] AppServicesError),

    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Core(#[from] bda_core::Error),

    #[error(transparent)]
    Translations(#[from] TranslationsError),
}

struct DesktopApp {
    services: AppServices,
}

impl UiApp for DesktopApp {
    fn default_exam_id(&self) -> ExamId {
        self.services.exam_id()
    }

    fn catalog(&self) -> Arc<ExamCatalogService> {
        self.services.catalog()
    }

    fn sessions(&self) -> Arc<ExamSessionService> {
        self.services.sessions()
    }

    fn history(&self) -> Arc<AttemptHistoryService> {
        self.services.history()
    }
}

async fn launch_ui(args: UiArgs) -> Result<(), AppError> {
    let db_url = args.db.normalized_db_url();
    prepare_sqlite_file(&db_url)?;

    let services =
        AppServices::new_sqlite(&db_url, Clock::system(), args.db.exam_id(), args.shuffle).await?;
    info!(
        db = %db_url,
        exam = %services.exam_id(),
        provisioned = services.provisioned_practice_exam(),
        role = %args.role,
        locale = %args.locale,
        "launching portal"
    );

    let translations = Translations::embedded(args.locale)?;
    let session = PortalSession::new(args.name, args.role);
    let app: Arc<dyn UiApp> = Arc::new(DesktopApp { services });
    let context = build_app_context(&app, session, translations);

    // Dioxus/tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("BDA Portal")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

async fn seed(args: SeedArgs) -> Result<(), AppError> {
    let db_url = args.db.normalized_db_url();
    prepare_sqlite_file(&db_url)?;

    let storage = Storage::sqlite(&db_url).await?;
    let exam = practice_exam(args.db.exam_id())?;
    storage.exams.upsert_exam(&exam).await?;
    info!(
        db = %db_url,
        exam = %exam.id(),
        questions = exam.question_count(),
        "seeded practice exam"
    );
    Ok(())
}

async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    telemetry::init(&cli.log)?;

    match cli.into_command() {
        Command::Ui(args) => launch_ui(args).await,
        Command::Seed(args) => seed(args).await,
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // Binary glue: report once and exit.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
