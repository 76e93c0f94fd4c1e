#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod exams;

pub use bda_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, ExamServiceError, HistoryError};
pub use exams::{
    AttemptHistoryService, AttemptListItem, CompletedExam, DEFAULT_CATALOG_LIMIT,
    ExamCatalogService, ExamMeta, ExamRun, ExamSessionService, ExamStats, RunId, SessionTicker,
    TICK_PERIOD, drive_until_expired,
};
