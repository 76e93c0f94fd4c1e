mod catalog;
mod history;
mod run;
mod service;
mod ticker;

// Public API of the exam subsystem.
pub use crate::error::{ExamServiceError, HistoryError};
pub use catalog::{DEFAULT_CATALOG_LIMIT, ExamCatalogService};
pub use history::{AttemptHistoryService, AttemptListItem, ExamStats};
pub use run::{ExamMeta, ExamRun, RunId};
pub use service::{CompletedExam, ExamSessionService};
pub use ticker::{SessionTicker, TICK_PERIOD, drive_until_expired};
