mod catalog_vm;
mod exam_vm;
mod history_vm;
mod results_vm;
mod time_fmt;

pub use catalog_vm::{ExamCardVm, map_exam_card};
pub use exam_vm::{
    ExamIntent, ExamVm, GridCellVm, LOW_TIME_THRESHOLD_SECS, OptionVm, start_exam,
};
pub use history_vm::{AttemptRowVm, HISTORY_LIMIT};
pub use results_vm::{CompletedResultsVm, ResultsVm, ReviewItemVm, ReviewOptionVm};
pub use time_fmt::{format_date, format_hms};
