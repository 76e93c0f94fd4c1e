mod answers;
mod attempt;
mod exam;
mod ids;
mod locale;
mod question;
mod result;
mod role;

pub use answers::{AnswerMap, QuestionStatus};
pub use attempt::{AttemptError, AttemptRecord};
pub use exam::{DEFAULT_PASSING_SCORE, Exam, ExamCategory, ExamDifficulty, ExamError};
pub use ids::{ExamId, ParseIdError, QuestionId};
pub use locale::{Locale, ParseLocaleError};
pub use question::{OPTION_COUNT, OptionIndex, Question, QuestionError};
pub use result::{ExamOutcome, FinishReason, Performance, SessionResult, score_percent};
pub use role::{ParseRoleError, Role};
