#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod session;
pub mod time;

pub use error::Error;
pub use session::{ExamSession, SessionError, SessionState, TickOutcome};
pub use time::Clock;
