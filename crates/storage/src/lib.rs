#![forbid(unsafe_code)]

pub mod fixtures;
pub mod repository;
pub mod sqlite;

pub use repository::{
    AttemptId, AttemptRepository, AttemptRow, AttemptSummary, ExamRepository, InMemoryRepository,
    Storage, StorageError,
};
