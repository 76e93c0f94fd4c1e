use dioxus::prelude::*;

use services::{ExamServiceError, HistoryError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    Unknown,
    NotFound,
    Inactive,
}

impl ViewError {
    /// Translation key for the user-facing message.
    #[must_use]
    pub fn message_key(self) -> &'static str {
        match self {
            ViewError::Unknown => "error.unknown",
            ViewError::NotFound => "error.notFound",
            ViewError::Inactive => "error.inactive",
        }
    }
}

impl From<&ExamServiceError> for ViewError {
    fn from(err: &ExamServiceError) -> Self {
        match err {
            ExamServiceError::NotFound(_) => ViewError::NotFound,
            ExamServiceError::Inactive(_) => ViewError::Inactive,
            _ => ViewError::Unknown,
        }
    }
}

impl From<&HistoryError> for ViewError {
    fn from(err: &HistoryError) -> Self {
        match err {
            HistoryError::AttemptNotFound(_) => ViewError::NotFound,
            _ => ViewError::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bda_core::model::ExamId;

    #[test]
    fn service_errors_map_to_view_errors() {
        assert_eq!(
            ViewError::from(&ExamServiceError::NotFound(ExamId::new(1))),
            ViewError::NotFound
        );
        assert_eq!(
            ViewError::from(&ExamServiceError::Inactive(ExamId::new(1))),
            ViewError::Inactive
        );
        assert_eq!(
            ViewError::from(&ExamServiceError::NotFinished),
            ViewError::Unknown
        );
        assert_eq!(
            ViewError::from(&HistoryError::AttemptNotFound(4)),
            ViewError::NotFound
        );
    }
}
