use thiserror::Error;

use crate::model::ids::SubjectId;
use crate::model::values::ValueError;

/// Rejected user input. The message is the notice shown to the user; nothing
/// reaches a store when a draft fails to validate.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("Please enter a subject name")]
    EmptySubjectName,

    #[error("Please select a subject")]
    MissingSubject,

    #[error("Subject {0} does not exist")]
    UnknownSubject(SubjectId),

    #[error("Please enter a milestone")]
    EmptyMilestoneText,

    #[error("Please enter an exam name")]
    EmptyExamName,

    #[error("Please pick an exam date")]
    MissingExamDate,

    #[error("Hours spent cannot exceed {max} in a single entry")]
    TooManyHours { max: f64 },

    #[error(transparent)]
    Value(#[from] ValueError),
}

/// Trims `value` and returns `None` if nothing is left.
pub(crate) fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
