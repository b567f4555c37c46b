use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::countdown::{Countdown, countdown};
use crate::model::ids::ExamId;
use crate::model::validation::{ValidationError, non_blank};
use crate::time::{iso8601, truncate_to_millis};

/// A named target date tracked for remaining-time display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamCountdown {
    id: ExamId,
    name: String,
    #[serde(with = "iso8601")]
    date: DateTime<Utc>,
}

impl ExamCountdown {
    #[must_use]
    pub fn new(id: ExamId, name: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            date,
        }
    }

    #[must_use]
    pub fn id(&self) -> &ExamId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Remaining time until the exam as seen from `now`.
    #[must_use]
    pub fn countdown(&self, now: DateTime<Utc>) -> Countdown {
        countdown(self.date, now)
    }

    pub fn apply(&mut self, patch: ExamPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
    }
}

/// Partial update for an [`ExamCountdown`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExamPatch {
    pub name: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

/// Unvalidated exam form input; both fields are required.
#[derive(Debug, Clone, Default)]
pub struct ExamDraft {
    pub name: String,
    pub date: Option<DateTime<Utc>>,
}

impl ExamDraft {
    #[must_use]
    pub fn new(name: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            date: Some(date),
        }
    }

    /// # Errors
    ///
    /// Returns `ValidationError::EmptyExamName` or `ValidationError::MissingExamDate`.
    pub fn validate(self) -> Result<ExamCountdown, ValidationError> {
        let name = non_blank(&self.name).ok_or(ValidationError::EmptyExamName)?;
        let date = self.date.ok_or(ValidationError::MissingExamDate)?;
        Ok(ExamCountdown::new(
            ExamId::generate(),
            name,
            truncate_to_millis(date),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn draft_without_date_is_rejected() {
        let draft = ExamDraft {
            name: "Finals".into(),
            date: None,
        };
        assert_eq!(draft.validate().unwrap_err(), ValidationError::MissingExamDate);
    }

    #[test]
    fn draft_without_name_is_rejected() {
        let draft = ExamDraft::new("", fixed_now());
        assert_eq!(draft.validate().unwrap_err(), ValidationError::EmptyExamName);
    }

    #[test]
    fn exam_reports_its_countdown() {
        let exam = ExamDraft::new("Finals", fixed_now() + chrono::Duration::days(2))
            .validate()
            .unwrap();
        assert_eq!(exam.countdown(fixed_now()).to_string(), "2d 0h 0m");
    }
}
