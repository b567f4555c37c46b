use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::{MilestoneId, SubjectId};
use crate::model::validation::{ValidationError, non_blank};
use crate::time::{iso8601, truncate_to_millis};

/// A checkable sub-goal belonging to one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    id: MilestoneId,
    subject_id: SubjectId,
    text: String,
    #[serde(with = "iso8601")]
    date: DateTime<Utc>,
    #[serde(default)]
    completed: bool,
}

impl Milestone {
    #[must_use]
    pub fn new(
        id: MilestoneId,
        subject_id: SubjectId,
        text: impl Into<String>,
        date: DateTime<Utc>,
        completed: bool,
    ) -> Self {
        Self {
            id,
            subject_id,
            text: text.into(),
            date,
            completed,
        }
    }

    #[must_use]
    pub fn id(&self) -> &MilestoneId {
        &self.id
    }

    #[must_use]
    pub fn subject_id(&self) -> &SubjectId {
        &self.subject_id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }

    pub fn apply(&mut self, patch: MilestonePatch) {
        if let Some(subject_id) = patch.subject_id {
            self.subject_id = subject_id;
        }
        if let Some(text) = patch.text {
            self.text = text;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
    }
}

/// Partial update for a [`Milestone`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MilestonePatch {
    pub subject_id: Option<SubjectId>,
    pub text: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub completed: Option<bool>,
}

impl MilestonePatch {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }
}

/// Unvalidated milestone form input.
#[derive(Debug, Clone, Default)]
pub struct MilestoneDraft {
    pub subject_id: Option<SubjectId>,
    pub text: String,
}

impl MilestoneDraft {
    #[must_use]
    pub fn new(subject_id: SubjectId, text: impl Into<String>) -> Self {
        Self {
            subject_id: Some(subject_id),
            text: text.into(),
        }
    }

    /// Validate the draft into an open milestone dated `now`.
    ///
    /// Does not check that the subject exists; callers holding the subject
    /// list do that.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingSubject` or
    /// `ValidationError::EmptyMilestoneText`.
    pub fn validate(self, now: DateTime<Utc>) -> Result<Milestone, ValidationError> {
        let subject_id = self
            .subject_id
            .filter(|id| !id.as_str().trim().is_empty())
            .ok_or(ValidationError::MissingSubject)?;
        let text = non_blank(&self.text).ok_or(ValidationError::EmptyMilestoneText)?;
        Ok(Milestone::new(
            MilestoneId::generate(),
            subject_id,
            text,
            truncate_to_millis(now),
            false,
        ))
    }
}
