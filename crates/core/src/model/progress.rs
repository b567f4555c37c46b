use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::{ProgressEntryId, SubjectId};
use crate::model::subject::Subject;
use crate::model::validation::ValidationError;
use crate::model::values::{ProgressPercentage, StudyHours};
use crate::time::{iso8601, truncate_to_millis};

/// A dated record of study time and progress against a subject.
///
/// `subject_name` is copied from the subject when the entry is created and is
/// never refreshed afterwards, so renames and deletions leave it stale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    id: ProgressEntryId,
    #[serde(with = "iso8601")]
    date: DateTime<Utc>,
    subject_id: SubjectId,
    subject_name: String,
    hours_spent: StudyHours,
    progress_percentage: ProgressPercentage,
    #[serde(default)]
    notes: String,
}

impl ProgressEntry {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ProgressEntryId,
        date: DateTime<Utc>,
        subject_id: SubjectId,
        subject_name: impl Into<String>,
        hours_spent: StudyHours,
        progress_percentage: ProgressPercentage,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            id,
            date,
            subject_id,
            subject_name: subject_name.into(),
            hours_spent,
            progress_percentage,
            notes: notes.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &ProgressEntryId {
        &self.id
    }

    #[must_use]
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    #[must_use]
    pub fn subject_id(&self) -> &SubjectId {
        &self.subject_id
    }

    #[must_use]
    pub fn subject_name(&self) -> &str {
        &self.subject_name
    }

    #[must_use]
    pub fn hours_spent(&self) -> StudyHours {
        self.hours_spent
    }

    #[must_use]
    pub fn progress_percentage(&self) -> ProgressPercentage {
        self.progress_percentage
    }

    #[must_use]
    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn apply(&mut self, patch: ProgressEntryPatch) {
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(subject_id) = patch.subject_id {
            self.subject_id = subject_id;
        }
        if let Some(subject_name) = patch.subject_name {
            self.subject_name = subject_name;
        }
        if let Some(hours) = patch.hours_spent {
            self.hours_spent = hours;
        }
        if let Some(percentage) = patch.progress_percentage {
            self.progress_percentage = percentage;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
    }
}

/// Partial update for a [`ProgressEntry`]. Carries validated value types, so a
/// merge can never break the range invariants.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressEntryPatch {
    pub date: Option<DateTime<Utc>>,
    pub subject_id: Option<SubjectId>,
    pub subject_name: Option<String>,
    pub hours_spent: Option<StudyHours>,
    pub progress_percentage: Option<ProgressPercentage>,
    pub notes: Option<String>,
}

impl ProgressEntryPatch {
    #[must_use]
    pub fn notes(notes: impl Into<String>) -> Self {
        Self {
            notes: Some(notes.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn progress(percentage: ProgressPercentage) -> Self {
        Self {
            progress_percentage: Some(percentage),
            ..Self::default()
        }
    }
}

/// Unvalidated progress form input.
#[derive(Debug, Clone)]
pub struct ProgressEntryDraft {
    pub subject_id: Option<SubjectId>,
    pub date: DateTime<Utc>,
    pub hours_spent: f64,
    pub progress_percentage: u8,
    pub notes: String,
}

impl ProgressEntryDraft {
    /// Upper bound for a single entry, the range of the hours slider.
    pub const MAX_HOURS: f64 = 24.0;
    pub const DEFAULT_HOURS: f64 = 1.0;
    pub const DEFAULT_PERCENTAGE: u8 = 50;

    /// A blank form dated `date`: no subject, 1 hour, 50%, no notes.
    #[must_use]
    pub fn new(date: DateTime<Utc>) -> Self {
        Self {
            subject_id: None,
            date,
            hours_spent: Self::DEFAULT_HOURS,
            progress_percentage: Self::DEFAULT_PERCENTAGE,
            notes: String::new(),
        }
    }

    #[must_use]
    pub fn subject(mut self, subject_id: SubjectId) -> Self {
        self.subject_id = Some(subject_id);
        self
    }

    #[must_use]
    pub fn hours(mut self, hours: f64) -> Self {
        self.hours_spent = hours;
        self
    }

    #[must_use]
    pub fn percentage(mut self, percentage: u8) -> Self {
        self.progress_percentage = percentage;
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Validate the draft against the current subject list, snapshotting the
    /// subject's name into the entry.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingSubject` if no subject was selected,
    /// `ValidationError::UnknownSubject` if it is not in `subjects`, and
    /// range errors for hours or percentage.
    pub fn validate(self, subjects: &[Subject]) -> Result<ProgressEntry, ValidationError> {
        let subject_id = self
            .subject_id
            .filter(|id| !id.as_str().trim().is_empty())
            .ok_or(ValidationError::MissingSubject)?;
        let subject = subjects
            .iter()
            .find(|subject| subject.id() == &subject_id)
            .ok_or_else(|| ValidationError::UnknownSubject(subject_id.clone()))?;

        let hours_spent = StudyHours::new(self.hours_spent)?;
        if hours_spent.value() > Self::MAX_HOURS {
            return Err(ValidationError::TooManyHours {
                max: Self::MAX_HOURS,
            });
        }
        let progress_percentage = ProgressPercentage::new(self.progress_percentage)?;

        Ok(ProgressEntry::new(
            ProgressEntryId::generate(),
            truncate_to_millis(self.date),
            subject_id,
            subject.name(),
            hours_spent,
            progress_percentage,
            self.notes.trim(),
        ))
    }
}
