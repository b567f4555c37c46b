use serde::{Deserialize, Serialize};

use crate::model::ids::SubjectId;
use crate::model::validation::{ValidationError, non_blank};

/// Badge styles assigned to subjects in rotation, by creation order.
pub const SUBJECT_COLORS: [&str; 5] = [
    "bg-lavender-100 text-lavender-800 border-lavender-300",
    "bg-softBlue-100 text-softBlue-800 border-softBlue-300",
    "bg-green-100 text-green-800 border-green-300",
    "bg-amber-100 text-amber-800 border-amber-300",
    "bg-rose-100 text-rose-800 border-rose-300",
];

/// The palette entry for the subject created at `index`.
#[must_use]
pub fn palette_color(index: usize) -> &'static str {
    SUBJECT_COLORS[index % SUBJECT_COLORS.len()]
}

/// Mathematics, Physics and Computer Science with ids `1`, `2` and `3`.
#[must_use]
pub fn default_subjects() -> Vec<Subject> {
    ["Mathematics", "Physics", "Computer Science"]
        .into_iter()
        .enumerate()
        .map(|(index, name)| {
            Subject::new(SubjectId::new((index + 1).to_string()), name, None)
                .with_color(palette_color(index))
        })
        .collect()
}

/// A tracked area of study.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    id: SubjectId,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<String>,
}

impl Subject {
    #[must_use]
    pub fn new(id: SubjectId, name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description,
            color: None,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn id(&self) -> &SubjectId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// Overwrites the fields set in `patch`.
    pub fn apply(&mut self, patch: SubjectPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
    }
}

/// Partial update for a [`Subject`]. `None` leaves a field untouched;
/// `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub color: Option<Option<String>>,
}

impl SubjectPatch {
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn description(description: Option<String>) -> Self {
        Self {
            description: Some(description),
            ..Self::default()
        }
    }
}

/// Unvalidated subject form input.
#[derive(Debug, Clone, Default)]
pub struct SubjectDraft {
    pub name: String,
    pub description: String,
}

impl SubjectDraft {
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// Validate the draft and mint a subject with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptySubjectName` if the name is blank.
    pub fn validate(self) -> Result<Subject, ValidationError> {
        let name = non_blank(&self.name).ok_or(ValidationError::EmptySubjectName)?;
        Ok(Subject::new(
            SubjectId::generate(),
            name,
            non_blank(&self.description),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_trims_and_drops_blank_description() {
        let subject = SubjectDraft::new("  Physics ", "   ").validate().unwrap();
        assert_eq!(subject.name(), "Physics");
        assert_eq!(subject.description(), None);
    }

    #[test]
    fn draft_rejects_blank_name() {
        let err = SubjectDraft::new(" ", "notes").validate().unwrap_err();
        assert_eq!(err, ValidationError::EmptySubjectName);
        assert_eq!(err.to_string(), "Please enter a subject name");
    }

    #[test]
    fn patch_changes_only_named_fields() {
        let mut subject = Subject::new(SubjectId::new("1"), "Math", Some("Algebra".into()));
        subject.apply(SubjectPatch::name("Mathematics"));
        assert_eq!(subject.name(), "Mathematics");
        assert_eq!(subject.description(), Some("Algebra"));

        subject.apply(SubjectPatch::description(None));
        assert_eq!(subject.description(), None);
        assert_eq!(subject.id().as_str(), "1");
    }

    #[test]
    fn palette_rotates_by_creation_index() {
        assert_eq!(palette_color(0), SUBJECT_COLORS[0]);
        assert_eq!(palette_color(4), SUBJECT_COLORS[4]);
        assert_eq!(palette_color(5), SUBJECT_COLORS[0]);
    }

    #[test]
    fn default_subjects_carry_stable_ids_and_colors() {
        let subjects = default_subjects();
        let ids: Vec<_> = subjects.iter().map(|s| s.id().as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
        assert_eq!(subjects[1].name(), "Physics");
        assert_eq!(subjects[2].color(), Some(SUBJECT_COLORS[2]));
    }

    #[test]
    fn color_is_persisted_when_present() {
        let subject = Subject::new(SubjectId::new("1"), "Math", None).with_color("bg-rose-100");
        let json = serde_json::to_string(&subject).unwrap();
        assert_eq!(json, r#"{"id":"1","name":"Math","color":"bg-rose-100"}"#);
        let back: Subject = serde_json::from_str(&json).unwrap();
        assert_eq!(back, subject);
    }

    #[test]
    fn missing_description_deserializes_as_none() {
        let subject: Subject = serde_json::from_str(r#"{"id":"1","name":"Math"}"#).unwrap();
        assert_eq!(subject.description(), None);
        let json = serde_json::to_string(&subject).unwrap();
        assert_eq!(json, r#"{"id":"1","name":"Math"}"#);
    }
}
