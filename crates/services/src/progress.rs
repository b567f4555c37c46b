use study_core::model::{ProgressEntry, SubjectId};

use crate::store::ProgressStore;

impl ProgressStore {
    /// Entries logged against one subject, in insertion order.
    #[must_use]
    pub fn for_subject(&self, subject_id: &SubjectId) -> Vec<ProgressEntry> {
        self.with_items(|items| {
            items
                .iter()
                .filter(|e| e.subject_id() == subject_id)
                .cloned()
                .collect()
        })
    }

    /// Sum of hours logged against one subject.
    #[must_use]
    pub fn total_hours(&self, subject_id: &SubjectId) -> f64 {
        self.with_items(|items| {
            items
                .iter()
                .filter(|e| e.subject_id() == subject_id)
                .map(|e| e.hours_spent().value())
                .sum()
        })
    }

    /// The most recently dated entry for a subject, if any.
    #[must_use]
    pub fn latest_for_subject(&self, subject_id: &SubjectId) -> Option<ProgressEntry> {
        self.with_items(|items| {
            items
                .iter()
                .filter(|e| e.subject_id() == subject_id)
                .max_by_key(|e| e.date())
                .cloned()
        })
    }
}
