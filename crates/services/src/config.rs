use study_core::model::Subject;

pub use study_core::model::default_subjects;

/// What the subject store holds on first start, before anything is persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SeedPolicy {
    /// Start with no subjects.
    #[default]
    Empty,
    /// Start with Mathematics, Physics and Computer Science (ids `1`–`3`).
    DefaultSubjects,
}

impl SeedPolicy {
    /// The subjects to adopt when the subject collection has no data.
    #[must_use]
    pub fn subjects(self) -> Vec<Subject> {
        match self {
            SeedPolicy::Empty => Vec::new(),
            SeedPolicy::DefaultSubjects => default_subjects(),
        }
    }
}

/// Which dependents are deleted together with a subject.
///
/// Progress entries are never cascaded: they keep their `subject_name`
/// snapshot and a dangling `subject_id`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CascadePolicy {
    /// Removing a subject removes its milestones.
    #[default]
    Milestones,
    /// Removing a subject leaves its milestones orphaned.
    None,
}

/// Behavior switches for [`StudyTracker`](crate::StudyTracker).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreConfig {
    pub seed: SeedPolicy,
    pub cascade: CascadePolicy,
}

impl StoreConfig {
    #[must_use]
    pub fn with_seed(mut self, seed: SeedPolicy) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_cascade(mut self, cascade: CascadePolicy) -> Self {
        self.cascade = cascade;
        self
    }
}
