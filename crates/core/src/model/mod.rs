mod exam;
mod ids;
mod milestone;
mod progress;
mod subject;
mod validation;
mod values;

pub use ids::{ExamId, MilestoneId, ProgressEntryId, SubjectId};
pub use values::{ProgressPercentage, StudyHours, ValueError};

pub use exam::{ExamCountdown, ExamDraft, ExamPatch};
pub use milestone::{Milestone, MilestoneDraft, MilestonePatch};
pub use progress::{ProgressEntry, ProgressEntryDraft, ProgressEntryPatch};
pub use subject::{
    SUBJECT_COLORS, Subject, SubjectDraft, SubjectPatch, default_subjects, palette_color,
};
pub use validation::ValidationError;
