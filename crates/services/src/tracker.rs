use std::path::PathBuf;
use std::sync::Arc;

use log::{info, warn};
use storage::PersistentStore;
use study_core::model::{
    ExamCountdown, ExamDraft, ExamId, Milestone, MilestoneDraft, MilestoneId, ProgressEntry,
    ProgressEntryDraft, ProgressEntryId, Subject, SubjectDraft, SubjectId, SubjectPatch,
    ValidationError, palette_color,
};
use study_core::{Clock, Countdown, proximity_percent};

use crate::config::{CascadePolicy, StoreConfig};
use crate::error::TrackerInitError;
use crate::store::{CountdownStore, MilestoneStore, ProgressStore, SubjectStore};

/// An exam with its countdown as of the tracker clock's now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamStatus {
    pub exam: ExamCountdown,
    pub countdown: Countdown,
    pub proximity_percent: u8,
}

/// What `remove_subject` touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubjectRemoval {
    pub subject_removed: bool,
    pub milestones_removed: usize,
    /// Progress entries still pointing at the removed subject.
    pub stale_progress_entries: usize,
}

/// The application's single set of stores, built once at start-up and
/// handed to every consumer.
///
/// Cloning is cheap and every clone shares the same stores.
#[derive(Clone)]
pub struct StudyTracker {
    clock: Clock,
    config: StoreConfig,
    subjects: Arc<SubjectStore>,
    milestones: Arc<MilestoneStore>,
    progress: Arc<ProgressStore>,
    countdowns: Arc<CountdownStore>,
}

impl StudyTracker {
    #[must_use]
    pub fn new(persistence: PersistentStore, clock: Clock, config: StoreConfig) -> Self {
        Self {
            clock,
            config,
            subjects: Arc::new(SubjectStore::with_seed(
                persistence.clone(),
                config.seed.subjects(),
            )),
            milestones: Arc::new(MilestoneStore::new(persistence.clone())),
            progress: Arc::new(ProgressStore::new(persistence.clone())),
            countdowns: Arc::new(CountdownStore::new(persistence)),
        }
    }

    /// A tracker over a data directory of JSON files.
    ///
    /// # Errors
    ///
    /// Returns `TrackerInitError::Storage` if the directory cannot be created.
    pub fn open(
        data_dir: impl Into<PathBuf>,
        clock: Clock,
        config: StoreConfig,
    ) -> Result<Self, TrackerInitError> {
        let persistence = PersistentStore::file(data_dir)?;
        Ok(Self::new(persistence, clock, config))
    }

    /// A tracker that keeps everything in memory for this process only.
    #[must_use]
    pub fn in_memory(clock: Clock, config: StoreConfig) -> Self {
        Self::new(PersistentStore::in_memory(), clock, config)
    }

    /// Load every collection now instead of on first access.
    pub fn initialize(&self) {
        self.subjects.initialize();
        self.milestones.initialize();
        self.progress.initialize();
        self.countdowns.initialize();
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn config(&self) -> StoreConfig {
        self.config
    }

    #[must_use]
    pub fn subjects(&self) -> Arc<SubjectStore> {
        Arc::clone(&self.subjects)
    }

    #[must_use]
    pub fn milestones(&self) -> Arc<MilestoneStore> {
        Arc::clone(&self.milestones)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressStore> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn countdowns(&self) -> Arc<CountdownStore> {
        Arc::clone(&self.countdowns)
    }

    // ─── Subjects ──────────────────────────────────────────────────────────────

    /// Validate and store a new subject.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the draft is rejected.
    pub fn create_subject(&self, draft: SubjectDraft) -> Result<Subject, ValidationError> {
        let subject = draft.validate()?;
        let subject = self
            .subjects
            .with_items(|subjects| subject.with_color(palette_color(subjects.len())));
        self.subjects.add(subject.clone());
        info!(
            "event=subject_created module=services status=ok id={}",
            subject.id()
        );
        Ok(subject)
    }

    /// Rename a subject. Existing progress entries keep the old name.
    ///
    /// Returns `Ok(false)` if the subject does not exist.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptySubjectName` for a blank name.
    pub fn rename_subject(&self, id: &SubjectId, name: &str) -> Result<bool, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptySubjectName);
        }
        Ok(self.subjects.update(id, SubjectPatch::name(name)))
    }

    /// Remove a subject, cascading to its milestones when configured.
    pub fn remove_subject(&self, id: &SubjectId) -> SubjectRemoval {
        let subject_removed = self.subjects.remove(id);
        let milestones_removed = match self.config.cascade {
            CascadePolicy::Milestones => self.milestones.remove_where(|m| m.subject_id() == id),
            CascadePolicy::None => 0,
        };
        let stale_progress_entries = self
            .progress
            .with_items(|entries| entries.iter().filter(|e| e.subject_id() == id).count());

        if stale_progress_entries > 0 {
            warn!(
                "event=subject_removed module=services status=stale_refs id={id} progress_entries={stale_progress_entries}"
            );
        }
        info!(
            "event=subject_removed module=services status=ok id={id} removed={subject_removed} milestones_removed={milestones_removed}"
        );

        SubjectRemoval {
            subject_removed,
            milestones_removed,
            stale_progress_entries,
        }
    }

    // ─── Milestones ────────────────────────────────────────────────────────────

    /// Validate and store a new open milestone dated now.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the draft is rejected or its subject does
    /// not exist.
    pub fn add_milestone(&self, draft: MilestoneDraft) -> Result<Milestone, ValidationError> {
        let milestone = draft.validate(self.clock.now())?;
        if !self.subjects.contains(milestone.subject_id()) {
            return Err(ValidationError::UnknownSubject(
                milestone.subject_id().clone(),
            ));
        }
        self.milestones.add(milestone.clone());
        Ok(milestone)
    }

    pub fn toggle_milestone(&self, id: &MilestoneId) -> bool {
        self.milestones.toggle(id)
    }

    pub fn remove_milestone(&self, id: &MilestoneId) -> bool {
        self.milestones.remove(id)
    }

    // ─── Progress ──────────────────────────────────────────────────────────────

    /// Validate a progress entry against the current subjects and store it.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the draft is rejected.
    pub fn log_progress(&self, draft: ProgressEntryDraft) -> Result<ProgressEntry, ValidationError> {
        let entry = self
            .subjects
            .with_items(|subjects| draft.validate(subjects))?;
        self.progress.add(entry.clone());
        info!(
            "event=progress_logged module=services status=ok id={} subject_id={}",
            entry.id(),
            entry.subject_id()
        );
        Ok(entry)
    }

    pub fn remove_progress_entry(&self, id: &ProgressEntryId) -> bool {
        self.progress.remove(id)
    }

    // ─── Exams ─────────────────────────────────────────────────────────────────

    /// Validate and store a new exam countdown.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the draft is rejected.
    pub fn add_exam(&self, draft: ExamDraft) -> Result<ExamCountdown, ValidationError> {
        let exam = draft.validate()?;
        self.countdowns.add(exam.clone());
        Ok(exam)
    }

    pub fn remove_exam(&self, id: &ExamId) -> bool {
        self.countdowns.remove(id)
    }

    /// Every exam with its countdown, in insertion order.
    #[must_use]
    pub fn exam_statuses(&self) -> Vec<ExamStatus> {
        let now = self.clock.now();
        self.countdowns.with_items(|exams| {
            exams
                .iter()
                .map(|exam| ExamStatus {
                    exam: exam.clone(),
                    countdown: exam.countdown(now),
                    proximity_percent: proximity_percent(exam.date(), now),
                })
                .collect()
        })
    }
}
