use std::sync::Arc;

use chrono::Duration;
use services::{CascadePolicy, SeedPolicy, StoreConfig, StudyTracker};
use storage::{KeyValueStore, PersistentStore, StorageError, keys};
use study_core::model::{
    ExamDraft, MilestoneDraft, ProgressEntryDraft, Subject, SubjectDraft, SubjectId, SubjectPatch,
    palette_color,
};
use study_core::time::fixed_clock;

#[test]
fn study_flow_survives_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let clock = fixed_clock();
    let config = StoreConfig::default();

    let (subject_id, milestone_id) = {
        let tracker = StudyTracker::open(dir.path(), clock, config).expect("open tracker");
        let subject = tracker
            .create_subject(SubjectDraft::new("Linear Algebra", "MIT 18.06"))
            .expect("create subject");
        let milestone = tracker
            .add_milestone(MilestoneDraft::new(subject.id().clone(), "Eigenvalues"))
            .expect("add milestone");
        assert!(tracker.toggle_milestone(milestone.id()));
        tracker
            .log_progress(
                ProgressEntryDraft::new(clock.now())
                    .subject(subject.id().clone())
                    .hours(2.0)
                    .percentage(30)
                    .notes("chapter 6"),
            )
            .expect("log progress");
        tracker
            .add_exam(ExamDraft::new("Final", clock.now() + Duration::days(3)))
            .expect("add exam");
        (subject.id().clone(), milestone.id().clone())
    };

    let reopened = StudyTracker::open(dir.path(), clock, config).expect("reopen tracker");
    let subjects = reopened.subjects().all();
    assert_eq!(subjects.len(), 1);
    assert_eq!(subjects[0].name(), "Linear Algebra");
    assert_eq!(subjects[0].description(), Some("MIT 18.06"));

    let milestone = reopened.milestones().get(&milestone_id).expect("milestone");
    assert!(milestone.is_completed());
    assert_eq!(milestone.date(), clock.now());

    let entries = reopened.progress().for_subject(&subject_id);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].subject_name(), "Linear Algebra");
    assert_eq!(entries[0].notes(), "chapter 6");

    let statuses = reopened.exam_statuses();
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].countdown.to_string(), "3d 0h 0m");
}

#[test]
fn add_then_remove_restores_prior_state() {
    let tracker = StudyTracker::in_memory(
        fixed_clock(),
        StoreConfig::default().with_seed(SeedPolicy::DefaultSubjects),
    );
    let before = tracker.subjects().all();

    let added = tracker
        .create_subject(SubjectDraft::new("Chemistry", ""))
        .unwrap();
    assert_eq!(tracker.subjects().len(), before.len() + 1);
    assert!(tracker.subjects().remove(added.id()));

    assert_eq!(tracker.subjects().all(), before);
}

#[test]
fn update_changes_only_the_named_field_of_the_matching_record() {
    let tracker = StudyTracker::in_memory(
        fixed_clock(),
        StoreConfig::default().with_seed(SeedPolicy::DefaultSubjects),
    );
    let subjects = tracker.subjects();
    subjects.update(&SubjectId::new("1"), SubjectPatch::description(Some("Calculus".into())));

    let after = subjects.all();
    assert_eq!(
        after[0],
        Subject::new(SubjectId::new("1"), "Mathematics", Some("Calculus".into()))
            .with_color(palette_color(0))
    );
    assert_eq!(&after[1..], &services::config::default_subjects()[1..]);
}

#[test]
fn sequential_adds_never_lose_entries() {
    let tracker = StudyTracker::in_memory(
        fixed_clock(),
        StoreConfig::default().with_seed(SeedPolicy::DefaultSubjects),
    );
    let progress = tracker.progress();
    let n = 50;
    for i in 0..n {
        tracker
            .log_progress(
                ProgressEntryDraft::new(tracker.clock().now())
                    .subject(SubjectId::new("2"))
                    .hours(0.5)
                    .percentage(u8::try_from(i % 101).unwrap()),
            )
            .unwrap();
    }
    assert_eq!(progress.len(), n);
    let ids: std::collections::HashSet<_> =
        progress.all().iter().map(|e| e.id().clone()).collect();
    assert_eq!(ids.len(), n);
}

#[test]
fn removing_subject_cascades_milestones_but_leaves_progress_stale() {
    let dir = tempfile::tempdir().unwrap();
    let persistence = PersistentStore::file(dir.path()).unwrap();
    let tracker = StudyTracker::new(
        persistence.clone(),
        fixed_clock(),
        StoreConfig::default().with_seed(SeedPolicy::DefaultSubjects),
    );
    let physics = SubjectId::new("2");
    tracker
        .add_milestone(MilestoneDraft::new(physics.clone(), "Optics"))
        .unwrap();
    tracker
        .add_milestone(MilestoneDraft::new(SubjectId::new("1"), "Series"))
        .unwrap();
    tracker
        .log_progress(ProgressEntryDraft::new(tracker.clock().now()).subject(physics.clone()))
        .unwrap();

    let removal = tracker.remove_subject(&physics);
    assert!(removal.subject_removed);
    assert_eq!(removal.milestones_removed, 1);
    assert_eq!(removal.stale_progress_entries, 1);

    // Every collection written so far is still well-formed JSON on disk.
    for key in [keys::SUBJECTS, keys::MILESTONES, keys::PROGRESS_ENTRIES] {
        let raw = persistence.backend().get(key).unwrap().expect("persisted");
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value.is_array(), "{key} should hold an array");
    }
    assert!(
        persistence
            .backend()
            .get(keys::EXAM_COUNTDOWNS)
            .unwrap()
            .is_none()
    );
    assert_eq!(tracker.milestones().len(), 1);
    let entry = &tracker.progress().all()[0];
    assert_eq!(entry.subject_id(), &physics);
    assert_eq!(entry.subject_name(), "Physics");
}

#[test]
fn removing_subject_without_cascade_orphans_milestones() {
    let tracker = StudyTracker::in_memory(
        fixed_clock(),
        StoreConfig::default()
            .with_seed(SeedPolicy::DefaultSubjects)
            .with_cascade(CascadePolicy::None),
    );
    let math = SubjectId::new("1");
    tracker
        .add_milestone(MilestoneDraft::new(math.clone(), "Limits"))
        .unwrap();

    let removal = tracker.remove_subject(&math);
    assert!(removal.subject_removed);
    assert_eq!(removal.milestones_removed, 0);
    assert_eq!(tracker.milestones().for_subject(&math).len(), 1);
}

/// A medium that is always down, like a browser with storage disabled.
struct UnavailableStore;

impl KeyValueStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("disabled".into()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("disabled".into()))
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("disabled".into()))
    }
}

#[test]
fn unavailable_storage_degrades_to_memory_only() {
    let tracker = StudyTracker::new(
        PersistentStore::new(Arc::new(UnavailableStore)),
        fixed_clock(),
        StoreConfig::default().with_seed(SeedPolicy::DefaultSubjects),
    );

    // Seed still applies because nothing could be read.
    assert_eq!(tracker.subjects().len(), 3);
    let subject = tracker
        .create_subject(SubjectDraft::new("History", ""))
        .expect("writes fail silently");
    assert!(tracker.subjects().contains(subject.id()));
    assert_eq!(tracker.subjects().len(), 4);
}

#[test]
fn quota_exceeded_keeps_mutation_in_memory() {
    let backend = Arc::new(storage::InMemoryKeyValueStore::with_quota(200));
    let tracker = StudyTracker::new(
        PersistentStore::new(backend.clone()),
        fixed_clock(),
        StoreConfig::default(),
    );
    for i in 0..10 {
        tracker
            .create_subject(SubjectDraft::new(format!("Subject {i}"), "x".repeat(20)))
            .unwrap();
    }
    assert_eq!(tracker.subjects().len(), 10);

    let persisted: Vec<Subject> = PersistentStore::new(backend).load(keys::SUBJECTS);
    assert!(persisted.len() < 10);
}

#[test]
fn subscribers_receive_updated_collections() {
    let tracker = StudyTracker::in_memory(
        fixed_clock(),
        StoreConfig::default().with_seed(SeedPolicy::DefaultSubjects),
    );
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    {
        let seen = Arc::clone(&seen);
        tracker.milestones().subscribe(move |items| {
            seen.lock().unwrap().push(items.len());
        });
    }
    let milestone = tracker
        .add_milestone(MilestoneDraft::new(SubjectId::new("3"), "Graphs"))
        .unwrap();
    tracker.toggle_milestone(milestone.id());
    tracker.remove_subject(&SubjectId::new("3"));

    assert_eq!(*seen.lock().unwrap(), vec![1, 1, 0]);
}
