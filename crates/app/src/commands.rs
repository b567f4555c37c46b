use std::fmt;
use std::io::Write;

use services::{StudyTracker, TrackerInitError};
use study_core::model::{ExamDraft, MilestoneDraft, ProgressEntryDraft, SubjectDraft, ValidationError};

use crate::cli::{ArgsError, Command};

#[derive(Debug)]
pub enum AppError {
    Args(ArgsError),
    Init(TrackerInitError),
    Validation(ValidationError),
    NotFound { kind: &'static str, id: String },
    Io(std::io::Error),
}

impl AppError {
    /// Usage mistakes exit with 2, everything else with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Args(_) => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Args(err) => write!(f, "{err}"),
            AppError::Init(err) => write!(f, "failed to open data directory: {err}"),
            AppError::Validation(err) => write!(f, "{err}"),
            AppError::NotFound { kind, id } => write!(f, "no {kind} with id {id}"),
            AppError::Io(err) => write!(f, "failed to write output: {err}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Args(err) => Some(err),
            AppError::Init(err) => Some(err),
            AppError::Validation(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::NotFound { .. } => None,
        }
    }
}

impl From<ArgsError> for AppError {
    fn from(err: ArgsError) -> Self {
        AppError::Args(err)
    }
}

impl From<TrackerInitError> for AppError {
    fn from(err: TrackerInitError) -> Self {
        AppError::Init(err)
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err)
    }
}

fn found(hit: bool, kind: &'static str, id: impl fmt::Display) -> Result<(), AppError> {
    if hit {
        Ok(())
    } else {
        Err(AppError::NotFound {
            kind,
            id: id.to_string(),
        })
    }
}

/// Run one command against `tracker`, writing human-readable output to `out`.
pub fn execute(
    command: &Command,
    tracker: &StudyTracker,
    out: &mut impl Write,
) -> Result<(), AppError> {
    match command {
        Command::Help => {}
        Command::Subjects => {
            let milestones = tracker.milestones();
            let progress = tracker.progress();
            for subject in tracker.subjects().all() {
                writeln!(
                    out,
                    "{}\t{}\t{}\t{:.1}h",
                    subject.id(),
                    subject.name(),
                    milestones.completion(subject.id()),
                    progress.total_hours(subject.id())
                )?;
                if let Some(description) = subject.description() {
                    writeln!(out, "\t{description}")?;
                }
            }
        }
        Command::AddSubject { name, description } => {
            let subject =
                tracker.create_subject(SubjectDraft::new(name.as_str(), description.as_str()))?;
            writeln!(out, "added subject {}", subject.id())?;
        }
        Command::RemoveSubject(id) => {
            let removal = tracker.remove_subject(id);
            found(removal.subject_removed, "subject", id)?;
            writeln!(
                out,
                "removed subject {id} ({} milestones removed)",
                removal.milestones_removed
            )?;
            if removal.stale_progress_entries > 0 {
                writeln!(
                    out,
                    "{} progress entries keep the old subject name",
                    removal.stale_progress_entries
                )?;
            }
        }
        Command::Milestones => {
            let subjects = tracker.subjects();
            for milestone in tracker.milestones().all() {
                let subject = subjects
                    .get(milestone.subject_id())
                    .map_or_else(|| milestone.subject_id().to_string(), |s| s.name().to_string());
                writeln!(
                    out,
                    "[{}] {}\t{}\t{}\t{}",
                    if milestone.is_completed() { "x" } else { " " },
                    milestone.id(),
                    subject,
                    milestone.text(),
                    milestone.date().format("%Y-%m-%d")
                )?;
            }
        }
        Command::AddMilestone { subject_id, text } => {
            let milestone =
                tracker.add_milestone(MilestoneDraft::new(subject_id.clone(), text.as_str()))?;
            writeln!(out, "added milestone {}", milestone.id())?;
        }
        Command::Toggle(id) => {
            found(tracker.toggle_milestone(id), "milestone", id)?;
            let state = tracker
                .milestones()
                .get(id)
                .map_or("toggled", |m| if m.is_completed() { "completed" } else { "reopened" });
            writeln!(out, "{state} milestone {id}")?;
        }
        Command::Progress => {
            for entry in tracker.progress().all() {
                writeln!(
                    out,
                    "{}\t{}\t{}h\t{}%\t{}",
                    entry.date().format("%Y-%m-%d"),
                    entry.subject_name(),
                    entry.hours_spent().value(),
                    entry.progress_percentage().value(),
                    entry.notes()
                )?;
            }
        }
        Command::LogProgress {
            subject_id,
            hours,
            percent,
            notes,
        } => {
            let draft = ProgressEntryDraft::new(tracker.clock().now())
                .subject(subject_id.clone())
                .hours(*hours)
                .percentage(*percent)
                .notes(notes.as_str());
            let entry = tracker.log_progress(draft)?;
            writeln!(out, "logged progress {}", entry.id())?;
        }
        Command::Exams => {
            for status in tracker.exam_statuses() {
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}\t{}%",
                    status.exam.id(),
                    status.exam.name(),
                    status.exam.date().format("%Y-%m-%d %H:%M"),
                    status.countdown,
                    status.proximity_percent
                )?;
            }
        }
        Command::AddExam { name, date } => {
            let exam = tracker.add_exam(ExamDraft::new(name.as_str(), *date))?;
            writeln!(out, "added exam {} ({})", exam.id(), exam.countdown(tracker.clock().now()))?;
        }
        Command::RemoveExam(id) => {
            found(tracker.remove_exam(id), "exam", id)?;
            writeln!(out, "removed exam {id}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use services::{SeedPolicy, StoreConfig};
    use study_core::model::{MilestoneId, SubjectId};
    use study_core::time::fixed_clock;

    fn tracker() -> StudyTracker {
        StudyTracker::in_memory(
            fixed_clock(),
            StoreConfig::default().with_seed(SeedPolicy::DefaultSubjects),
        )
    }

    fn run(tracker: &StudyTracker, command: Command) -> Result<String, AppError> {
        let mut out = Vec::new();
        execute(&command, tracker, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn subjects_lists_completion_and_hours() {
        let tracker = tracker();
        let math = SubjectId::new("1");
        tracker
            .add_milestone(MilestoneDraft::new(math.clone(), "Limits"))
            .unwrap();
        tracker
            .log_progress(ProgressEntryDraft::new(tracker.clock().now()).subject(math))
            .unwrap();

        let output = run(&tracker, Command::Subjects).unwrap();
        let first = output.lines().next().unwrap();
        assert_eq!(first, "1\tMathematics\t0/1 Completed\t1.0h");
        assert_eq!(output.lines().count(), 3);
    }

    #[test]
    fn toggle_reports_new_state_and_missing_ids() {
        let tracker = tracker();
        let milestone = tracker
            .add_milestone(MilestoneDraft::new(SubjectId::new("2"), "Optics"))
            .unwrap();

        let output = run(&tracker, Command::Toggle(milestone.id().clone())).unwrap();
        assert!(output.starts_with("completed milestone"));
        let output = run(&tracker, Command::Toggle(milestone.id().clone())).unwrap();
        assert!(output.starts_with("reopened milestone"));

        let err = run(&tracker, Command::Toggle(MilestoneId::new("nope"))).unwrap_err();
        assert_eq!(err.to_string(), "no milestone with id nope");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn validation_notice_is_the_error_message() {
        let tracker = tracker();
        let err = run(
            &tracker,
            Command::AddSubject {
                name: "   ".to_string(),
                description: String::new(),
            },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Please enter a subject name");
    }

    #[test]
    fn exams_show_countdown_and_proximity() {
        let tracker = tracker();
        let now = tracker.clock().now();
        run(
            &tracker,
            Command::AddExam {
                name: "Midterm".to_string(),
                date: now + Duration::days(15) + Duration::minutes(90),
            },
        )
        .unwrap();

        let output = run(&tracker, Command::Exams).unwrap();
        let columns: Vec<_> = output.trim_end().split('\t').collect();
        assert_eq!(columns[1], "Midterm");
        assert_eq!(columns[3], "15d 1h 30m");
        assert_eq!(columns[4], "50%");
    }

    #[test]
    fn removing_subject_mentions_stale_progress() {
        let tracker = tracker();
        let physics = SubjectId::new("2");
        tracker
            .log_progress(ProgressEntryDraft::new(tracker.clock().now()).subject(physics.clone()))
            .unwrap();

        let output = run(&tracker, Command::RemoveSubject(physics)).unwrap();
        assert!(output.contains("1 progress entries keep the old subject name"));

        let progress = run(&tracker, Command::Progress).unwrap();
        assert!(progress.contains("\tPhysics\t1h\t50%\t"));
    }
}
