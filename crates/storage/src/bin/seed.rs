use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use storage::{PersistentStore, keys};
use study_core::model::{
    ExamCountdown, ExamId, Milestone, MilestoneId, ProgressEntry, ProgressEntryId,
    ProgressPercentage, StudyHours, default_subjects,
};
use study_core::time::truncate_to_millis;

#[derive(Debug, Clone)]
struct Args {
    data_dir: PathBuf,
    milestones: u32,
    entries: u32,
    exam_days: i64,
    now: Option<DateTime<Utc>>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDataDir { raw: String },
    InvalidMilestones { raw: String },
    InvalidEntries { raw: String },
    InvalidExamDays { raw: String },
    InvalidNow { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDataDir { raw } => write!(f, "invalid --data-dir value: {raw}"),
            ArgsError::InvalidMilestones { raw } => write!(f, "invalid --milestones value: {raw}"),
            ArgsError::InvalidEntries { raw } => write!(f, "invalid --entries value: {raw}"),
            ArgsError::InvalidExamDays { raw } => write!(f, "invalid --exam-days value: {raw}"),
            ArgsError::InvalidNow { raw } => {
                write!(f, "invalid --now value (expected RFC3339): {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut data_dir = std::env::var("STUDY_DATA_DIR")
            .map_or_else(|_| PathBuf::from("study-data"), PathBuf::from);
        let mut milestones = 2;
        let mut entries = 3;
        let mut exam_days = 21;
        let mut now: Option<DateTime<Utc>> = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--data-dir" => {
                    let value = require_value(&mut args, "--data-dir")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDataDir { raw: value });
                    }
                    data_dir = PathBuf::from(value);
                }
                "--milestones" => {
                    let value = require_value(&mut args, "--milestones")?;
                    milestones = value
                        .parse::<u32>()
                        .map_err(|_| ArgsError::InvalidMilestones { raw: value.clone() })?;
                }
                "--entries" => {
                    let value = require_value(&mut args, "--entries")?;
                    entries = value
                        .parse::<u32>()
                        .map_err(|_| ArgsError::InvalidEntries { raw: value.clone() })?;
                }
                "--exam-days" => {
                    let value = require_value(&mut args, "--exam-days")?;
                    exam_days = value
                        .parse::<i64>()
                        .map_err(|_| ArgsError::InvalidExamDays { raw: value.clone() })?;
                }
                "--now" => {
                    let value = require_value(&mut args, "--now")?;
                    let parsed = DateTime::parse_from_rfc3339(&value)
                        .map_err(|_| ArgsError::InvalidNow { raw: value.clone() })?
                        .with_timezone(&Utc);
                    now = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            data_dir,
            milestones,
            entries,
            exam_days,
            now,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --data-dir <path>         Data directory (default: study-data)");
    eprintln!("  --milestones <n>          Milestones per subject (default: 2)");
    eprintln!("  --entries <n>             Progress entries to write (default: 3)");
    eprintln!("  --exam-days <n>           Days until the sample exam (default: 21)");
    eprintln!("  --now <rfc3339>           Fixed current time for deterministic seeding");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  STUDY_DATA_DIR");
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let store = PersistentStore::file(&args.data_dir)?;
    let now = truncate_to_millis(args.now.unwrap_or_else(Utc::now));

    let subjects = default_subjects();

    let samples = ["Review lecture notes", "Finish problem set", "Summarize chapter"];
    let mut milestones = Vec::new();
    for subject in &subjects {
        for i in 0..args.milestones {
            let text = samples[(i as usize) % samples.len()];
            milestones.push(Milestone::new(
                MilestoneId::generate(),
                subject.id().clone(),
                text,
                now - Duration::days(i64::from(i)),
                i == 0,
            ));
        }
    }

    let mut entries = Vec::new();
    for i in 0..args.entries {
        let subject = &subjects[(i as usize) % subjects.len()];
        let percentage = u8::try_from((i % 5 + 1) * 20).unwrap_or(100);
        entries.push(ProgressEntry::new(
            ProgressEntryId::generate(),
            now - Duration::days(i64::from(i)),
            subject.id().clone(),
            subject.name(),
            StudyHours::new(1.5)?,
            ProgressPercentage::new(percentage)?,
            "",
        ));
    }

    let exams = vec![ExamCountdown::new(
        ExamId::generate(),
        "Midterm",
        now + Duration::days(args.exam_days),
    )];

    store.try_save(keys::SUBJECTS, &subjects)?;
    store.try_save(keys::MILESTONES, &milestones)?;
    store.try_save(keys::PROGRESS_ENTRIES, &entries)?;
    store.try_save(keys::EXAM_COUNTDOWNS, &exams)?;

    println!(
        "Seeded {} subjects, {} milestones, {} progress entries and {} exam into {}",
        subjects.len(),
        milestones.len(),
        entries.len(),
        exams.len(),
        args.data_dir.display()
    );

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
