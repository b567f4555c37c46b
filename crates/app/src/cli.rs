use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use services::{CascadePolicy, SeedPolicy, StoreConfig};
use study_core::model::{ExamId, MilestoneId, SubjectId};
use study_core::time::parse_iso_string;

use crate::logging;

pub const DEFAULT_DATA_DIR: &str = "study-data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    MissingArgument {
        command: &'static str,
        name: &'static str,
    },
    UnexpectedArgument { command: &'static str, raw: String },
    InvalidNumber { name: &'static str, raw: String },
    InvalidDate { raw: String },
    InvalidDataDir { raw: String },
    InvalidLogLevel { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown command: {cmd}"),
            ArgsError::MissingArgument { command, name } => {
                write!(f, "{command} requires <{name}>")
            }
            ArgsError::UnexpectedArgument { command, raw } => {
                write!(f, "unexpected argument for {command}: {raw}")
            }
            ArgsError::InvalidNumber { name, raw } => write!(f, "invalid <{name}> value: {raw}"),
            ArgsError::InvalidDate { raw } => {
                write!(f, "invalid date: {raw} (expected RFC 3339 or YYYY-MM-DD)")
            }
            ArgsError::InvalidDataDir { raw } => write!(f, "invalid --data-dir value: {raw:?}"),
            ArgsError::InvalidLogLevel { raw } => write!(f, "invalid --log-level value: {raw}"),
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

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  app [options] <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  subjects");
    eprintln!("  add-subject <name> [description]");
    eprintln!("  remove-subject <id>");
    eprintln!("  milestones");
    eprintln!("  add-milestone <subject-id> <text>");
    eprintln!("  toggle <milestone-id>");
    eprintln!("  progress");
    eprintln!("  log-progress <subject-id> <hours> <percent> [notes]");
    eprintln!("  exams");
    eprintln!("  add-exam <name> <date>");
    eprintln!("  remove-exam <id>");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --data-dir <path>     (default ./{DEFAULT_DATA_DIR})");
    eprintln!("  --log-level <level>   trace|debug|info|warn|error");
    eprintln!("  --seed-defaults       start with Mathematics, Physics, Computer Science");
    eprintln!("  --no-cascade          keep milestones when their subject is removed");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  STUDY_DATA_DIR, STUDY_LOG_LEVEL, STUDY_SEED_DEFAULTS=1, STUDY_NO_CASCADE=1");
}

/// Settings for one run of the binary.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub log_level: &'static str,
    pub store: StoreConfig,
}

impl AppConfig {
    /// Defaults overlaid with whatever `lookup` finds in the environment.
    pub fn from_env(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ArgsError> {
        let mut config = Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            log_level: logging::default_log_level(),
            store: StoreConfig::default(),
        };

        if let Some(dir) = lookup("STUDY_DATA_DIR").filter(|dir| !dir.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(level) = lookup("STUDY_LOG_LEVEL") {
            config.log_level = parse_level(&level)?;
        }
        if lookup("STUDY_SEED_DEFAULTS").is_some_and(|value| is_truthy(&value)) {
            config.store = config.store.with_seed(SeedPolicy::DefaultSubjects);
        }
        if lookup("STUDY_NO_CASCADE").is_some_and(|value| is_truthy(&value)) {
            config.store = config.store.with_cascade(CascadePolicy::None);
        }
        Ok(config)
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_level(raw: &str) -> Result<&'static str, ArgsError> {
    logging::normalize_level(raw).map_err(|_| ArgsError::InvalidLogLevel {
        raw: raw.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Subjects,
    AddSubject {
        name: String,
        description: String,
    },
    RemoveSubject(SubjectId),
    Milestones,
    AddMilestone {
        subject_id: SubjectId,
        text: String,
    },
    Toggle(MilestoneId),
    Progress,
    LogProgress {
        subject_id: SubjectId,
        hours: f64,
        percent: u8,
        notes: String,
    },
    Exams,
    AddExam {
        name: String,
        date: DateTime<Utc>,
    },
    RemoveExam(ExamId),
}

impl Command {
    fn from_args(name: &str, args: Vec<String>) -> Result<Self, ArgsError> {
        let mut args = args.into_iter();
        let command = match name {
            "subjects" => Self::Subjects,
            "add-subject" => Self::AddSubject {
                name: required(&mut args, "add-subject", "name")?,
                description: args.next().unwrap_or_default(),
            },
            "remove-subject" => Self::RemoveSubject(SubjectId::new(required(
                &mut args,
                "remove-subject",
                "id",
            )?)),
            "milestones" => Self::Milestones,
            "add-milestone" => Self::AddMilestone {
                subject_id: SubjectId::new(required(&mut args, "add-milestone", "subject-id")?),
                text: required(&mut args, "add-milestone", "text")?,
            },
            "toggle" => Self::Toggle(MilestoneId::new(required(&mut args, "toggle", "milestone-id")?)),
            "progress" => Self::Progress,
            "log-progress" => {
                let subject_id = SubjectId::new(required(&mut args, "log-progress", "subject-id")?);
                let raw_hours = required(&mut args, "log-progress", "hours")?;
                let hours = raw_hours
                    .parse::<f64>()
                    .map_err(|_| ArgsError::InvalidNumber {
                        name: "hours",
                        raw: raw_hours.clone(),
                    })?;
                let raw_percent = required(&mut args, "log-progress", "percent")?;
                let percent = raw_percent
                    .parse::<u8>()
                    .map_err(|_| ArgsError::InvalidNumber {
                        name: "percent",
                        raw: raw_percent.clone(),
                    })?;
                Self::LogProgress {
                    subject_id,
                    hours,
                    percent,
                    notes: args.next().unwrap_or_default(),
                }
            }
            "exams" => Self::Exams,
            "add-exam" => {
                let name = required(&mut args, "add-exam", "name")?;
                let date = parse_date(&required(&mut args, "add-exam", "date")?)?;
                Self::AddExam { name, date }
            }
            "remove-exam" => Self::RemoveExam(ExamId::new(required(&mut args, "remove-exam", "id")?)),
            other => return Err(ArgsError::UnknownCommand(other.to_string())),
        };

        if let Some(raw) = args.next() {
            return Err(ArgsError::UnexpectedArgument {
                command: command.name(),
                raw,
            });
        }
        Ok(command)
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Subjects => "subjects",
            Self::AddSubject { .. } => "add-subject",
            Self::RemoveSubject(_) => "remove-subject",
            Self::Milestones => "milestones",
            Self::AddMilestone { .. } => "add-milestone",
            Self::Toggle(_) => "toggle",
            Self::Progress => "progress",
            Self::LogProgress { .. } => "log-progress",
            Self::Exams => "exams",
            Self::AddExam { .. } => "add-exam",
            Self::RemoveExam(_) => "remove-exam",
        }
    }
}

fn required(
    args: &mut impl Iterator<Item = String>,
    command: &'static str,
    name: &'static str,
) -> Result<String, ArgsError> {
    args.next()
        .ok_or(ArgsError::MissingArgument { command, name })
}

/// Accepts a full RFC 3339 timestamp or a bare `YYYY-MM-DD`, read as
/// midnight UTC.
fn parse_date(raw: &str) -> Result<DateTime<Utc>, ArgsError> {
    if let Ok(date) = parse_iso_string(raw) {
        return Ok(date);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ArgsError::InvalidDate {
            raw: raw.to_string(),
        })
}

#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub config: AppConfig,
    pub command: Command,
}

/// Resolve defaults, then environment, then flags, and pick the command.
///
/// Flags may appear anywhere; the first positional names the command and the
/// rest are its arguments.
pub fn parse(
    args: impl IntoIterator<Item = String>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Invocation, ArgsError> {
    let mut config = AppConfig::from_env(env)?;
    let mut positionals = Vec::new();
    let mut help = false;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--data-dir" => {
                let value = require_value(&mut args, "--data-dir")?;
                if value.trim().is_empty() {
                    return Err(ArgsError::InvalidDataDir { raw: value });
                }
                config.data_dir = PathBuf::from(value);
            }
            "--log-level" => {
                let value = require_value(&mut args, "--log-level")?;
                config.log_level = parse_level(&value)?;
            }
            "--seed-defaults" => {
                config.store = config.store.with_seed(SeedPolicy::DefaultSubjects);
            }
            "--no-cascade" => {
                config.store = config.store.with_cascade(CascadePolicy::None);
            }
            "--help" | "-h" => help = true,
            flag if flag.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
            _ => positionals.push(arg),
        }
    }

    let command = if help || positionals.is_empty() {
        Command::Help
    } else {
        let name = positionals.remove(0);
        Command::from_args(&name, positionals)?
    };

    Ok(Invocation { config, command })
}
