//! Durable storage keys, one per collection.
//!
//! Each key holds a JSON array of records with dates as ISO-8601 strings.
//! These names are part of the on-disk format: renaming one orphans the data
//! already stored under it.

pub const SUBJECTS: &str = "study-tracker.subjects";
pub const MILESTONES: &str = "study-tracker.milestones";
pub const PROGRESS_ENTRIES: &str = "study-tracker.progress-entries";
pub const EXAM_COUNTDOWNS: &str = "study-tracker.exam-countdowns";

/// Every collection key, in dependency order.
pub const ALL: [&str; 4] = [SUBJECTS, MILESTONES, PROGRESS_ENTRIES, EXAM_COUNTDOWNS];
