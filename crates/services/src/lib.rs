#![forbid(unsafe_code)]

pub mod config;
pub mod error;
mod milestones;
mod progress;
pub mod store;
pub mod tracker;

pub use study_core::Clock;

pub use config::{CascadePolicy, SeedPolicy, StoreConfig};
pub use error::TrackerInitError;
pub use milestones::MilestoneCompletion;
pub use store::{
    CollectionStore, CountdownStore, MilestoneStore, ProgressStore, Record, SubjectStore,
    SubscriptionId,
};
pub use tracker::{ExamStatus, StudyTracker, SubjectRemoval};
