//! Entity model and pure computations for the study tracker.
//!
//! Nothing in this crate performs I/O; persistence lives in `storage` and
//! the shared stores in `services`.

#![forbid(unsafe_code)]

pub mod countdown;
pub mod model;
pub mod time;

pub use countdown::{Countdown, countdown, proximity_percent};
pub use time::Clock;
