//! Reads a JSON export of time-tracking and wellness data and prints descriptive statistics:
//! work, break and call time, top applications, focus sessions, weekly patterns, wellness metrics
//! and a comparison of productive and unproductive days.
//!

pub mod cli;
pub mod error;
pub mod export;
pub mod utils;
