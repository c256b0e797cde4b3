//! Pipeline entry points for dashboard operations.
//!
//! - `fetch_listing`: Fetch and parse the main course table
//! - `run_generation`: Sync every course and write the dashboard

pub mod course;
pub mod policy;
pub mod run;

pub use course::{CourseOutcome, CoursePipeline, CourseStats};
pub use run::{GenerationReport, fetch_listing, load_template, run_generation};
