// src/models/mod.rs

//! Domain models for the dashboard application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod course;
mod course_data;

// Re-export all public types
pub use config::{
    COOKIE_ENV, Config, HttpConfig, PathsConfig, PortalConfig, ServerConfig, SessionConfig,
};
pub use course::{
    Course, CourseListing, ParsedNum, UNTITLED_FOLDER, format_number, sanitize_folder_name,
};
pub use course_data::{
    Assessment, CourseDataBundle, GroupList, Material, ScoreBundle, SubpageKind, SubpageUrls,
};
