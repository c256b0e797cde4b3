//! On-disk persistence for fetched pages and downloads.
//!
//! Two trees keyed by sanitized course folder name:
//!
//! ```text
//! html/                     # Scratch: refetch cache of raw portal pages
//! └── {course}/
//!     ├── course.html
//!     ├── scores.html       # refetched every run
//!     ├── files.html        # refetched every run
//!     ├── groups.html       # fetched once
//!     ├── syllabus.html     # fetched once
//!     └── syllabus_file.pdf
//! courses/                  # Output: durable, user-facing artifacts
//! └── {course}/
//!     ├── syllabus.pdf
//!     └── material/
//!         └── {file name from URL}
//! ```

pub mod local;

pub use local::{CourseDirs, LocalStorage};
