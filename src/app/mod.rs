//! Application helpers for collection runs.
//!
//! Input line parsing, progress logging and the end-of-run statistics
//! printout used by [`crate::run_collection`].

pub mod hostname;
pub mod logging;
pub mod statistics;

// Re-export public API
pub use hostname::{normalize_hostname, parse_target_line, Target};
pub use logging::log_progress;
pub use statistics::print_error_statistics;
