//! Output files of a collection run.
//!
//! Two files are written side by side in the output directory:
//! - the raw record bags as JSON Lines, one `{hostname, label, dns}` object per line
//! - the feature vectors as CSV, one row per hostname under a fixed header
//!
//! Both are opened in append mode so an interrupted run can be resumed; the
//! hostnames already present in the bags file are skipped.

mod csv;
mod jsonl;
mod types;

pub use csv::{feature_header, FeatureWriter};
pub use jsonl::{existing_hostnames, BagWriter};
pub use types::{BagRecord, OutputPaths};
