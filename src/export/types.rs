//! Export types.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{BAGS_FILE_NAME, FEATURES_FILE_NAME};
use crate::dns::RawDnsBag;

/// Locations of the two output files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputPaths {
    /// JSON Lines file with the raw record bags
    pub bags: PathBuf,
    /// CSV file with the feature vectors
    pub features: PathBuf,
}

impl OutputPaths {
    /// Default file names inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            bags: dir.join(BAGS_FILE_NAME),
            features: dir.join(FEATURES_FILE_NAME),
        }
    }
}

/// One line of the bags file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BagRecord {
    /// Resolved hostname
    pub hostname: String,
    /// Training label from the input, if any
    pub label: Option<String>,
    /// The bag, under its storage keys
    pub dns: RawDnsBag,
}
