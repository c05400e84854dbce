//! Processing statistics tracking.
//!
//! Thread-safe counters for task failures and for record families that came
//! back empty during a collection run.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::ErrorType;
use crate::dns::{RawDnsBag, RecordFamily};

/// Thread-safe processing statistics tracker.
///
/// Tracks task errors and per-family misses using atomic counters, so the
/// collecting loop and progress logging can read it while tasks run. All keys
/// are initialized to zero on creation.
///
/// A miss is not an error: an empty AAAA family is the common case. The counts
/// are reported at the end of a run to spot resolver problems (every family
/// empty for every host usually means the resolvers are unreachable).
pub struct ProcessingStats {
    errors: HashMap<ErrorType, AtomicUsize>,
    misses: HashMap<RecordFamily, AtomicUsize>,
}

impl Default for ProcessingStats {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingStats {
    /// Creates a tracker with every counter at zero.
    pub fn new() -> Self {
        let mut errors = HashMap::new();
        for error in ErrorType::iter() {
            errors.insert(error, AtomicUsize::new(0));
        }

        let mut misses = HashMap::new();
        for family in RecordFamily::iter() {
            misses.insert(family, AtomicUsize::new(0));
        }

        ProcessingStats { errors, misses }
    }

    /// Increment an error counter.
    pub fn increment_error(&self, error: ErrorType) {
        if let Some(counter) = self.errors.get(&error) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment error counter for {:?} which is not in the map. \
                 This indicates a bug in ProcessingStats initialization.",
                error
            );
        }
    }

    /// Increment the miss counter of a record family.
    pub fn increment_miss(&self, family: RecordFamily) {
        if let Some(counter) = self.misses.get(&family) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Counts every empty family of a finished bag as a miss.
    pub fn record_bag(&self, bag: &RawDnsBag) {
        for family in RecordFamily::iter() {
            if bag.records(family).is_empty() {
                self.increment_miss(family);
            }
        }
    }

    /// Get the count for an error type.
    pub fn get_error_count(&self, error: ErrorType) -> usize {
        self.errors
            .get(&error)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Get the miss count for a record family.
    pub fn get_miss_count(&self, family: RecordFamily) -> usize {
        self.misses
            .get(&family)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Get total error count across all error types.
    pub fn total_errors(&self) -> usize {
        ErrorType::iter().map(|e| self.get_error_count(e)).sum()
    }

    /// Get total miss count across all record families.
    pub fn total_misses(&self) -> usize {
        RecordFamily::iter().map(|f| self.get_miss_count(f)).sum()
    }
}
