//! End-of-run statistics printing.

use log::info;
use strum::IntoEnumIterator;

use crate::dns::RecordFamily;
use crate::error_handling::{ErrorType, ProcessingStats};

/// Prints task error counts and per-family miss counts.
///
/// Only non-zero counters are printed. A family missing for every hostname
/// usually means the resolvers were unreachable.
pub fn print_error_statistics(stats: &ProcessingStats) {
    let total_errors = stats.total_errors();
    if total_errors > 0 {
        info!("Error Counts ({} total):", total_errors);
        for error_type in ErrorType::iter() {
            let count = stats.get_error_count(error_type);
            if count > 0 {
                info!("   {}: {}", error_type.as_str(), count);
            }
        }
    }

    let total_misses = stats.total_misses();
    if total_misses > 0 {
        info!("Empty Record Families ({} total):", total_misses);
        for family in RecordFamily::iter() {
            let count = stats.get_miss_count(family);
            if count > 0 {
                info!("   {}: {}", family.as_str(), count);
            }
        }
    }
}
