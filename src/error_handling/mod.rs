//! Error handling and processing statistics.
//!
//! This module provides:
//! - Error type definitions (initialization, configuration, query, engine)
//! - Processing statistics tracking (task errors, per-family misses)
//!
//! Only configuration and initialization errors ever reach the caller of the
//! engine; query errors are absorbed into empty record families.

mod stats;
mod types;

// Re-export public API
pub use stats::ProcessingStats;
pub use types::{ConfigError, EngineError, ErrorType, InitializationError, QueryError};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::{RawDnsBag, RecordFamily, ResourceRecord};
    use strum::IntoEnumIterator;

    #[test]
    fn test_processing_stats_initialization() {
        let stats = ProcessingStats::new();
        for error_type in ErrorType::iter() {
            assert_eq!(stats.get_error_count(error_type), 0);
        }
        for family in RecordFamily::iter() {
            assert_eq!(stats.get_miss_count(family), 0);
        }
    }

    #[test]
    fn test_processing_stats_multiple_increments() {
        let stats = ProcessingStats::new();
        stats.increment_error(ErrorType::TaskTimeout);
        stats.increment_error(ErrorType::TaskTimeout);
        stats.increment_error(ErrorType::InvalidHostname);
        assert_eq!(stats.get_error_count(ErrorType::TaskTimeout), 2);
        assert_eq!(stats.total_errors(), 3);
    }

    #[test]
    fn test_record_bag_counts_only_empty_families() {
        let stats = ProcessingStats::new();
        let mut bag = RawDnsBag::new();
        bag.a_records.push(ResourceRecord::with_ip("1.1.1.1", 60));

        stats.record_bag(&bag);

        assert_eq!(stats.get_miss_count(RecordFamily::A), 0);
        assert_eq!(stats.get_miss_count(RecordFamily::Aaaa), 1);
        assert_eq!(stats.get_miss_count(RecordFamily::Ptr), 1);
    }
}
