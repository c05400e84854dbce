//! Configuration constants.
//!
//! This module defines the defaults used throughout the collector: resolver
//! addresses, timeouts, concurrency limits and feature sentinels.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

/// Public recursive resolvers used for authority discovery and as the
/// fallback resolver set when no authoritative server answers.
pub const DEFAULT_RESOLVERS: [IpAddr; 2] = [
    IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)),
    IpAddr::V4(Ipv4Addr::new(1, 1, 1, 1)),
];

/// Standard DNS port; authoritative candidates are always contacted here.
pub const DNS_PORT: u16 = 53;

/// DNS query timeout in seconds (per query, per server)
pub const DNS_TIMEOUT_SECS: u64 = 10;

/// Largest UDP response we accept. EDNS is not negotiated, so 512 would do,
/// but some servers ignore that and send more.
pub const MAX_UDP_RESPONSE_SIZE: usize = 4096;

/// Maximum concurrent resolution passes (semaphore limit)
/// Mirrors the 22-thread crawler pool the collector has always run with.
pub const SEMAPHORE_LIMIT: usize = 22;

/// Log a progress line every N completed hostnames.
pub const LOGGING_INTERVAL: usize = 25;

/// Upper bound for one whole pass (discovery, harvest and reverse lookups).
/// A pass issues a few dozen queries at most, each bounded by the DNS timeout.
pub const TASK_TIMEOUT: Duration = Duration::from_secs(180);

/// Sentinel for an absent string value (raw responses, labels).
pub const EMPTY_RESPONSE: &str = "None";

/// Sentinel for an unknown or not applicable numeric feature.
pub const UNKNOWN_FEATURE: i64 = -1;

/// JSON Lines file name of the raw record bags.
pub const BAGS_FILE_NAME: &str = "dns_raw.jsonl";
/// CSV file name of the feature vectors.
pub const FEATURES_FILE_NAME: &str = "dns_features.csv";
