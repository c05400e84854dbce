//! DNS collection for one target.
//!
//! A pass runs four stages in order:
//! - authority discovery (NS, then A of each name server, via the default resolvers)
//! - record harvesting (A, AAAA, NS, NS-A, NS-AAAA), preferring the authoritative servers
//! - reverse correlation (PTR of every IPv4 from the A step)
//! - feature reduction (in [`crate::features`])
//!
//! Every query goes through the [`DnsExchange`] seam, so passes can be driven
//! by scripted responses in tests.

mod authority;
mod engine;
mod exchange;
mod harvest;
mod record;
mod reverse;

// Re-export public API
pub use authority::{discover_authorities, AuthorityCandidateSet};
pub use engine::{DnsAnalysis, DnsEngine, EngineConfig};
pub use exchange::{build_query, render_message, reverse_name, DnsExchange, UdpExchange};
pub use harvest::harvest_records;
pub use record::{canonical_name, RawDnsBag, RecordFamily, ResourceRecord};
pub use reverse::correlate_reverse;
