//! domain_signals library: DNS signal collection for domain classification
//!
//! For each hostname the engine discovers the authoritative name servers,
//! harvests A, AAAA, NS, NS-A and NS-AAAA records (asking the authoritative
//! servers first), looks up PTR names for the A addresses, and reduces the
//! collected records to a fixed feature vector.
//!
//! # Example
//!
//! ```no_run
//! use domain_signals::{DnsEngine, EngineConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = DnsEngine::new(&EngineConfig::default());
//! let analysis = engine.analyze("example.com").await?;
//! println!("{} A records, PTR match {}",
//!          analysis.features.num_unique_a_records,
//!          analysis.features.reverse_dns_look_up_matching);
//! # Ok(())
//! # }
//! ```
//!
//! Batch runs over a file of hostnames go through [`run_collection`].
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

mod app;
/// Constants and command-line configuration.
pub mod config;
/// DNS collection for one target.
pub mod dns;
mod error_handling;
/// Output files of a collection run.
pub mod export;
/// Feature reduction of record bags.
pub mod features;
/// Logger, resolver configuration and semaphore setup.
pub mod initialization;
mod run;

// Re-export public API
pub use app::{normalize_hostname, parse_target_line, Target};
pub use config::{Config, LogFormat, LogLevel};
pub use dns::{DnsAnalysis, DnsEngine, DnsExchange, EngineConfig, RawDnsBag, ResourceRecord};
pub use error_handling::{ConfigError, EngineError, InitializationError, QueryError};
pub use features::{reduce, DnsFeatures, FeatureValue, DNS_FEATURE_NAMES, FEATURE_SCHEMA_VERSION};
pub use run::{run_collection, RunReport};
