//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::{DEFAULT_RESOLVERS, DNS_TIMEOUT_SECS, SEMAPHORE_LIMIT};
use crate::dns::EngineConfig;
use crate::error_handling::ConfigError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Collector configuration.
///
/// Parsed from the command line by the binary, or constructed directly by
/// library users:
///
/// ```no_run
/// use domain_signals::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     file: PathBuf::from("hostnames.txt"),
///     max_concurrency: 8,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "domain_signals",
    about = "Collects DNS records for domains and reduces them to classifier features"
)]
pub struct Config {
    /// File with one hostname or URL per line, optionally followed by `,label`
    pub file: PathBuf,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Directory receiving the raw record bags (JSONL) and features (CSV)
    #[arg(long, default_value = "./domain_signals_out")]
    pub output_dir: PathBuf,

    /// Maximum hostnames resolved concurrently
    #[arg(long, default_value_t = SEMAPHORE_LIMIT)]
    pub max_concurrency: usize,

    /// Per-query DNS timeout in seconds
    #[arg(long, default_value_t = DNS_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// Default recursive resolvers (repeat or comma-separate)
    #[arg(long = "resolver", value_delimiter = ',', default_values_t = DEFAULT_RESOLVERS)]
    pub resolvers: Vec<IpAddr>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: PathBuf::from("hostnames.txt"),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            output_dir: PathBuf::from("./domain_signals_out"),
            max_concurrency: SEMAPHORE_LIMIT,
            timeout_seconds: DNS_TIMEOUT_SECS,
            resolvers: DEFAULT_RESOLVERS.to_vec(),
        }
    }
}

impl Config {
    /// Builds the validated, immutable engine configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the resolver list is empty, the timeout is zero
    /// or the concurrency limit is zero.
    pub fn engine_config(&self) -> Result<EngineConfig, ConfigError> {
        if self.max_concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        EngineConfig::new(
            self.resolvers.clone(),
            Duration::from_secs(self.timeout_seconds),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_concurrency, 22);
        assert_eq!(config.timeout_seconds, 10);
        assert_eq!(config.resolvers, DEFAULT_RESOLVERS.to_vec());
        assert_eq!(config.output_dir, PathBuf::from("./domain_signals_out"));
    }

    #[test]
    fn test_engine_config_from_default() {
        let engine = Config::default().engine_config().unwrap();
        assert_eq!(engine.timeout(), Duration::from_secs(10));
        assert_eq!(engine.resolvers().len(), 2);
        assert_eq!(engine.resolvers()[0].port(), 53);
    }

    #[test]
    fn test_engine_config_rejects_empty_resolvers() {
        let config = Config {
            resolvers: Vec::new(),
            ..Default::default()
        };
        assert!(matches!(
            config.engine_config(),
            Err(ConfigError::EmptyResolvers)
        ));
    }

    #[test]
    fn test_engine_config_rejects_zero_timeout() {
        let config = Config {
            timeout_seconds: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.engine_config(),
            Err(ConfigError::ZeroTimeout)
        ));
    }

    #[test]
    fn test_engine_config_rejects_zero_concurrency() {
        let config = Config {
            max_concurrency: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.engine_config(),
            Err(ConfigError::ZeroConcurrency)
        ));
    }

    #[test]
    fn test_parse_resolver_list() {
        let config = Config::try_parse_from([
            "domain_signals",
            "hosts.txt",
            "--resolver",
            "9.9.9.9,149.112.112.112",
        ])
        .unwrap();
        assert_eq!(config.resolvers.len(), 2);
        assert_eq!(config.resolvers[0].to_string(), "9.9.9.9");
    }
}
