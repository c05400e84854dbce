//! Error type definitions.
//!
//! This module defines the error types used throughout the collector, plus the
//! enums used as counter keys in `ProcessingStats`.

use std::net::SocketAddr;
use std::time::Duration;

use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Invalid engine configuration.
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),
}

/// Invalid process-wide configuration. Fatal at construction, never per query.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No default resolver was configured.
    #[error("at least one default resolver is required")]
    EmptyResolvers,

    /// The per-query timeout was zero.
    #[error("DNS query timeout must be greater than zero")]
    ZeroTimeout,

    /// The worker pool would never start a task.
    #[error("max concurrency must be greater than zero")]
    ZeroConcurrency,
}

/// Failure of a single DNS exchange.
///
/// These never leave the engine: the harvester turns them into empty record
/// families and a log line.
#[derive(Error, Debug)]
pub enum QueryError {
    /// The query name could not be turned into a DNS name.
    #[error("invalid query name {name}: {reason}")]
    InvalidName {
        /// Name as given by the caller
        name: String,
        /// Parser message
        reason: String,
    },

    /// The request message could not be encoded.
    #[error("failed to encode DNS query: {0}")]
    Encode(String),

    /// Socket level failure (bind, connect, send, receive).
    #[error("DNS socket error: {0}")]
    Io(#[from] std::io::Error),

    /// The server did not answer within the configured timeout.
    #[error("DNS query to {server} timed out after {timeout:?}")]
    Timeout {
        /// Server that was queried
        server: SocketAddr,
        /// Configured per-query timeout
        timeout: Duration,
    },

    /// The server answered with bytes that do not parse as a DNS message.
    #[error("malformed DNS response from {server}: {reason}")]
    Malformed {
        /// Server that answered
        server: SocketAddr,
        /// Parser message
        reason: String,
    },

    /// The name does not exist (NXDOMAIN).
    #[error("{name} does not exist")]
    NxDomain {
        /// Queried name
        name: String,
    },

    /// The answer section held no record of the requested type.
    #[error("no {record_type} records for {name}")]
    NoAnswer {
        /// Queried name
        name: String,
        /// Requested record type
        record_type: String,
    },

    /// The server answered with a failure response code (SERVFAIL, REFUSED, ...).
    #[error("{server} answered {code}")]
    ResponseCode {
        /// Server that answered
        server: SocketAddr,
        /// Response code as text
        code: String,
    },

    /// The exchange has no servers to talk to.
    #[error("no name servers configured")]
    NoServers,
}

impl QueryError {
    /// Whether this is an expected miss (no such name, slow server) rather
    /// than a sign of a broken resolver path.
    pub fn is_soft_miss(&self) -> bool {
        matches!(
            self,
            QueryError::NxDomain { .. } | QueryError::NoAnswer { .. } | QueryError::Timeout { .. }
        )
    }
}

/// Errors returned by the engine entry points and target parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The resolution target was empty.
    #[error("resolution target must not be empty")]
    EmptyHostname,

    /// An input line did not contain a usable domain name.
    #[error("not a valid hostname: {0}")]
    InvalidHostname(String),
}

/// Types of task-level failures in a collection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    /// Input line did not yield a hostname
    InvalidHostname,
    /// Whole pass exceeded the task timeout
    TaskTimeout,
    /// Worker task panicked or was cancelled
    TaskAborted,
    /// Result could not be written to the output files
    OutputWriteError,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    /// Returns a human-readable string representation of the error type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::InvalidHostname => "Invalid hostname",
            ErrorType::TaskTimeout => "Resolution pass timeout",
            ErrorType::TaskAborted => "Resolution task aborted",
            ErrorType::OutputWriteError => "Output write error",
        }
    }
}

impl From<&EngineError> for ErrorType {
    fn from(error: &EngineError) -> Self {
        match error {
            EngineError::EmptyHostname | EngineError::InvalidHostname(_) => {
                ErrorType::InvalidHostname
            }
        }
    }
}
