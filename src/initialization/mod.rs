//! Application initialization and resource setup.
//!
//! This module provides functions to initialize the shared pieces of a run:
//! - Logger (plain or JSON)
//! - Validated resolver configuration
//! - Concurrency semaphore
//!
//! All initialization functions return proper error types for error handling.

mod logger;
mod resolver;

use std::sync::Arc;

use tokio::sync::Semaphore;

// Re-export public API
pub use logger::init_logger_with;
pub use resolver::init_engine_config;

/// Initializes a semaphore for controlling concurrency.
///
/// Creates a new semaphore with the specified permit count. This semaphore is used
/// to limit the number of hostnames resolved at the same time.
///
/// # Arguments
///
/// * `count` - Maximum number of concurrent passes allowed
///
/// # Returns
///
/// An `Arc<Semaphore>` that can be shared across multiple tasks.
pub fn init_semaphore(count: usize) -> Arc<Semaphore> {
    Arc::new(Semaphore::new(count))
}
