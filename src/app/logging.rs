//! Progress logging utilities.

use log::info;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Logs how many hostnames have been resolved so far and the rate.
///
/// # Arguments
///
/// * `start_time` - When the run started
/// * `completed` - Hostnames that produced a bag
/// * `failed` - Hostnames whose pass timed out or aborted
pub fn log_progress(start_time: std::time::Instant, completed: &AtomicUsize, failed: &AtomicUsize) {
    let completed = completed.load(Ordering::SeqCst);
    let failed = failed.load(Ordering::SeqCst);
    let elapsed_secs = start_time.elapsed().as_secs_f64();
    let rate = if elapsed_secs > 0.0 {
        (completed + failed) as f64 / elapsed_secs
    } else {
        0.0
    };
    info!(
        "Resolved {} hostnames ({} failed) in {:.2} seconds (~{:.2} hostnames/sec)",
        completed, failed, elapsed_secs, rate
    );
}
