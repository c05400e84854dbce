//! Per-hostname task processing.

use log::warn;

use crate::app::Target;
use crate::config::TASK_TIMEOUT;
use crate::dns::{DnsAnalysis, DnsEngine, EngineConfig};
use crate::error_handling::ErrorType;

/// Result of one spawned pass.
#[derive(Debug)]
pub struct TaskOutcome {
    /// Input the task was spawned for
    pub target: Target,
    /// Analysis, or the kind of failure to count
    pub result: Result<DnsAnalysis, ErrorType>,
}

/// Resolves and reduces one target.
///
/// Builds its own engine from `engine_config`, so no socket or resolver state
/// is shared with other tasks. The whole pass is bounded by [`TASK_TIMEOUT`].
pub async fn resolve_target(engine_config: EngineConfig, target: Target) -> TaskOutcome {
    let engine = DnsEngine::new(&engine_config);
    let result = match tokio::time::timeout(TASK_TIMEOUT, engine.analyze(&target.hostname)).await
    {
        Ok(Ok(analysis)) => Ok(analysis),
        // Lines are normalized before spawning, so this only sees targets
        // built by hand
        Ok(Err(e)) => {
            warn!("Skipping {}: {e}", target.hostname);
            Err(ErrorType::from(&e))
        }
        Err(_) => {
            warn!(
                "Timeout resolving {} after {} seconds",
                target.hostname,
                TASK_TIMEOUT.as_secs()
            );
            Err(ErrorType::TaskTimeout)
        }
    };
    TaskOutcome { target, result }
}
