//! Resolver configuration for collection runs.

use log::info;

use crate::config::Config;
use crate::dns::EngineConfig;
use crate::error_handling::InitializationError;

/// Validates the resolver settings of `config` once, before any task starts.
///
/// Every pass of the run builds its own engine (and so its own sockets) from
/// the returned configuration; nothing else is shared between passes.
///
/// # Errors
///
/// Returns `InitializationError::ConfigError` for an empty resolver list, a
/// zero timeout or a zero concurrency limit.
pub fn init_engine_config(config: &Config) -> Result<EngineConfig, InitializationError> {
    let engine_config = config.engine_config()?;
    info!(
        "Using default resolvers {} with a {}s query timeout",
        engine_config
            .resolvers()
            .iter()
            .map(|s| s.ip().to_string())
            .collect::<Vec<_>>()
            .join(", "),
        engine_config.timeout().as_secs()
    );
    Ok(engine_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_engine_config_default() {
        let engine_config = init_engine_config(&Config::default()).unwrap();
        assert_eq!(engine_config, EngineConfig::default());
    }

    #[test]
    fn test_init_engine_config_rejects_empty_resolvers() {
        let config = Config {
            resolvers: Vec::new(),
            ..Default::default()
        };
        assert!(matches!(
            init_engine_config(&config),
            Err(InitializationError::ConfigError(_))
        ));
    }
}
