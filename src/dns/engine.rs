//! The resolution pass: discover, harvest, correlate.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use log::debug;
use serde::Serialize;

use super::authority::discover_authorities;
use super::exchange::{DnsExchange, UdpExchange};
use super::harvest::harvest_records;
use super::record::RawDnsBag;
use super::reverse::correlate_reverse;
use crate::config::{DEFAULT_RESOLVERS, DNS_PORT, DNS_TIMEOUT_SECS};
use crate::error_handling::{ConfigError, EngineError};
use crate::features::{reduce, DnsFeatures};

/// Default resolvers and per-query timeout, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    resolvers: Vec<SocketAddr>,
    timeout: Duration,
}

impl EngineConfig {
    /// Validates the resolver list and timeout.
    ///
    /// # Errors
    ///
    /// `ConfigError::EmptyResolvers` when `resolvers` is empty and
    /// `ConfigError::ZeroTimeout` when `timeout` is zero.
    pub fn new(resolvers: Vec<IpAddr>, timeout: Duration) -> Result<Self, ConfigError> {
        if resolvers.is_empty() {
            return Err(ConfigError::EmptyResolvers);
        }
        if timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(Self {
            resolvers: resolvers
                .into_iter()
                .map(|ip| SocketAddr::new(ip, DNS_PORT))
                .collect(),
            timeout,
        })
    }

    /// Default resolvers, each on port 53.
    pub fn resolvers(&self) -> &[SocketAddr] {
        &self.resolvers
    }

    /// Per-query timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            resolvers: DEFAULT_RESOLVERS
                .iter()
                .map(|ip| SocketAddr::new(*ip, DNS_PORT))
                .collect(),
            timeout: Duration::from_secs(DNS_TIMEOUT_SECS),
        }
    }
}

/// Raw records and features of one target.
#[derive(Debug, Clone, Serialize)]
pub struct DnsAnalysis {
    /// Trimmed target name
    pub hostname: String,
    /// Records collected by the pass
    pub bag: RawDnsBag,
    /// Reduction of `bag`
    pub features: DnsFeatures,
}

/// Runs resolution passes against a [`DnsExchange`].
///
/// Holds no per-target state: every call to [`DnsEngine::resolve`] builds a
/// fresh bag and the discoverer's candidates live only for that call.
pub struct DnsEngine<X: DnsExchange = UdpExchange> {
    exchange: X,
}

impl DnsEngine<UdpExchange> {
    /// Engine talking UDP to the configured default resolvers.
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_exchange(UdpExchange::new(
            config.resolvers().to_vec(),
            config.timeout(),
        ))
    }
}

impl<X: DnsExchange> DnsEngine<X> {
    /// Engine over any exchange, e.g. a scripted one in tests.
    pub fn with_exchange(exchange: X) -> Self {
        Self { exchange }
    }

    /// Collects the raw record bag of `hostname`.
    ///
    /// Network failures never surface here; they show up as empty families.
    ///
    /// # Errors
    ///
    /// `EngineError::EmptyHostname` when `hostname` is empty or blank.
    pub async fn resolve(&self, hostname: &str) -> Result<RawDnsBag, EngineError> {
        let hostname = hostname.trim();
        if hostname.is_empty() {
            return Err(EngineError::EmptyHostname);
        }

        let candidates = discover_authorities(&self.exchange, hostname).await;
        let preferred;
        let working: &dyn DnsExchange = if candidates.is_empty() {
            debug!("Harvesting {hostname} through the default resolvers");
            &self.exchange
        } else {
            debug!(
                "Harvesting {hostname} through {} authoritative server(s)",
                candidates.len()
            );
            preferred = self.exchange.prefer(&candidates);
            preferred.as_ref()
        };

        let (mut bag, ips) = harvest_records(working, hostname).await;
        correlate_reverse(working, hostname, &ips, &mut bag).await;
        Ok(bag)
    }

    /// Resolves `hostname` and reduces the bag to its feature vector.
    ///
    /// # Errors
    ///
    /// Same as [`DnsEngine::resolve`].
    pub async fn analyze(&self, hostname: &str) -> Result<DnsAnalysis, EngineError> {
        let bag = self.resolve(hostname).await?;
        let hostname = hostname.trim().to_string();
        let features = reduce(&hostname, &bag);
        Ok(DnsAnalysis {
            hostname,
            bag,
            features,
        })
    }
}
