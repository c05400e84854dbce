//! Authoritative name server discovery.
//!
//! Resolves the target's NS set through the default resolvers and then the A
//! records of each server. The result only decides which servers the harvester
//! asks first; an empty set is a normal outcome.

use std::net::Ipv4Addr;

use hickory_resolver::proto::rr::{RData, RecordType};
use log::{debug, info};

use super::exchange::DnsExchange;
use crate::error_handling::QueryError;

/// IPv4 addresses of a target's authoritative servers, first-seen order,
/// without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorityCandidateSet {
    addrs: Vec<Ipv4Addr>,
}

impl AuthorityCandidateSet {
    /// Adds an address unless it is already present.
    pub fn insert(&mut self, addr: Ipv4Addr) {
        if !self.addrs.contains(&addr) {
            self.addrs.push(addr);
        }
    }

    /// Whether discovery found nothing.
    pub fn is_empty(&self) -> bool {
        self.addrs.is_empty()
    }

    /// Number of distinct addresses.
    pub fn len(&self) -> usize {
        self.addrs.len()
    }

    /// Addresses in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = Ipv4Addr> + '_ {
        self.addrs.iter().copied()
    }
}

impl FromIterator<Ipv4Addr> for AuthorityCandidateSet {
    fn from_iter<I: IntoIterator<Item = Ipv4Addr>>(iter: I) -> Self {
        let mut set = AuthorityCandidateSet::default();
        for addr in iter {
            set.insert(addr);
        }
        set
    }
}

/// Finds the authoritative servers of `hostname`.
///
/// Never fails: any error along the way (no NS, an NS without A records,
/// unreachable resolvers) is logged and produces an empty set, which makes the
/// harvester use the default resolvers.
pub async fn discover_authorities(
    exchange: &dyn DnsExchange,
    hostname: &str,
) -> AuthorityCandidateSet {
    match try_discover(exchange, hostname).await {
        Ok(candidates) => {
            debug!(
                "Found {} authoritative server address(es) for {hostname}",
                candidates.len()
            );
            candidates
        }
        Err(e) => {
            info!("Cannot find authoritative DNS resolver for {hostname}: {e}");
            AuthorityCandidateSet::default()
        }
    }
}

async fn try_discover(
    exchange: &dyn DnsExchange,
    hostname: &str,
) -> Result<AuthorityCandidateSet, QueryError> {
    let response = exchange.query(hostname, RecordType::NS).await?;
    let ns_names: Vec<String> = response
        .answers()
        .iter()
        .filter_map(|record| match record.data() {
            RData::NS(ns) => Some(ns.0.to_utf8()),
            _ => None,
        })
        .collect();

    if ns_names.is_empty() {
        return Err(QueryError::NoAnswer {
            name: hostname.to_string(),
            record_type: RecordType::NS.to_string(),
        });
    }

    let mut candidates = AuthorityCandidateSet::default();
    for ns_name in &ns_names {
        let response = exchange.query(ns_name, RecordType::A).await?;
        let addrs: Vec<Ipv4Addr> = response
            .answers()
            .iter()
            .filter_map(|record| match record.data() {
                RData::A(a) => Some(a.0),
                _ => None,
            })
            .collect();
        if addrs.is_empty() {
            return Err(QueryError::NoAnswer {
                name: ns_name.clone(),
                record_type: RecordType::A.to_string(),
            });
        }
        for addr in addrs {
            candidates.insert(addr);
        }
    }
    Ok(candidates)
}
