//! DNS feature reduction.
//!
//! [`reduce`] folds a [`RawDnsBag`] into the fixed feature vector the
//! classifier consumes. It is a pure function: the same bag always gives the
//! same vector, and every feature has a value even when the bag is empty.

mod similarity;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::config::UNKNOWN_FEATURE;
use crate::dns::{canonical_name, RawDnsBag, ResourceRecord};

pub use similarity::sequence_ratio;

/// Version of the feature layout below. Bumped whenever a feature is added,
/// removed, renamed or changes meaning.
pub const FEATURE_SCHEMA_VERSION: u32 = 1;

/// Feature names in column order.
pub const DNS_FEATURE_NAMES: [&str; 15] = [
    "exist_ptr_record",
    "ip_to_nameserver_ratio",
    "max_dns_a_ttl",
    "max_dns_aaaa_ttl",
    "max_dns_ns_ttl",
    "max_dns_nsa_ttl",
    "max_dns_nsaaaa_ttl",
    "num_unique_a_records",
    "num_unique_a_records_for_ns",
    "num_unique_aaaa_records",
    "num_unique_aaaa_records_for_ns",
    "num_unique_ns_records",
    "reverse_dns_look_up_matching",
    "whether_aaaa_record_exist_for_domain",
    "whether_aaaa_record_exist_for_name_servers",
];

/// A single feature value: a number, or a fixed-precision decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FeatureValue {
    /// Count, TTL, flag or sentinel
    Int(i64),
    /// Fixed-precision decimal
    Text(String),
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Int(v) => write!(f, "{v}"),
            FeatureValue::Text(v) => f.write_str(v),
        }
    }
}

/// The DNS feature vector of one hostname.
///
/// Numeric fields use `-1` for "not applicable" and `0`/`1` for flags. The
/// ratio and similarity fields are 3-decimal strings, or `"-1"` when they
/// cannot be computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DnsFeatures {
    /// 1 when any PTR name was found
    pub exist_ptr_record: i64,
    /// Distinct A addresses per distinct name server
    pub ip_to_nameserver_ratio: String,
    /// Largest A TTL
    pub max_dns_a_ttl: i64,
    /// Largest AAAA TTL
    pub max_dns_aaaa_ttl: i64,
    /// Largest NS TTL
    pub max_dns_ns_ttl: i64,
    /// Largest TTL of the name servers' A records
    pub max_dns_nsa_ttl: i64,
    /// Largest TTL of the name servers' AAAA records
    pub max_dns_nsaaaa_ttl: i64,
    /// Distinct A addresses
    pub num_unique_a_records: i64,
    /// Distinct IPv4 addresses over all name servers
    pub num_unique_a_records_for_ns: i64,
    /// Distinct AAAA addresses
    pub num_unique_aaaa_records: i64,
    /// Distinct IPv6 addresses over all name servers
    pub num_unique_aaaa_records_for_ns: i64,
    /// Distinct name server names
    pub num_unique_ns_records: i64,
    /// Best similarity between the hostname and a PTR name
    pub reverse_dns_look_up_matching: String,
    /// 1 when the hostname has AAAA records
    pub whether_aaaa_record_exist_for_domain: i64,
    /// 1 when any name server has AAAA records
    pub whether_aaaa_record_exist_for_name_servers: i64,
}

impl DnsFeatures {
    /// `(name, value)` pairs in [`DNS_FEATURE_NAMES`] order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, FeatureValue)> {
        let values = [
            FeatureValue::Int(self.exist_ptr_record),
            FeatureValue::Text(self.ip_to_nameserver_ratio.clone()),
            FeatureValue::Int(self.max_dns_a_ttl),
            FeatureValue::Int(self.max_dns_aaaa_ttl),
            FeatureValue::Int(self.max_dns_ns_ttl),
            FeatureValue::Int(self.max_dns_nsa_ttl),
            FeatureValue::Int(self.max_dns_nsaaaa_ttl),
            FeatureValue::Int(self.num_unique_a_records),
            FeatureValue::Int(self.num_unique_a_records_for_ns),
            FeatureValue::Int(self.num_unique_aaaa_records),
            FeatureValue::Int(self.num_unique_aaaa_records_for_ns),
            FeatureValue::Int(self.num_unique_ns_records),
            FeatureValue::Text(self.reverse_dns_look_up_matching.clone()),
            FeatureValue::Int(self.whether_aaaa_record_exist_for_domain),
            FeatureValue::Int(self.whether_aaaa_record_exist_for_name_servers),
        ];
        DNS_FEATURE_NAMES.into_iter().zip(values)
    }

    /// Features keyed by name.
    pub fn to_map(&self) -> BTreeMap<&'static str, FeatureValue> {
        self.iter().collect()
    }
}

/// Reduces a record bag to its feature vector.
pub fn reduce(hostname: &str, bag: &RawDnsBag) -> DnsFeatures {
    let distinct_a_ips = count_distinct(bag.a_records.iter().filter_map(|r| r.ip.as_deref()));
    let distinct_ns = count_distinct(
        bag.ns_records
            .iter()
            .filter_map(|r| r.addr.as_deref())
            .map(canonical_name)
            .filter(|name| !name.is_empty()),
    );

    let ip_to_nameserver_ratio = if distinct_ns == 0 {
        UNKNOWN_FEATURE.to_string()
    } else {
        format!("{:.3}", distinct_a_ips as f64 / distinct_ns as f64)
    };

    let num_unique_aaaa_records =
        count_distinct(bag.aaaa_records.iter().filter_map(|r| r.ip.as_deref()));
    let num_unique_aaaa_records_for_ns =
        count_distinct(bag.nsaaaa_records.iter().filter_map(|r| r.ip.as_deref()));

    DnsFeatures {
        exist_ptr_record: flag(!bag.ptr_records.is_empty()),
        ip_to_nameserver_ratio,
        max_dns_a_ttl: max_ttl(&bag.a_records),
        max_dns_aaaa_ttl: max_ttl(&bag.aaaa_records),
        max_dns_ns_ttl: max_ttl(&bag.ns_records),
        max_dns_nsa_ttl: max_ttl(&bag.nsa_records),
        max_dns_nsaaaa_ttl: max_ttl(&bag.nsaaaa_records),
        num_unique_a_records: distinct_a_ips as i64,
        num_unique_a_records_for_ns: count_distinct(
            bag.nsa_records.iter().filter_map(|r| r.ip.as_deref()),
        ) as i64,
        num_unique_aaaa_records: num_unique_aaaa_records as i64,
        num_unique_aaaa_records_for_ns: num_unique_aaaa_records_for_ns as i64,
        num_unique_ns_records: distinct_ns as i64,
        reverse_dns_look_up_matching: reverse_similarity(hostname, &bag.ptr_records),
        whether_aaaa_record_exist_for_domain: flag(num_unique_aaaa_records > 0),
        whether_aaaa_record_exist_for_name_servers: flag(num_unique_aaaa_records_for_ns > 0),
    }
}

/// Best similarity between `hostname` and any PTR name, or `"-1"` without PTR names.
fn reverse_similarity(hostname: &str, ptr_records: &[ResourceRecord]) -> String {
    let target = canonical_name(hostname);
    ptr_records
        .iter()
        .filter_map(|r| r.addr.as_deref())
        .map(|name| sequence_ratio(&target, &canonical_name(name)))
        .fold(None, |best: Option<f64>, score| {
            Some(best.map_or(score, |b| b.max(score)))
        })
        .map_or_else(|| UNKNOWN_FEATURE.to_string(), |best| format!("{best:.3}"))
}

fn max_ttl(records: &[ResourceRecord]) -> i64 {
    records
        .iter()
        .map(|r| i64::from(r.ttl))
        .max()
        .unwrap_or(UNKNOWN_FEATURE)
}

fn count_distinct<I, T>(values: I) -> usize
where
    I: Iterator<Item = T>,
    T: Ord,
{
    values.collect::<std::collections::BTreeSet<_>>().len()
}

fn flag(value: bool) -> i64 {
    i64::from(value)
}
