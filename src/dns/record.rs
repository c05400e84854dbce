//! Resource record model and the per-target raw record bag.
//!
//! `RawDnsBag` is the storage contract: its serde field names are the keys the
//! storage collaborator persists.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum_macros::EnumIter;

use crate::config::EMPTY_RESPONSE;

/// One DNS answer entry.
///
/// Which side is populated depends on the family: an A record carries `ip`, an
/// NS record carries `addr` (the server name), NS-A/NS-AAAA and PTR entries
/// carry both. Absent sides serialize as `""`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// Owner or name side (server name, PTR target).
    #[serde(
        default,
        serialize_with = "empty_if_none",
        deserialize_with = "none_if_empty"
    )]
    pub addr: Option<String>,
    /// Data side (IPv4/IPv6 address).
    #[serde(
        default,
        serialize_with = "empty_if_none",
        deserialize_with = "none_if_empty"
    )]
    pub ip: Option<String>,
    /// Time to live in seconds.
    pub ttl: u32,
}

impl ResourceRecord {
    /// Record carrying only an address (A, AAAA).
    pub fn with_ip(ip: impl Into<String>, ttl: u32) -> Self {
        Self {
            addr: None,
            ip: Some(ip.into()),
            ttl,
        }
    }

    /// Record carrying only a name (NS).
    pub fn with_addr(addr: impl Into<String>, ttl: u32) -> Self {
        Self {
            addr: Some(addr.into()),
            ip: None,
            ttl,
        }
    }

    /// Record carrying both a name and an address (NS-A, NS-AAAA, PTR).
    pub fn with_addr_and_ip(addr: impl Into<String>, ip: impl Into<String>, ttl: u32) -> Self {
        Self {
            addr: Some(addr.into()),
            ip: Some(ip.into()),
            ttl,
        }
    }
}

fn empty_if_none<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.as_deref().unwrap_or(""))
}

fn none_if_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// The six record families a pass collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum RecordFamily {
    /// IPv4 addresses of the target
    A,
    /// IPv6 addresses of the target
    Aaaa,
    /// Name servers of the target
    Ns,
    /// IPv4 addresses of the name servers
    NsA,
    /// IPv6 addresses of the name servers
    NsAaaa,
    /// Reverse names of the target's IPv4 addresses
    Ptr,
}

impl RecordFamily {
    /// Short display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordFamily::A => "A",
            RecordFamily::Aaaa => "AAAA",
            RecordFamily::Ns => "NS",
            RecordFamily::NsA => "NS-A",
            RecordFamily::NsAaaa => "NS-AAAA",
            RecordFamily::Ptr => "PTR",
        }
    }
}

impl std::fmt::Display for RecordFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything one resolution pass collected for a target.
///
/// Built once by the engine and handed to the caller; the engine keeps no
/// reference to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDnsBag {
    /// Text of the A query response, or `"None"` when the A query failed.
    pub dns_record_raw: String,
    /// A answers as `{ip, ttl}`.
    #[serde(rename = "a_record_parsed")]
    pub a_records: Vec<ResourceRecord>,
    /// AAAA answers as `{ip, ttl}`.
    #[serde(rename = "aaaa_record_parsed")]
    pub aaaa_records: Vec<ResourceRecord>,
    /// Name servers as `{addr, ttl}`.
    #[serde(rename = "ns_record_parsed")]
    pub ns_records: Vec<ResourceRecord>,
    /// Name server IPv4 addresses as `{addr, ip, ttl}`.
    #[serde(rename = "nsa_record_parsed")]
    pub nsa_records: Vec<ResourceRecord>,
    /// Name server IPv6 addresses as `{addr, ip, ttl}`.
    #[serde(rename = "nsaaaa_record_parsed")]
    pub nsaaaa_records: Vec<ResourceRecord>,
    /// Text of the first successful PTR response, or `"None"`.
    pub ptr_record_raw: String,
    /// PTR answers as `{addr, ip, ttl}`.
    #[serde(rename = "ptr_records_parsed")]
    pub ptr_records: Vec<ResourceRecord>,
}

impl Default for RawDnsBag {
    fn default() -> Self {
        Self::new()
    }
}

impl RawDnsBag {
    /// An empty bag with absent raw responses.
    pub fn new() -> Self {
        Self {
            dns_record_raw: EMPTY_RESPONSE.to_string(),
            a_records: Vec::new(),
            aaaa_records: Vec::new(),
            ns_records: Vec::new(),
            nsa_records: Vec::new(),
            nsaaaa_records: Vec::new(),
            ptr_record_raw: EMPTY_RESPONSE.to_string(),
            ptr_records: Vec::new(),
        }
    }

    /// The record sequence of one family.
    pub fn records(&self, family: RecordFamily) -> &[ResourceRecord] {
        match family {
            RecordFamily::A => &self.a_records,
            RecordFamily::Aaaa => &self.aaaa_records,
            RecordFamily::Ns => &self.ns_records,
            RecordFamily::NsA => &self.nsa_records,
            RecordFamily::NsAaaa => &self.nsaaaa_records,
            RecordFamily::Ptr => &self.ptr_records,
        }
    }

    /// Distinct name server names in first-seen order, compared without case
    /// or trailing root dot.
    pub fn name_servers(&self) -> Vec<&str> {
        let mut seen: Vec<String> = Vec::new();
        let mut names = Vec::new();
        for name in self.ns_records.iter().filter_map(|r| r.addr.as_deref()) {
            let key = canonical_name(name);
            if key.is_empty() || seen.contains(&key) {
                continue;
            }
            seen.push(key);
            names.push(name);
        }
        names
    }
}

/// Lowercase name without the trailing root dot.
pub fn canonical_name(name: &str) -> String {
    name.trim().trim_end_matches('.').to_ascii_lowercase()
}
