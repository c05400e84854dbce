//! Record harvesting: the five record families of one target.
//!
//! Each step runs on its own. A failed step leaves its family empty and the
//! next step runs anyway, so the bag always comes back complete in shape.

use std::net::Ipv4Addr;

use hickory_resolver::proto::op::Message;
use hickory_resolver::proto::rr::{RData, Record, RecordType};
use log::{debug, warn};

use super::exchange::{render_message, DnsExchange};
use super::record::{RawDnsBag, RecordFamily, ResourceRecord};
use crate::error_handling::QueryError;

/// Collects A, AAAA, NS, NS-A and NS-AAAA records for `hostname`.
///
/// Returns the bag together with the distinct IPv4 addresses of the A step in
/// first-seen order, which feed the reverse correlator.
pub async fn harvest_records(
    exchange: &dyn DnsExchange,
    hostname: &str,
) -> (RawDnsBag, Vec<Ipv4Addr>) {
    let mut bag = RawDnsBag::new();

    let a_ips = match exchange.query(hostname, RecordType::A).await {
        Ok(response) => collect_a_step(&response, &mut bag),
        Err(e) => {
            log_step_failure(hostname, RecordFamily::A, &e);
            Vec::new()
        }
    };

    match exchange.query(hostname, RecordType::AAAA).await {
        Ok(response) => {
            for (ip, ttl) in aaaa_answers(&response) {
                bag.aaaa_records.push(ResourceRecord::with_ip(ip, ttl));
            }
        }
        Err(e) => log_step_failure(hostname, RecordFamily::Aaaa, &e),
    }

    if bag.ns_records.is_empty() {
        match exchange.query(hostname, RecordType::NS).await {
            Ok(response) => {
                for (name, ttl) in ns_records_in(response.answers()) {
                    bag.ns_records.push(ResourceRecord::with_addr(name, ttl));
                }
            }
            Err(e) => log_step_failure(hostname, RecordFamily::Ns, &e),
        }
    }

    let name_servers: Vec<String> = bag.name_servers().into_iter().map(String::from).collect();

    for ns_name in &name_servers {
        match exchange.query(ns_name, RecordType::A).await {
            Ok(response) => {
                for (ip, ttl) in a_answers(&response) {
                    bag.nsa_records
                        .push(ResourceRecord::with_addr_and_ip(ns_name, ip.to_string(), ttl));
                }
            }
            Err(e) => log_step_failure(ns_name, RecordFamily::NsA, &e),
        }
    }

    for ns_name in &name_servers {
        match exchange.query(ns_name, RecordType::AAAA).await {
            Ok(response) => {
                for (ip, ttl) in aaaa_answers(&response) {
                    bag.nsaaaa_records
                        .push(ResourceRecord::with_addr_and_ip(ns_name, ip, ttl));
                }
            }
            Err(e) => log_step_failure(ns_name, RecordFamily::NsAaaa, &e),
        }
    }

    (bag, a_ips)
}

/// Fills the A family, the raw text and the NS names found in the authority
/// section of the same response.
fn collect_a_step(response: &Message, bag: &mut RawDnsBag) -> Vec<Ipv4Addr> {
    bag.dns_record_raw = render_message(response);

    let mut ips = Vec::new();
    for (ip, ttl) in a_answers(response) {
        bag.a_records.push(ResourceRecord::with_ip(ip.to_string(), ttl));
        if !ips.contains(&ip) {
            ips.push(ip);
        }
    }

    for (name, ttl) in ns_records_in(response.name_servers()) {
        bag.ns_records.push(ResourceRecord::with_addr(name, ttl));
    }
    ips
}

fn a_answers(response: &Message) -> Vec<(Ipv4Addr, u32)> {
    response
        .answers()
        .iter()
        .filter_map(|record| match record.data() {
            RData::A(a) => Some((a.0, record.ttl())),
            _ => None,
        })
        .collect()
}

fn aaaa_answers(response: &Message) -> Vec<(String, u32)> {
    response
        .answers()
        .iter()
        .filter_map(|record| match record.data() {
            RData::AAAA(aaaa) => Some((aaaa.0.to_string(), record.ttl())),
            _ => None,
        })
        .collect()
}

fn ns_records_in(records: &[Record]) -> impl Iterator<Item = (String, u32)> + '_ {
    records.iter().filter_map(|record| match record.data() {
        RData::NS(ns) => Some((ns.0.to_utf8(), record.ttl())),
        _ => None,
    })
}

fn log_step_failure(name: &str, family: RecordFamily, error: &QueryError) {
    if error.is_soft_miss() {
        debug!("No {family} records for {name}: {error}");
    } else {
        warn!("{family} lookup for {name} failed: {error}");
    }
}
