//! Reverse correlation of harvested IPv4 addresses.

use std::net::Ipv4Addr;

use hickory_resolver::proto::rr::{RData, RecordType};
use log::debug;

use super::exchange::{render_message, reverse_name, DnsExchange};
use super::record::{RawDnsBag, ResourceRecord};
use crate::config::EMPTY_RESPONSE;

/// Looks up the PTR name of every address and appends the results to `bag`.
///
/// `ptr_record_raw` keeps the text of the first response that carried a PTR
/// answer. A failed lookup is logged and skipped.
pub async fn correlate_reverse(
    exchange: &dyn DnsExchange,
    hostname: &str,
    ips: &[Ipv4Addr],
    bag: &mut RawDnsBag,
) {
    for &ip in ips {
        let name = reverse_name(ip);
        let response = match exchange.query(&name, RecordType::PTR).await {
            Ok(response) => response,
            Err(e) => {
                debug!("No reverse DNS for {ip} ({hostname}): {e}");
                continue;
            }
        };

        let before = bag.ptr_records.len();
        for record in response.answers() {
            if let RData::PTR(ptr) = record.data() {
                bag.ptr_records.push(ResourceRecord::with_addr_and_ip(
                    ptr.0.to_utf8(),
                    ip.to_string(),
                    record.ttl(),
                ));
            }
        }
        if bag.ptr_records.len() == before {
            debug!("Empty PTR answer for {ip} ({hostname})");
        } else if bag.ptr_record_raw == EMPTY_RESPONSE {
            bag.ptr_record_raw = render_message(&response);
        }
    }
}
