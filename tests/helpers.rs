// Shared test helpers: a scripted DNS exchange and response builders.
//
// Included with `#[path = "helpers.rs"] mod helpers;` by the tests that drive
// the engine without touching the network.

use async_trait::async_trait;
use hickory_resolver::proto::op::{Message, MessageType, Query};
use hickory_resolver::proto::rr::rdata::{A, NS, PTR};
use hickory_resolver::proto::rr::{Name, RData, Record, RecordType};
use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use domain_signals::dns::{canonical_name, AuthorityCandidateSet, DnsExchange};
use domain_signals::QueryError;

/// Answers from a fixed table; unknown questions get NXDOMAIN.
#[derive(Clone, Default)]
pub struct ScriptedExchange {
    answers: HashMap<(String, RecordType), Message>,
    timeouts: Vec<(String, RecordType)>,
    asked: Arc<Mutex<Vec<(String, RecordType)>>>,
}

#[allow(dead_code)] // Not every test file uses every helper
impl ScriptedExchange {
    pub fn answer(mut self, name: &str, record_type: RecordType, records: Vec<Record>) -> Self {
        let mut message = Message::new();
        message
            .set_id(1)
            .set_message_type(MessageType::Response)
            .add_query(Query::query(fqdn(name), record_type));
        for record in records {
            message.add_answer(record);
        }
        self.answers
            .insert((canonical_name(name), record_type), message);
        self
    }

    pub fn timeout(mut self, name: &str, record_type: RecordType) -> Self {
        self.timeouts.push((canonical_name(name), record_type));
        self
    }

    pub fn asked(&self) -> Vec<(String, RecordType)> {
        self.asked.lock().unwrap().clone()
    }
}

#[async_trait]
impl DnsExchange for ScriptedExchange {
    async fn query(&self, name: &str, record_type: RecordType) -> Result<Message, QueryError> {
        let key = (canonical_name(name), record_type);
        self.asked.lock().unwrap().push(key.clone());
        if self.timeouts.contains(&key) {
            return Err(QueryError::Timeout {
                server: SocketAddr::from(([192, 0, 2, 53], 53)),
                timeout: Duration::from_secs(10),
            });
        }
        self.answers
            .get(&key)
            .cloned()
            .ok_or_else(|| QueryError::NxDomain {
                name: name.to_string(),
            })
    }

    fn prefer(&self, _authorities: &AuthorityCandidateSet) -> Box<dyn DnsExchange> {
        Box::new(self.clone())
    }
}

pub fn fqdn(name: &str) -> Name {
    let name = if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{name}.")
    };
    Name::from_str(&name).unwrap()
}

#[allow(dead_code)]
pub fn a(owner: &str, ip: [u8; 4], ttl: u32) -> Record {
    Record::from_rdata(fqdn(owner), ttl, RData::A(A(Ipv4Addr::from(ip))))
}

#[allow(dead_code)]
pub fn ns(owner: &str, target: &str, ttl: u32) -> Record {
    Record::from_rdata(fqdn(owner), ttl, RData::NS(NS(fqdn(target))))
}

#[allow(dead_code)]
pub fn ptr(ip: [u8; 4], target: &str, ttl: u32) -> Record {
    let owner = format!("{}.{}.{}.{}.in-addr.arpa.", ip[3], ip[2], ip[1], ip[0]);
    Record::from_rdata(fqdn(&owner), ttl, RData::PTR(PTR(fqdn(target))))
}
