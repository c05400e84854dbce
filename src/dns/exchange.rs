//! Single-question DNS exchanges over UDP.
//!
//! The harvester needs more than a stub resolver gives back: the full response
//! text and the authority section of the A answer. So queries are built and
//! parsed with `hickory-proto` (re-exported by `hickory-resolver`) and sent
//! over a fresh UDP socket per query.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_resolver::proto::rr::{Name, Record, RecordType};
use hickory_resolver::proto::serialize::binary::BinEncodable;
use log::debug;
use tokio::net::UdpSocket;

use super::authority::AuthorityCandidateSet;
use crate::config::{DNS_PORT, MAX_UDP_RESPONSE_SIZE};
use crate::error_handling::QueryError;

/// Something that can answer one DNS question with a full response message.
///
/// The production implementation is [`UdpExchange`]; tests script responses.
#[async_trait]
pub trait DnsExchange: Send + Sync {
    /// Asks `name`/`record_type` and returns the response message.
    ///
    /// A `NOERROR` response with an empty answer section is `Ok`: callers
    /// decide what an empty section means.
    async fn query(&self, name: &str, record_type: RecordType) -> Result<Message, QueryError>;

    /// Exchange that asks the authoritative candidates first and keeps this
    /// exchange's servers as the fallback.
    fn prefer(&self, authorities: &AuthorityCandidateSet) -> Box<dyn DnsExchange>;
}

/// Sends each query to the configured servers in order until one answers.
///
/// Owns no socket between queries. An exchange built by [`DnsExchange::prefer`]
/// drops an authoritative server for the rest of its life once that server
/// times out or fails at the socket level, so a lame delegation costs one
/// timeout per pass instead of one per query.
#[derive(Debug)]
pub struct UdpExchange {
    servers: Vec<SocketAddr>,
    timeout: Duration,
    /// Servers that may be dropped when unreachable
    droppable: HashSet<SocketAddr>,
    unreachable: Mutex<HashSet<SocketAddr>>,
}

impl UdpExchange {
    /// Exchange asking `servers` in order, each with `timeout`.
    pub fn new(servers: Vec<SocketAddr>, timeout: Duration) -> Self {
        Self {
            servers,
            timeout,
            droppable: HashSet::new(),
            unreachable: Mutex::new(HashSet::new()),
        }
    }

    /// Exchange asking `preferred` first, then those `fallback` servers not
    /// already listed. Unreachable preferred servers are dropped after their
    /// first failure.
    pub fn with_fallback(
        preferred: Vec<SocketAddr>,
        fallback: &[SocketAddr],
        timeout: Duration,
    ) -> Self {
        let droppable = preferred
            .iter()
            .filter(|server| !fallback.contains(server))
            .copied()
            .collect();
        let mut servers = preferred;
        for server in fallback {
            if !servers.contains(server) {
                servers.push(*server);
            }
        }
        Self {
            servers,
            timeout,
            droppable,
            unreachable: Mutex::new(HashSet::new()),
        }
    }

    /// Servers in the order they are tried.
    pub fn servers(&self) -> &[SocketAddr] {
        &self.servers
    }

    /// Authoritative candidates on port 53, then this exchange's own servers.
    pub fn preferred_servers(&self, authorities: &AuthorityCandidateSet) -> Vec<SocketAddr> {
        self.fallback_exchange(authorities).servers
    }

    fn fallback_exchange(&self, authorities: &AuthorityCandidateSet) -> Self {
        let preferred = authorities
            .iter()
            .map(|ip| SocketAddr::new(IpAddr::V4(ip), DNS_PORT))
            .collect();
        Self::with_fallback(preferred, &self.servers, self.timeout)
    }

    fn is_unreachable(&self, server: &SocketAddr) -> bool {
        self.unreachable
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(server)
    }

    fn mark_unreachable(&self, server: SocketAddr) {
        self.unreachable
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(server);
    }

    async fn exchange_with(
        &self,
        server: SocketAddr,
        request: &[u8],
        id: u16,
    ) -> Result<Message, QueryError> {
        let bind: SocketAddr = match server {
            SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };
        let socket = UdpSocket::bind(bind).await?;
        socket.connect(server).await?;
        socket.send(request).await?;

        tokio::time::timeout(self.timeout, read_response(&socket, server, id))
            .await
            .map_err(|_| QueryError::Timeout {
                server,
                timeout: self.timeout,
            })?
    }
}

#[async_trait]
impl DnsExchange for UdpExchange {
    async fn query(&self, name: &str, record_type: RecordType) -> Result<Message, QueryError> {
        let request = build_query(name, record_type)?;
        let bytes = request
            .to_bytes()
            .map_err(|e| QueryError::Encode(e.to_string()))?;

        let mut last_error = QueryError::NoServers;
        for &server in &self.servers {
            if self.is_unreachable(&server) {
                continue;
            }
            match self.exchange_with(server, &bytes, request.id()).await {
                Ok(response) => match response.response_code() {
                    ResponseCode::NoError => return Ok(response),
                    ResponseCode::NXDomain => {
                        return Err(QueryError::NxDomain {
                            name: name.to_string(),
                        })
                    }
                    code => {
                        debug!("{server} answered {code} for {name} {record_type}, trying next server");
                        last_error = QueryError::ResponseCode {
                            server,
                            code: code.to_string(),
                        };
                    }
                },
                Err(e) => {
                    debug!("{name} {record_type} via {server} failed: {e}");
                    if self.droppable.contains(&server)
                        && matches!(e, QueryError::Timeout { .. } | QueryError::Io(_))
                    {
                        debug!("Dropping {server} for the rest of this pass");
                        self.mark_unreachable(server);
                    }
                    last_error = e;
                }
            }
        }
        Err(last_error)
    }

    fn prefer(&self, authorities: &AuthorityCandidateSet) -> Box<dyn DnsExchange> {
        Box::new(self.fallback_exchange(authorities))
    }
}

async fn read_response(
    socket: &UdpSocket,
    server: SocketAddr,
    id: u16,
) -> Result<Message, QueryError> {
    let mut buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
    loop {
        let len = socket.recv(&mut buf).await?;
        let response = Message::from_vec(&buf[..len]).map_err(|e| QueryError::Malformed {
            server,
            reason: e.to_string(),
        })?;
        if response.id() == id {
            if response.truncated() {
                debug!("Truncated response from {server}, keeping the partial answer");
            }
            return Ok(response);
        }
        debug!(
            "Discarding response with id {} from {server} (expected {id})",
            response.id()
        );
    }
}

/// Builds a recursive query for one question.
pub fn build_query(name: &str, record_type: RecordType) -> Result<Message, QueryError> {
    let fqdn = if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{name}.")
    };
    let name = Name::from_utf8(&fqdn).map_err(|e| QueryError::InvalidName {
        name: name.to_string(),
        reason: e.to_string(),
    })?;

    let mut message = Message::new();
    message
        .set_id(rand::random::<u16>())
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true)
        .add_query(Query::query(name, record_type));
    Ok(message)
}

/// `in-addr.arpa` name for an IPv4 address.
pub fn reverse_name(ip: Ipv4Addr) -> String {
    let [a, b, c, d] = ip.octets();
    format!("{d}.{c}.{b}.{a}.in-addr.arpa.")
}

/// Renders a response the way `dig`-style tools print it: header, flags and
/// the four sections, one record per line.
pub fn render_message(message: &Message) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "id {}", message.id());
    let _ = writeln!(
        out,
        "opcode {}",
        format!("{:?}", message.op_code()).to_uppercase()
    );
    let _ = writeln!(out, "rcode {}", message.response_code());

    let mut flags = Vec::new();
    if message.message_type() == MessageType::Response {
        flags.push("QR");
    }
    if message.authoritative() {
        flags.push("AA");
    }
    if message.truncated() {
        flags.push("TC");
    }
    if message.recursion_desired() {
        flags.push("RD");
    }
    if message.recursion_available() {
        flags.push("RA");
    }
    let _ = writeln!(out, "flags {}", flags.join(" "));

    let _ = writeln!(out, ";QUESTION");
    for query in message.queries() {
        let _ = writeln!(
            out,
            "{} {} {}",
            query.name(),
            query.query_class(),
            query.query_type()
        );
    }
    render_section(&mut out, ";ANSWER", message.answers());
    render_section(&mut out, ";AUTHORITY", message.name_servers());
    render_section(&mut out, ";ADDITIONAL", message.additionals());
    out.trim_end().to_string()
}

fn render_section(out: &mut String, title: &str, records: &[Record]) {
    let _ = writeln!(out, "{title}");
    for record in records {
        let _ = writeln!(
            out,
            "{} {} {} {} {}",
            record.name(),
            record.ttl(),
            record.dns_class(),
            record.record_type(),
            record.data()
        );
    }
}
