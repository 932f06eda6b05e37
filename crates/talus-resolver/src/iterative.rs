//! Iterative resolution engine.
//!
//! The delegation-following state machine: pick a server, send one query,
//! decode the response, then either terminate (answers present, or
//! neither answers nor delegation) or descend into the referred zone and
//! repeat. The loop is bounded by a hop count and a total deadline, both
//! checked before each new query, so a misbehaving or adversarial server
//! cannot keep a chain alive forever.

use crate::hints::ROOT_SERVERS;
use crate::{Resolver, ResolverConfig, ResolverError, Result};
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use rand::seq::SliceRandom;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Instant;
use talus_proto::{MAX_UDP_PAYLOAD, Message, Name, Question, RecordClass, RecordType};
use tokio::net::UdpSocket;
use tokio::time::timeout;
use tracing::{debug, instrument, trace, warn};

/// Bound on nested lookups of name-server host names (referrals without
/// glue), separate from the per-chain hop bound.
const MAX_NS_LOOKUP_DEPTH: u8 = 4;

/// Iterative DNS resolver.
///
/// Holds only immutable configuration and the root-server table; a
/// resolution chain keeps all of its state on the stack, and each round
/// trip opens and drops its own UDP socket.
#[derive(Debug)]
pub struct IterativeResolver {
    /// Engine configuration.
    config: ResolverConfig,
    /// Starting candidates for a fresh chain.
    roots: Vec<SocketAddr>,
}

impl IterativeResolver {
    /// Creates a resolver starting from the IANA root servers.
    pub fn new(config: ResolverConfig) -> Self {
        let port = config.server_port;
        let roots = ROOT_SERVERS
            .iter()
            .map(|rs| SocketAddr::new(IpAddr::V4(rs.ipv4), port))
            .collect();
        Self { config, roots }
    }

    /// Creates a resolver with an explicit root set.
    pub fn with_roots(config: ResolverConfig, roots: Vec<SocketAddr>) -> Self {
        Self { config, roots }
    }

    /// Resolves a textual domain name.
    ///
    /// An unencodable name (oversized label or total length, bad label
    /// character) fails immediately with [`ResolverError::Encoding`].
    pub async fn lookup(
        &self,
        domain: &str,
        qtype: RecordType,
        qclass: RecordClass,
    ) -> Result<Message> {
        let qname = Name::from_str(domain).map_err(ResolverError::Encoding)?;
        self.resolve_question(&Question::new(qname, qtype, qclass))
            .await
    }

    /// Resolves a question, driving the full delegation chain.
    #[instrument(skip(self), fields(qname = %question.qname, qtype = %question.qtype))]
    pub async fn resolve_question(&self, question: &Question) -> Result<Message> {
        let deadline = Instant::now() + self.config.total_timeout;
        self.resolve_at(question, deadline, 0).await
    }

    /// The hop loop. `BoxFuture` breaks the type recursion introduced by
    /// nested name-server lookups.
    fn resolve_at<'a>(
        &'a self,
        question: &'a Question,
        deadline: Instant,
        depth: u8,
    ) -> BoxFuture<'a, Result<Message>> {
        async move {
            // Fresh chains start at a uniformly random root; the rest of
            // the shuffled table is the fallback order.
            let mut servers = self.roots.clone();
            servers.shuffle(&mut rand::thread_rng());

            for hop in 0..self.config.max_hops {
                if Instant::now() >= deadline {
                    return Err(ResolverError::Timeout);
                }

                let response = self.query_level(&servers, question).await?;

                if !response.answers().is_empty() {
                    debug!(hop, answers = response.answers().len(), "resolution complete");
                    return Ok(response);
                }

                if response.authority().is_empty() {
                    // Neither answers nor delegation: terminal, not an error
                    debug!(hop, "response carries no answers and no delegation");
                    return Ok(response);
                }

                servers = self.delegation_targets(&response, deadline, depth).await?;
                if servers.is_empty() {
                    return Err(ResolverError::ServersExhausted);
                }

                trace!(hop, candidates = servers.len(), "following delegation");
            }

            warn!(max_hops = self.config.max_hops, "delegation chain did not terminate");
            Err(ResolverError::DelegationLoopExceeded {
                max_hops: self.config.max_hops,
            })
        }
        .boxed()
    }

    /// Queries the candidates for one delegation level.
    ///
    /// The same server is retried `server_retries` extra times on a
    /// transport failure before the next candidate is tried. A malformed
    /// response is a hard failure of the hop: surfaced immediately, never
    /// retried against the same server.
    async fn query_level(&self, servers: &[SocketAddr], question: &Question) -> Result<Message> {
        let mut last_err = None;

        for &server in servers {
            for attempt in 0..=self.config.server_retries {
                match self.query_udp(server, question).await {
                    Ok(response) => return Ok(response),
                    Err(err @ ResolverError::Malformed(_)) => {
                        warn!(server = %server, error = %err, "discarding server after malformed response");
                        return Err(err);
                    }
                    Err(err) => {
                        debug!(server = %server, attempt, error = %err, "query attempt failed");
                        last_err = Some(err);
                    }
                }
            }
        }

        Err(last_err.unwrap_or(ResolverError::ServersExhausted))
    }

    /// One query round trip over a fresh UDP socket.
    async fn query_udp(&self, server: SocketAddr, question: &Question) -> Result<Message> {
        let query = Message::query(question.clone());
        let wire = query.to_wire();

        let raw = timeout(self.config.query_timeout, async {
            // The socket lives for exactly one round trip
            let socket = UdpSocket::bind("0.0.0.0:0").await?;
            socket.connect(server).await?;
            socket.send(&wire).await?;

            let mut buf = vec![0u8; MAX_UDP_PAYLOAD];
            let len = socket.recv(&mut buf).await?;
            buf.truncate(len);
            Ok::<Vec<u8>, std::io::Error>(buf)
        })
        .await
        .map_err(|_| ResolverError::Timeout)??;

        let response = Message::parse(&raw).map_err(ResolverError::Malformed)?;

        if response.id() != query.id() {
            return Err(ResolverError::Malformed(talus_proto::Error::invalid_data(
                0,
                "response transaction id mismatch",
            )));
        }

        match response.question() {
            Some(echoed) if echoed.matches(question) => {}
            _ => {
                return Err(ResolverError::Malformed(talus_proto::Error::invalid_data(
                    0,
                    "response question mismatch",
                )));
            }
        }

        Ok(response)
    }

    /// Picks the next delegation level's servers from a referral.
    ///
    /// One NS record is chosen uniformly at random; a glue address from
    /// the additional section is used when present, otherwise the host
    /// name itself is resolved with a nested bounded lookup. Name servers
    /// with no reachable address are skipped in random order.
    async fn delegation_targets(
        &self,
        response: &Message,
        deadline: Instant,
        depth: u8,
    ) -> Result<Vec<SocketAddr>> {
        let mut hosts: Vec<&Name> = response
            .authority()
            .iter()
            .filter_map(|rr| rr.rdata().as_ns())
            .collect();
        hosts.shuffle(&mut rand::thread_rng());

        for host in hosts {
            let mut addrs = self.glue_addresses(response, host);
            if addrs.is_empty() {
                addrs = self.lookup_ns_host(host, deadline, depth).await;
            }
            if !addrs.is_empty() {
                return Ok(addrs);
            }
            debug!(ns = %host, "no usable address for name server");
        }

        Ok(Vec::new())
    }

    /// Addresses for a name-server host from the referral's additional
    /// section.
    fn glue_addresses(&self, response: &Message, host: &Name) -> Vec<SocketAddr> {
        response
            .additional()
            .iter()
            .filter(|rr| rr.name() == host)
            .filter_map(|rr| rr.rdata().address())
            .map(|ip| SocketAddr::new(ip, self.config.server_port))
            .collect()
    }

    /// Resolves a name-server host name with a nested lookup (A first,
    /// then AAAA), sharing the chain's deadline.
    async fn lookup_ns_host(&self, host: &Name, deadline: Instant, depth: u8) -> Vec<SocketAddr> {
        if depth >= MAX_NS_LOOKUP_DEPTH {
            warn!(ns = %host, "nested name-server lookup depth exhausted");
            return Vec::new();
        }

        let port = self.config.server_port;
        let mut addrs = Vec::new();

        let question = Question::a(host.clone());
        if let Ok(response) = self.resolve_at(&question, deadline, depth + 1).await {
            addrs.extend(
                response
                    .a_records()
                    .map(|ip| SocketAddr::new(IpAddr::V4(ip), port)),
            );
        }

        if addrs.is_empty() {
            let question = Question::aaaa(host.clone());
            if let Ok(response) = self.resolve_at(&question, deadline, depth + 1).await {
                addrs.extend(
                    response
                        .aaaa_records()
                        .map(|ip| SocketAddr::new(IpAddr::V6(ip), port)),
                );
            }
        }

        addrs
    }
}

#[async_trait]
impl Resolver for IterativeResolver {
    async fn resolve(&self, question: &Question) -> Result<Message> {
        self.resolve_question(question).await
    }
}
