//! End-to-end tests for the iterative resolver against stub name servers.
//!
//! Each stub is a UDP socket with a closure that builds the response for
//! every decoded query. Delegation across "servers" uses two loopback
//! addresses sharing one port, since a glue record only carries an IP.

use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use talus_proto::{Message, Name, Question, RecordClass, RecordType, ResourceRecord};
use talus_resolver::{IterativeResolver, Resolver, ResolverConfig, ResolverError};
use tokio::net::UdpSocket;

fn name(s: &str) -> Name {
    Name::from_str(s).unwrap()
}

/// Spawns a stub name server bound to `bind`; `reply` builds the response
/// for each decoded query. Returns the bound address and a query counter.
async fn spawn_stub<F>(bind: &str, reply: F) -> (SocketAddr, Arc<AtomicU64>)
where
    F: Fn(&Message) -> Message + Send + Sync + 'static,
{
    let socket = UdpSocket::bind(bind).await.unwrap();
    let addr = socket.local_addr().unwrap();
    let queries = Arc::new(AtomicU64::new(0));
    let counter = queries.clone();

    tokio::spawn(async move {
        let mut buf = vec![0u8; 4096];
        loop {
            let Ok((len, peer)) = socket.recv_from(&mut buf).await else {
                break;
            };
            let Ok(query) = Message::parse(&buf[..len]) else {
                continue;
            };
            counter.fetch_add(1, Ordering::SeqCst);
            let response = reply(&query);
            let _ = socket.send_to(&response.to_wire(), peer).await;
        }
    });

    (addr, queries)
}

fn test_config(port: u16) -> ResolverConfig {
    ResolverConfig {
        query_timeout: Duration::from_secs(2),
        total_timeout: Duration::from_secs(10),
        server_port: port,
        ..Default::default()
    }
}

#[tokio::test]
async fn two_hop_delegation_resolves() {
    // Authoritative leaf on the second loopback address
    let (leaf_addr, leaf_queries) = spawn_stub("127.0.0.2:0", |query| {
        let mut response = Message::response_from(query);
        response.add_answer(ResourceRecord::a(
            query.question().unwrap().qname.clone(),
            300,
            Ipv4Addr::new(93, 184, 216, 34),
        ));
        response
    })
    .await;

    // "Root" on the first loopback address at the same port, delegating
    // to the leaf via an NS record plus glue
    let port = leaf_addr.port();
    let (root_addr, root_queries) = spawn_stub(&format!("127.0.0.1:{port}"), |query| {
        let mut response = Message::response_from(query);
        response.add_authority(ResourceRecord::ns(name("com"), 3600, name("ns.icann.org")));
        response.add_additional(ResourceRecord::a(
            name("ns.icann.org"),
            3600,
            Ipv4Addr::new(127, 0, 0, 2),
        ));
        response
    })
    .await;

    let resolver = IterativeResolver::with_roots(test_config(port), vec![root_addr]);
    let response = resolver
        .lookup("example.com", RecordType::A, RecordClass::IN)
        .await
        .unwrap();

    assert_eq!(response.answers().len(), 1);
    assert_eq!(response.answers()[0].rdata().to_string(), "93.184.216.34");

    // Exactly two hops: one referral, one answer
    assert_eq!(root_queries.load(Ordering::SeqCst), 1);
    assert_eq!(leaf_queries.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn answers_suppress_delegation() {
    // Authority records alongside answers must not trigger a follow-up
    let (addr, queries) = spawn_stub("127.0.0.1:0", |query| {
        let mut response = Message::response_from(query);
        response.add_answer(ResourceRecord::a(
            query.question().unwrap().qname.clone(),
            300,
            Ipv4Addr::new(192, 0, 2, 1),
        ));
        response.add_authority(ResourceRecord::ns(
            name("example.com"),
            3600,
            name("ns.example.com"),
        ));
        response
    })
    .await;

    let resolver = IterativeResolver::with_roots(test_config(addr.port()), vec![addr]);
    let response = resolver
        .lookup("example.com", RecordType::A, RecordClass::IN)
        .await
        .unwrap();

    assert_eq!(response.answers().len(), 1);
    assert_eq!(queries.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn empty_response_is_terminal() {
    // No answers, no authority: terminal result, not an error
    let (addr, queries) = spawn_stub("127.0.0.1:0", |query| Message::response_from(query)).await;

    let resolver = IterativeResolver::with_roots(test_config(addr.port()), vec![addr]);
    let response = resolver
        .lookup("nowhere.invalid", RecordType::A, RecordClass::IN)
        .await
        .unwrap();

    assert!(response.answers().is_empty());
    assert!(response.authority().is_empty());
    assert_eq!(queries.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn self_delegation_terminates() {
    // A server that always refers back to itself must be cut off by the
    // hop bound
    let (addr, queries) = spawn_stub("127.0.0.1:0", |query| {
        let mut response = Message::response_from(query);
        response.add_authority(ResourceRecord::ns(name("com"), 60, name("ns.self.test")));
        response.add_additional(ResourceRecord::a(
            name("ns.self.test"),
            60,
            Ipv4Addr::new(127, 0, 0, 1),
        ));
        response
    })
    .await;

    let config = ResolverConfig {
        max_hops: 5,
        ..test_config(addr.port())
    };
    let resolver = IterativeResolver::with_roots(config, vec![addr]);

    let err = resolver
        .lookup("example.com", RecordType::A, RecordClass::IN)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ResolverError::DelegationLoopExceeded { max_hops: 5 }
    ));
    assert_eq!(queries.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn gluless_delegation_resolves_ns_host() {
    // Leaf answers every address query with its fixed address
    let (leaf_addr, leaf_queries) = spawn_stub("127.0.0.2:0", |query| {
        let mut response = Message::response_from(query);
        response.add_answer(ResourceRecord::a(
            query.question().unwrap().qname.clone(),
            60,
            Ipv4Addr::new(203, 0, 113, 77),
        ));
        response
    })
    .await;

    // Root refers address queries for the zone without glue, but answers
    // the name server's own address directly
    let port = leaf_addr.port();
    let (root_addr, _root_queries) = spawn_stub(&format!("127.0.0.1:{port}"), |query| {
        let qname = query.question().unwrap().qname.clone();
        let mut response = Message::response_from(query);
        if qname == name("ns.noglue.test") {
            response.add_answer(ResourceRecord::a(qname, 60, Ipv4Addr::new(127, 0, 0, 2)));
        } else {
            response.add_authority(ResourceRecord::ns(
                name("noglue.test"),
                60,
                name("ns.noglue.test"),
            ));
        }
        response
    })
    .await;

    let resolver = IterativeResolver::with_roots(test_config(port), vec![root_addr]);
    let response = resolver
        .lookup("www.noglue.test", RecordType::A, RecordClass::IN)
        .await
        .unwrap();

    assert_eq!(response.answers().len(), 1);
    assert_eq!(response.answers()[0].rdata().to_string(), "203.0.113.77");
    assert_eq!(leaf_queries.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn cname_chain_resolves_end_to_end() {
    let (addr, _) = spawn_stub("127.0.0.1:0", |query| {
        let mut response = Message::response_from(query);
        response.add_answer(ResourceRecord::cname(
            query.question().unwrap().qname.clone(),
            60,
            name("b.example.com"),
        ));
        response.add_answer(ResourceRecord::a(
            name("b.example.com"),
            60,
            Ipv4Addr::new(93, 184, 216, 34),
        ));
        response
    })
    .await;

    // Driven through the Resolver trait, as a serving caller would
    let resolver: Box<dyn Resolver> = Box::new(IterativeResolver::with_roots(
        test_config(addr.port()),
        vec![addr],
    ));
    let response = resolver
        .resolve(&Question::a(name("a.example.com")))
        .await
        .unwrap();

    // The alias record carries the effective address after decoding
    assert_eq!(response.answers()[0].rdata().to_string(), "93.184.216.34");
}

#[tokio::test]
async fn unresponsive_server_times_out() {
    // A bound socket that never answers
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = socket.local_addr().unwrap();

    let config = ResolverConfig {
        query_timeout: Duration::from_millis(50),
        total_timeout: Duration::from_secs(2),
        server_retries: 1,
        server_port: addr.port(),
        ..Default::default()
    };
    let resolver = IterativeResolver::with_roots(config, vec![addr]);

    let err = resolver
        .lookup("example.com", RecordType::A, RecordClass::IN)
        .await
        .unwrap_err();

    assert!(matches!(err, ResolverError::Timeout));
    drop(socket);
}

#[tokio::test]
async fn garbage_response_is_malformed() {
    // Echo raw garbage instead of a DNS message
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = socket.local_addr().unwrap();

    tokio::spawn(async move {
        let mut buf = vec![0u8; 4096];
        if let Ok((_, peer)) = socket.recv_from(&mut buf).await {
            let _ = socket.send_to(&[0xFF, 0x00, 0x01], peer).await;
        }
    });

    let resolver = IterativeResolver::with_roots(test_config(addr.port()), vec![addr]);
    let err = resolver
        .lookup("example.com", RecordType::A, RecordClass::IN)
        .await
        .unwrap_err();

    assert!(matches!(err, ResolverError::Malformed(_)));
}

#[tokio::test]
async fn concurrent_lookups_share_nothing() {
    let (addr, queries) = spawn_stub("127.0.0.1:0", |query| {
        let mut response = Message::response_from(query);
        response.add_answer(ResourceRecord::a(
            query.question().unwrap().qname.clone(),
            60,
            Ipv4Addr::new(192, 0, 2, 8),
        ));
        response
    })
    .await;

    let resolver = Arc::new(IterativeResolver::with_roots(
        test_config(addr.port()),
        vec![addr],
    ));

    let mut handles = Vec::new();
    for i in 0..8 {
        let resolver = resolver.clone();
        handles.push(tokio::spawn(async move {
            resolver
                .lookup(&format!("host{i}.example.com"), RecordType::A, RecordClass::IN)
                .await
        }));
    }

    for handle in handles {
        let response = handle.await.unwrap().unwrap();
        assert_eq!(response.answers().len(), 1);
    }

    assert_eq!(queries.load(Ordering::SeqCst), 8);
}
