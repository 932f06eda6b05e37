//! Root server hints.
//!
//! The thirteen IANA root name servers, the starting points for every
//! fresh resolution chain. The table is immutable, process-wide
//! configuration; the engine receives it at construction and selects from
//! it uniformly at random.

use std::net::Ipv4Addr;

/// A root server entry: host name and literal IPv4 address.
#[derive(Debug, Clone)]
pub struct RootServer {
    /// Host name of the root server.
    pub name: &'static str,
    /// IPv4 address.
    pub ipv4: Ipv4Addr,
}

/// The IANA root name servers.
pub static ROOT_SERVERS: &[RootServer] = &[
    RootServer {
        name: "a.root-servers.net",
        ipv4: Ipv4Addr::new(198, 41, 0, 4),
    },
    RootServer {
        name: "b.root-servers.net",
        ipv4: Ipv4Addr::new(199, 9, 14, 201),
    },
    RootServer {
        name: "c.root-servers.net",
        ipv4: Ipv4Addr::new(192, 33, 4, 12),
    },
    RootServer {
        name: "d.root-servers.net",
        ipv4: Ipv4Addr::new(199, 7, 91, 13),
    },
    RootServer {
        name: "e.root-servers.net",
        ipv4: Ipv4Addr::new(192, 203, 230, 10),
    },
    RootServer {
        name: "f.root-servers.net",
        ipv4: Ipv4Addr::new(192, 5, 5, 241),
    },
    RootServer {
        name: "g.root-servers.net",
        ipv4: Ipv4Addr::new(192, 112, 36, 4),
    },
    RootServer {
        name: "h.root-servers.net",
        ipv4: Ipv4Addr::new(198, 97, 190, 53),
    },
    RootServer {
        name: "i.root-servers.net",
        ipv4: Ipv4Addr::new(192, 36, 148, 17),
    },
    RootServer {
        name: "j.root-servers.net",
        ipv4: Ipv4Addr::new(192, 58, 128, 30),
    },
    RootServer {
        name: "k.root-servers.net",
        ipv4: Ipv4Addr::new(193, 0, 14, 129),
    },
    RootServer {
        name: "l.root-servers.net",
        ipv4: Ipv4Addr::new(199, 7, 83, 42),
    },
    RootServer {
        name: "m.root-servers.net",
        ipv4: Ipv4Addr::new(202, 12, 27, 33),
    },
];
