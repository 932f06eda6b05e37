//! Name-based record types (NS, CNAME).
//!
//! Both carry a domain name as their RDATA; inside a message that name may
//! be compressed, so parsing needs the full buffer.

use crate::error::Result;
use crate::name::{Name, NameParser};
use bytes::BytesMut;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// NS record - authoritative name server (RFC 1035).
///
/// Appearing in the authority section, this is a delegation: it names the
/// host responsible for a sub-zone without answering the question. The
/// host is textual and not yet resolved to an address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ns {
    /// The name server host name.
    nsdname: Name,
}

impl Ns {
    /// Creates a new NS record.
    #[inline]
    pub fn new(nsdname: Name) -> Self {
        Self { nsdname }
    }

    /// Returns the name server host name.
    #[inline]
    pub fn nsdname(&self) -> &Name {
        &self.nsdname
    }

    /// Parses an NS record; `offset` is where the RDATA starts in the
    /// full message.
    pub fn parse(message: &[u8], offset: usize) -> Result<Self> {
        let parser = NameParser::new(message);
        let (nsdname, _) = parser.parse_name(offset)?;
        Ok(Self { nsdname })
    }

    /// Returns the wire format length.
    #[inline]
    pub fn wire_len(&self) -> usize {
        self.nsdname.wire_len()
    }

    /// Writes the NS record to wire format.
    pub fn write_to(&self, buf: &mut BytesMut) {
        self.nsdname.write_wire(buf);
    }
}

impl fmt::Display for Ns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.nsdname)
    }
}

/// CNAME record - canonical name / alias (RFC 1035).
///
/// After a message is decoded, alias chains inside its answer section are
/// resolved in place: when some other answer record carries the address
/// for this record's target, that address is recorded here. An alias whose
/// target has no matching record stays unresolved and renders as the
/// target name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cname {
    /// The canonical (target) domain name.
    target: Name,
    /// Address carried by the chain, filled in by alias resolution.
    resolved: Option<IpAddr>,
}

impl Cname {
    /// Creates a new, unresolved CNAME record.
    #[inline]
    pub fn new(target: Name) -> Self {
        Self {
            target,
            resolved: None,
        }
    }

    /// Returns the target name.
    #[inline]
    pub fn target(&self) -> &Name {
        &self.target
    }

    /// Returns the resolved address, if the chain reached one.
    #[inline]
    pub fn resolved(&self) -> Option<IpAddr> {
        self.resolved
    }

    /// Records the address this alias ultimately points at.
    #[inline]
    pub fn resolve(&mut self, addr: IpAddr) {
        self.resolved = Some(addr);
    }

    /// Parses a CNAME record; `offset` is where the RDATA starts in the
    /// full message.
    pub fn parse(message: &[u8], offset: usize) -> Result<Self> {
        let parser = NameParser::new(message);
        let (target, _) = parser.parse_name(offset)?;
        Ok(Self {
            target,
            resolved: None,
        })
    }

    /// Returns the wire format length (of the target name; the resolved
    /// address is presentation state, not wire data).
    #[inline]
    pub fn wire_len(&self) -> usize {
        self.target.wire_len()
    }

    /// Writes the CNAME record to wire format.
    pub fn write_to(&self, buf: &mut BytesMut) {
        self.target.write_wire(buf);
    }
}

impl fmt::Display for Cname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.resolved {
            Some(addr) => write!(f, "{addr}"),
            None => write!(f, "{}", self.target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use std::str::FromStr;

    #[test]
    fn test_ns_record() {
        let host = Name::from_str("ns.icann.org").unwrap();
        let ns = Ns::new(host.clone());
        assert_eq!(ns.nsdname(), &host);
        assert_eq!(ns.to_string(), "ns.icann.org");
    }

    #[test]
    fn test_ns_parse_compressed() {
        // Offset 0: icann.org., offset 11: ns.<ptr to 0>
        let wire = [
            5, b'i', b'c', b'a', b'n', b'n', 3, b'o', b'r', b'g', 0, // icann.org.
            2, b'n', b's', 0xC0, 0x00, // ns.<ptr>
        ];

        let ns = Ns::parse(&wire, 11).unwrap();
        assert_eq!(ns.nsdname(), &Name::from_str("ns.icann.org").unwrap());
    }

    #[test]
    fn test_cname_unresolved_renders_target() {
        let cname = Cname::new(Name::from_str("b.example.com").unwrap());
        assert!(cname.resolved().is_none());
        assert_eq!(cname.to_string(), "b.example.com");
    }

    #[test]
    fn test_cname_resolved_renders_address() {
        let mut cname = Cname::new(Name::from_str("b.example.com").unwrap());
        cname.resolve(IpAddr::V4(Ipv4Addr::new(93, 184, 216, 34)));
        assert_eq!(cname.to_string(), "93.184.216.34");
    }

    #[test]
    fn test_cname_wire_ignores_resolution() {
        let target = Name::from_str("b.example.com").unwrap();
        let mut cname = Cname::new(target.clone());
        cname.resolve(IpAddr::V4(Ipv4Addr::new(1, 2, 3, 4)));

        let mut buf = BytesMut::new();
        cname.write_to(&mut buf);
        assert_eq!(&buf[..], target.as_wire());
    }
}
