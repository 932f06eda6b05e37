//! DNS record data (RDATA) types.
//!
//! The wire format's record set is fixed for this resolver, so record
//! data is a closed tagged union, exhaustively matched at every parse
//! site:
//!
//! - **Address records**: A, AAAA
//! - **Name records**: NS (delegation), CNAME (alias)
//! - **Everything else**: preserved opaquely

pub mod address;
pub mod name;
pub mod unknown;

pub use address::{A, Aaaa};
pub use name::{Cname, Ns};
pub use unknown::Unknown;

use crate::error::{Error, Result};
use crate::name::Name;
use crate::rtype::RecordType;
use bytes::BytesMut;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// DNS record data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RData {
    /// IPv4 address (A record)
    A(A),

    /// IPv6 address (AAAA record)
    Aaaa(Aaaa),

    /// Name server (NS record)
    Ns(Ns),

    /// Canonical name (CNAME record)
    Cname(Cname),

    /// Unknown record type, preserved as raw bytes
    Unknown(Unknown),
}

impl RData {
    /// Parses RDATA from wire format.
    ///
    /// `data` is the complete message (embedded names may be compressed),
    /// `offset` the start of the RDATA, `rdlength` its declared length.
    /// Callers advance their cursor by `rdlength` regardless of how many
    /// physical bytes a compressed name needed.
    pub fn parse(rtype: RecordType, data: &[u8], offset: usize, rdlength: u16) -> Result<Self> {
        let rdata_slice = data
            .get(offset..offset + rdlength as usize)
            .ok_or_else(|| Error::buffer_too_short(offset + rdlength as usize, data.len()))?;

        match rtype {
            RecordType::A => Ok(RData::A(A::parse(rdata_slice)?)),
            RecordType::AAAA => Ok(RData::Aaaa(Aaaa::parse(rdata_slice)?)),
            RecordType::NS => Ok(RData::Ns(Ns::parse(data, offset)?)),
            RecordType::CNAME => Ok(RData::Cname(Cname::parse(data, offset)?)),
        }
    }

    /// Returns the wire format length of this RDATA.
    pub fn wire_len(&self) -> usize {
        match self {
            RData::A(r) => r.wire_len(),
            RData::Aaaa(r) => r.wire_len(),
            RData::Ns(r) => r.wire_len(),
            RData::Cname(r) => r.wire_len(),
            RData::Unknown(r) => r.wire_len(),
        }
    }

    /// Writes this RDATA to wire format.
    pub fn write_to(&self, buf: &mut BytesMut) {
        match self {
            RData::A(r) => r.write_to(buf),
            RData::Aaaa(r) => r.write_to(buf),
            RData::Ns(r) => r.write_to(buf),
            RData::Cname(r) => r.write_to(buf),
            RData::Unknown(r) => r.write_to(buf),
        }
    }

    /// Returns the IPv4 address if this is an A record.
    pub fn as_a(&self) -> Option<Ipv4Addr> {
        match self {
            RData::A(a) => Some(a.address()),
            _ => None,
        }
    }

    /// Returns the IPv6 address if this is an AAAA record.
    pub fn as_aaaa(&self) -> Option<Ipv6Addr> {
        match self {
            RData::Aaaa(aaaa) => Some(aaaa.address()),
            _ => None,
        }
    }

    /// Returns the name server host name if this is an NS record.
    pub fn as_ns(&self) -> Option<&Name> {
        match self {
            RData::Ns(ns) => Some(ns.nsdname()),
            _ => None,
        }
    }

    /// Returns the target name if this is a CNAME record.
    pub fn as_cname(&self) -> Option<&Name> {
        match self {
            RData::Cname(cname) => Some(cname.target()),
            _ => None,
        }
    }

    /// Returns the address this record carries: the literal address for
    /// A/AAAA, the chain-resolved address for a CNAME.
    pub fn address(&self) -> Option<IpAddr> {
        match self {
            RData::A(a) => Some(IpAddr::V4(a.address())),
            RData::Aaaa(aaaa) => Some(IpAddr::V6(aaaa.address())),
            RData::Cname(cname) => cname.resolved(),
            _ => None,
        }
    }

    /// Returns true if this is an alias that should be followed.
    pub fn is_alias(&self) -> bool {
        matches!(self, RData::Cname(_))
    }
}

impl fmt::Display for RData {
    /// Renders A records in dotted-decimal, AAAA in compressed hextets,
    /// CNAME as the resolved address or the (still-unresolved) target
    /// name, and unknown RDATA in RFC 3597 form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RData::A(r) => write!(f, "{r}"),
            RData::Aaaa(r) => write!(f, "{r}"),
            RData::Ns(r) => write!(f, "{r}"),
            RData::Cname(r) => write!(f, "{r}"),
            RData::Unknown(r) => write!(f, "{r}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_parse_dispatch() {
        let a_wire = [192, 0, 2, 1];
        let rdata = RData::parse(RecordType::A, &a_wire, 0, 4).unwrap();
        assert_eq!(rdata.as_a(), Some(Ipv4Addr::new(192, 0, 2, 1)));
        assert_eq!(rdata.to_string(), "192.0.2.1");
    }

    #[test]
    fn test_parse_rejects_overrun() {
        let short = [192, 0];
        assert!(RData::parse(RecordType::A, &short, 0, 4).is_err());
    }

    #[test]
    fn test_address_accessor() {
        let a = RData::A(A::new(Ipv4Addr::new(10, 0, 0, 1)));
        assert_eq!(a.address(), Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1))));

        let unresolved = RData::Cname(Cname::new(Name::from_str("x.example").unwrap()));
        assert_eq!(unresolved.address(), None);

        let ns = RData::Ns(Ns::new(Name::from_str("ns.example").unwrap()));
        assert_eq!(ns.address(), None);
    }
}
