//! Address record types (A, AAAA).

use crate::error::{Error, Result};
use bytes::BytesMut;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// A record - IPv4 address (RFC 1035).
///
/// The RDATA is exactly 4 bytes, the address in network byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct A {
    /// The IPv4 address.
    address: Ipv4Addr,
}

impl A {
    /// Creates a new A record.
    #[inline]
    pub const fn new(address: Ipv4Addr) -> Self {
        Self { address }
    }

    /// Returns the IPv4 address.
    #[inline]
    pub const fn address(&self) -> Ipv4Addr {
        self.address
    }

    /// Parses an A record from its RDATA bytes.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let octets: [u8; 4] = data.try_into().map_err(|_| Error::RDataLengthMismatch {
            rtype: "A".to_string(),
            expected: 4,
            actual: data.len(),
        })?;
        Ok(Self {
            address: Ipv4Addr::from(octets),
        })
    }

    /// Returns the wire format length (always 4).
    #[inline]
    pub const fn wire_len(&self) -> usize {
        4
    }

    /// Writes the A record to wire format.
    pub fn write_to(&self, buf: &mut BytesMut) {
        buf.extend_from_slice(&self.address.octets());
    }
}

impl From<Ipv4Addr> for A {
    fn from(address: Ipv4Addr) -> Self {
        Self::new(address)
    }
}

impl From<A> for Ipv4Addr {
    fn from(a: A) -> Self {
        a.address
    }
}

impl fmt::Display for A {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)
    }
}

/// AAAA record - IPv6 address (RFC 3596).
///
/// The RDATA is exactly 16 bytes, the address in network byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Aaaa {
    /// The IPv6 address.
    address: Ipv6Addr,
}

impl Aaaa {
    /// Creates a new AAAA record.
    #[inline]
    pub const fn new(address: Ipv6Addr) -> Self {
        Self { address }
    }

    /// Returns the IPv6 address.
    #[inline]
    pub const fn address(&self) -> Ipv6Addr {
        self.address
    }

    /// Parses an AAAA record from its RDATA bytes.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let octets: [u8; 16] = data.try_into().map_err(|_| Error::RDataLengthMismatch {
            rtype: "AAAA".to_string(),
            expected: 16,
            actual: data.len(),
        })?;
        Ok(Self {
            address: Ipv6Addr::from(octets),
        })
    }

    /// Returns the wire format length (always 16).
    #[inline]
    pub const fn wire_len(&self) -> usize {
        16
    }

    /// Writes the AAAA record to wire format.
    pub fn write_to(&self, buf: &mut BytesMut) {
        buf.extend_from_slice(&self.address.octets());
    }
}

impl From<Ipv6Addr> for Aaaa {
    fn from(address: Ipv6Addr) -> Self {
        Self::new(address)
    }
}

impl From<Aaaa> for Ipv6Addr {
    fn from(aaaa: Aaaa) -> Self {
        aaaa.address
    }
}

impl fmt::Display for Aaaa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Ipv6Addr renders the standard compressed hextet form
        write!(f, "{}", self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a_record() {
        let a = A::new(Ipv4Addr::new(93, 184, 216, 34));
        assert_eq!(a.address(), Ipv4Addr::new(93, 184, 216, 34));
        assert_eq!(a.wire_len(), 4);
        assert_eq!(a.to_string(), "93.184.216.34");
    }

    #[test]
    fn test_a_parse_rejects_wrong_length() {
        assert!(matches!(
            A::parse(&[1, 2, 3]),
            Err(Error::RDataLengthMismatch { .. })
        ));
        assert!(matches!(
            A::parse(&[1, 2, 3, 4, 5]),
            Err(Error::RDataLengthMismatch { .. })
        ));
    }

    #[test]
    fn test_a_roundtrip() {
        let original = A::new(Ipv4Addr::new(10, 0, 0, 1));
        let mut buf = BytesMut::new();
        original.write_to(&mut buf);
        let parsed = A::parse(&buf).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_aaaa_record() {
        let aaaa = Aaaa::new(Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 1));
        assert_eq!(aaaa.wire_len(), 16);
        // Compressed hextet form
        assert_eq!(aaaa.to_string(), "2001:db8::1");
    }

    #[test]
    fn test_aaaa_roundtrip() {
        let original = Aaaa::new(Ipv6Addr::LOCALHOST);
        let mut buf = BytesMut::new();
        original.write_to(&mut buf);
        let parsed = Aaaa::parse(&buf).unwrap();
        assert_eq!(original, parsed);
    }
}
