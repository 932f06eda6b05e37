//! DNS message header.
//!
//! The header is a fixed 12-byte structure at the start of every DNS
//! message: an id, a flags word, and four section counts.

use crate::error::{Error, Result};
use crate::wire::WireReader;
use bitflags::bitflags;
use std::fmt;

/// Size of the DNS header in bytes.
pub const HEADER_SIZE: usize = 12;

bitflags! {
    /// DNS header flags.
    ///
    /// Standard RFC 1035 bit positions. The opcode and response-code
    /// nibbles share the same 16-bit word but are not modeled here: this
    /// resolver only ever sends standard queries and decides on section
    /// contents, so those bits are masked on parse and zero on write.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct HeaderFlags: u16 {
        /// Query/Response flag: 0 = query, 1 = response
        const QR = 0x8000;

        /// Authoritative Answer: server is authoritative for the domain
        const AA = 0x0400;

        /// Truncation: message was truncated
        const TC = 0x0200;

        /// Recursion Desired: client wants recursive resolution
        const RD = 0x0100;

        /// Recursion Available: server supports recursion
        const RA = 0x0080;

        /// Reserved for future use (must be zero)
        const Z = 0x0040;

        /// Authentic Data (DNSSEC)
        const AD = 0x0020;
    }
}

impl Default for HeaderFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// DNS message header.
///
/// # Wire Format
///
/// ```text
///                                 1  1  1  1  1  1
///   0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                      ID                       |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |QR|   Opcode  |AA|TC|RD|RA| Z|AD|CD|   RCODE   |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    QDCOUNT                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    ANCOUNT                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    NSCOUNT                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    ARCOUNT                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
///
/// All fields are big-endian. The counts declare how many entries each
/// section holds; a count that overruns the buffer is a malformed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Transaction identifier for matching requests to responses.
    pub id: u16,

    /// Header flags.
    pub flags: HeaderFlags,

    /// Number of questions.
    pub qd_count: u16,

    /// Number of answer records.
    pub an_count: u16,

    /// Number of authority records.
    pub ns_count: u16,

    /// Number of additional records.
    pub ar_count: u16,
}

impl Header {
    /// Creates a new header with the given transaction id.
    #[inline]
    pub const fn new(id: u16) -> Self {
        Self {
            id,
            flags: HeaderFlags::empty(),
            qd_count: 0,
            an_count: 0,
            ns_count: 0,
            ar_count: 0,
        }
    }

    /// Creates a query header with a random transaction id, recursion
    /// desired, and one question.
    pub fn query() -> Self {
        Self::query_with_id(rand::random())
    }

    /// Creates a query header with an explicit transaction id.
    pub fn query_with_id(id: u16) -> Self {
        Self {
            id,
            flags: HeaderFlags::RD,
            qd_count: 1,
            an_count: 0,
            ns_count: 0,
            ar_count: 0,
        }
    }

    /// Creates a response header echoing a query header.
    pub fn response_from(query: &Header) -> Self {
        Self {
            id: query.id,
            flags: HeaderFlags::QR | (query.flags & HeaderFlags::RD),
            qd_count: query.qd_count,
            an_count: 0,
            ns_count: 0,
            ar_count: 0,
        }
    }

    /// Returns true if this is a response.
    #[inline]
    pub fn is_response(&self) -> bool {
        self.flags.contains(HeaderFlags::QR)
    }

    /// Returns true if the response is from an authoritative server.
    #[inline]
    pub fn is_authoritative(&self) -> bool {
        self.flags.contains(HeaderFlags::AA)
    }

    /// Returns true if the message was truncated.
    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.flags.contains(HeaderFlags::TC)
    }

    /// Returns true if recursion was requested.
    #[inline]
    pub fn recursion_desired(&self) -> bool {
        self.flags.contains(HeaderFlags::RD)
    }

    /// Parses a header from wire format.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(Error::buffer_too_short(HEADER_SIZE, data.len()));
        }

        let mut reader = WireReader::new(data);
        let id = reader.read_u16()?;
        let flags_raw = reader.read_u16()?;

        // Mask out the opcode and rcode nibbles
        let flags = HeaderFlags::from_bits_truncate(flags_raw);

        let qd_count = reader.read_u16()?;
        let an_count = reader.read_u16()?;
        let ns_count = reader.read_u16()?;
        let ar_count = reader.read_u16()?;

        Ok(Self {
            id,
            flags,
            qd_count,
            an_count,
            ns_count,
            ar_count,
        })
    }

    /// Serializes the header to wire format.
    pub fn to_wire(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];

        buf[0..2].copy_from_slice(&self.id.to_be_bytes());
        buf[2..4].copy_from_slice(&self.flags.bits().to_be_bytes());
        buf[4..6].copy_from_slice(&self.qd_count.to_be_bytes());
        buf[6..8].copy_from_slice(&self.an_count.to_be_bytes());
        buf[8..10].copy_from_slice(&self.ns_count.to_be_bytes());
        buf[10..12].copy_from_slice(&self.ar_count.to_be_bytes());

        buf
    }

    /// Writes the header to a buffer.
    pub fn write_to(&self, buf: &mut bytes::BytesMut) {
        buf.extend_from_slice(&self.to_wire());
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::new(0)
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID:{:04X} {}",
            self.id,
            if self.is_response() { "QR" } else { "Q" },
        )?;

        if self.is_authoritative() {
            write!(f, " AA")?;
        }
        if self.is_truncated() {
            write!(f, " TC")?;
        }
        if self.recursion_desired() {
            write!(f, " RD")?;
        }

        write!(
            f,
            " QD:{} AN:{} NS:{} AR:{}",
            self.qd_count, self.an_count, self.ns_count, self.ar_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_roundtrip() {
        let mut header = Header::query_with_id(0x1234);
        header.qd_count = 1;

        let wire = header.to_wire();
        let parsed = Header::parse(&wire).unwrap();

        assert_eq!(parsed.id, 0x1234);
        assert!(parsed.recursion_desired());
        assert!(!parsed.is_response());
        assert_eq!(parsed.qd_count, 1);
        assert_eq!(parsed.an_count, 0);
    }

    #[test]
    fn test_header_parse_too_short() {
        let result = Header::parse(&[0; 10]);
        assert!(matches!(result, Err(Error::BufferTooShort { .. })));
    }

    #[test]
    fn test_opcode_and_rcode_bits_masked() {
        // Opcode 2 (status) and rcode 3 (NXDOMAIN) set alongside QR|RD
        let mut wire = Header::query_with_id(7).to_wire();
        wire[2] |= 0x80 | 0x10; // QR + opcode bit
        wire[3] |= 0x03;

        let parsed = Header::parse(&wire).unwrap();
        assert!(parsed.is_response());
        assert!(parsed.recursion_desired());
        // Only defined flag bits survive
        assert_eq!(
            parsed.flags.bits() & !(HeaderFlags::all().bits()),
            0
        );
    }

    #[test]
    fn test_response_from_query() {
        let query = Header::query();
        let response = Header::response_from(&query);

        assert_eq!(query.id, response.id);
        assert!(!query.is_response());
        assert!(response.is_response());
        assert_eq!(query.recursion_desired(), response.recursion_desired());
    }

    #[test]
    fn test_header_display() {
        let header = Header::query_with_id(0xABCD);
        let display = header.to_string();
        assert!(display.contains("ABCD"));
        assert!(display.contains("RD"));
    }
}
