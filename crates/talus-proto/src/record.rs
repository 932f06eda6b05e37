//! DNS resource records.
//!
//! A resource record (RR) is the fundamental unit of DNS data: a name,
//! type, class, TTL, and record-specific data.

use crate::class::{Class, RecordClass};
use crate::error::{Error, Result};
use crate::name::{Name, NameParser};
use crate::rdata::{self, RData};
use crate::rtype::{RecordType, Type};
use crate::wire::WireReader;
use bytes::BytesMut;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// A DNS resource record.
///
/// # Wire Format
///
/// ```text
/// name (compressed-label sequence)
/// TYPE(16) CLASS(16) TTL(32) RDLENGTH(16)
/// RDATA (RDLENGTH bytes)
/// ```
///
/// When the RDATA embeds a domain name it may use compression and occupy
/// fewer physical bytes than `RDLENGTH` advertises; the record always
/// spans exactly `RDLENGTH` bytes of the section regardless.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// The owner name this record is for.
    name: Name,
    /// The record type.
    rtype: Type,
    /// The record class.
    rclass: Class,
    /// Time to live in seconds.
    ttl: u32,
    /// The record data.
    rdata: RData,
}

impl ResourceRecord {
    /// Creates a new resource record.
    pub fn new(name: Name, rtype: Type, rclass: Class, ttl: u32, rdata: RData) -> Self {
        Self {
            name,
            rtype,
            rclass,
            ttl,
            rdata,
        }
    }

    /// Creates an A record.
    pub fn a(name: Name, ttl: u32, addr: std::net::Ipv4Addr) -> Self {
        Self::new(
            name,
            Type::Known(RecordType::A),
            Class::Known(RecordClass::IN),
            ttl,
            RData::A(rdata::A::new(addr)),
        )
    }

    /// Creates an AAAA record.
    pub fn aaaa(name: Name, ttl: u32, addr: std::net::Ipv6Addr) -> Self {
        Self::new(
            name,
            Type::Known(RecordType::AAAA),
            Class::Known(RecordClass::IN),
            ttl,
            RData::Aaaa(rdata::Aaaa::new(addr)),
        )
    }

    /// Creates a CNAME record.
    pub fn cname(name: Name, ttl: u32, target: Name) -> Self {
        Self::new(
            name,
            Type::Known(RecordType::CNAME),
            Class::Known(RecordClass::IN),
            ttl,
            RData::Cname(rdata::Cname::new(target)),
        )
    }

    /// Creates an NS record.
    pub fn ns(name: Name, ttl: u32, nsdname: Name) -> Self {
        Self::new(
            name,
            Type::Known(RecordType::NS),
            Class::Known(RecordClass::IN),
            ttl,
            RData::Ns(rdata::Ns::new(nsdname)),
        )
    }

    /// Returns the owner name.
    #[inline]
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Returns the record type.
    #[inline]
    pub fn rtype(&self) -> Type {
        self.rtype
    }

    /// Returns the record type if known.
    #[inline]
    pub fn record_type(&self) -> Option<RecordType> {
        self.rtype.as_known()
    }

    /// Returns the record class.
    #[inline]
    pub fn rclass(&self) -> Class {
        self.rclass
    }

    /// Returns the TTL in seconds.
    #[inline]
    pub const fn ttl(&self) -> u32 {
        self.ttl
    }

    /// Returns the record data.
    #[inline]
    pub fn rdata(&self) -> &RData {
        &self.rdata
    }

    /// Returns true if this is a CNAME record.
    #[inline]
    pub fn is_cname(&self) -> bool {
        self.rtype.is_cname()
    }

    /// Marks an alias record as resolved to the given address.
    ///
    /// No-op for anything but a CNAME record.
    pub(crate) fn resolve_alias(&mut self, addr: IpAddr) {
        if let RData::Cname(cname) = &mut self.rdata {
            cname.resolve(addr);
        }
    }

    /// Parses a resource record from the full message buffer.
    ///
    /// Returns the record and the number of bytes consumed: the owner
    /// name's physical length, the 10 fixed bytes, and exactly `RDLENGTH`
    /// payload bytes, never the byte count an embedded compressed name
    /// happened to need.
    pub fn parse(data: &[u8], offset: usize) -> Result<(Self, usize)> {
        let parser = NameParser::new(data);
        let (name, name_len) = parser.parse_name(offset)?;

        let mut reader = WireReader::at(data, offset + name_len);
        let rtype_value = reader.read_u16()?;
        let rclass_value = reader.read_u16()?;
        let ttl = reader.read_u32()?;
        let rdlength = reader.read_u16()?;

        let rdata_start = reader.position();
        if rdata_start + rdlength as usize > data.len() {
            return Err(Error::buffer_too_short(
                rdata_start + rdlength as usize,
                data.len(),
            ));
        }

        let rtype = Type::from_u16(rtype_value);
        let rclass = Class::from_u16(rclass_value);

        let rdata = match rtype {
            Type::Known(known) => RData::parse(known, data, rdata_start, rdlength)?,
            Type::Unknown(value) => RData::Unknown(rdata::Unknown::new(
                value,
                &data[rdata_start..rdata_start + rdlength as usize],
            )),
        };

        let total_len = name_len + 10 + rdlength as usize;

        Ok((
            Self {
                name,
                rtype,
                rclass,
                ttl,
                rdata,
            },
            total_len,
        ))
    }

    /// Returns the wire format length.
    pub fn wire_len(&self) -> usize {
        self.name.wire_len() + 10 + self.rdata.wire_len()
    }

    /// Writes the resource record to wire format (uncompressed).
    pub fn write_to(&self, buf: &mut BytesMut) {
        self.name.write_wire(buf);
        buf.extend_from_slice(&self.rtype.to_u16().to_be_bytes());
        buf.extend_from_slice(&self.rclass.to_u16().to_be_bytes());
        buf.extend_from_slice(&self.ttl.to_be_bytes());

        let rdlength = self.rdata.wire_len() as u16;
        buf.extend_from_slice(&rdlength.to_be_bytes());
        self.rdata.write_to(buf);
    }

    /// Converts the record to wire format bytes.
    pub fn to_wire(&self) -> Vec<u8> {
        let mut buf = BytesMut::with_capacity(self.wire_len());
        self.write_to(&mut buf);
        buf.to_vec()
    }
}

impl fmt::Display for ResourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}",
            self.name, self.ttl, self.rclass, self.rtype, self.rdata
        )
    }
}

/// Parser for a resource record section, driven by the header count.
#[derive(Debug)]
pub struct RecordParser<'a> {
    /// The message data.
    data: &'a [u8],
    /// Current offset in the message.
    offset: usize,
    /// Number of records remaining.
    remaining: u16,
}

impl<'a> RecordParser<'a> {
    /// Creates a new record parser.
    #[inline]
    pub const fn new(data: &'a [u8], offset: usize, count: u16) -> Self {
        Self {
            data,
            offset,
            remaining: count,
        }
    }

    /// Returns the current offset.
    #[inline]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Parses the next record, or `None` once the declared count is done.
    ///
    /// A count that overruns the buffer surfaces here as a malformed
    /// message error rather than a silent short section.
    pub fn next(&mut self) -> Result<Option<ResourceRecord>> {
        if self.remaining == 0 {
            return Ok(None);
        }

        let (record, consumed) = ResourceRecord::parse(self.data, self.offset)?;
        self.offset += consumed;
        self.remaining -= 1;

        Ok(Some(record))
    }
}
