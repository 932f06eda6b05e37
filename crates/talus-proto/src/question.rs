//! DNS question section.
//!
//! Each question carries a domain name, a query type, and a query class.

use crate::class::{Class, RecordClass};
use crate::error::Result;
use crate::name::{Name, NameParser};
use crate::rtype::{RecordType, Type};
use crate::wire::WireReader;
use bytes::BytesMut;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A DNS question.
///
/// # Wire Format
///
/// ```text
/// QNAME (compressed-label sequence) QTYPE(16) QCLASS(16)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Question {
    /// The domain name being queried.
    pub qname: Name,

    /// The type of record being requested.
    pub qtype: Type,

    /// The class of the query (IN in practice).
    pub qclass: Class,
}

impl Question {
    /// Creates a new question.
    #[inline]
    pub fn new(qname: Name, qtype: RecordType, qclass: RecordClass) -> Self {
        Self {
            qname,
            qtype: Type::Known(qtype),
            qclass: Class::Known(qclass),
        }
    }

    /// Creates a question with generic type and class values.
    #[inline]
    pub fn new_generic(qname: Name, qtype: Type, qclass: Class) -> Self {
        Self {
            qname,
            qtype,
            qclass,
        }
    }

    /// Creates a question for an A record lookup.
    #[inline]
    pub fn a(name: Name) -> Self {
        Self::new(name, RecordType::A, RecordClass::IN)
    }

    /// Creates a question for an AAAA record lookup.
    #[inline]
    pub fn aaaa(name: Name) -> Self {
        Self::new(name, RecordType::AAAA, RecordClass::IN)
    }

    /// Creates a question for an NS record lookup.
    #[inline]
    pub fn ns(name: Name) -> Self {
        Self::new(name, RecordType::NS, RecordClass::IN)
    }

    /// Returns the record type if known.
    #[inline]
    pub fn record_type(&self) -> Option<RecordType> {
        self.qtype.as_known()
    }

    /// Parses a question from the full message buffer.
    ///
    /// Returns the question and the number of bytes consumed.
    pub fn parse(data: &[u8], offset: usize) -> Result<(Self, usize)> {
        let parser = NameParser::new(data);
        let (qname, name_len) = parser.parse_name(offset)?;

        let mut reader = WireReader::at(data, offset + name_len);
        let qtype_value = reader.read_u16()?;
        let qclass_value = reader.read_u16()?;

        Ok((
            Self {
                qname,
                qtype: Type::from_u16(qtype_value),
                qclass: Class::from_u16(qclass_value),
            },
            name_len + 4,
        ))
    }

    /// Returns the wire format length of this question.
    pub fn wire_len(&self) -> usize {
        self.qname.wire_len() + 4
    }

    /// Writes the question to wire format.
    pub fn write_to(&self, buf: &mut BytesMut) {
        self.qname.write_wire(buf);
        buf.extend_from_slice(&self.qtype.to_u16().to_be_bytes());
        buf.extend_from_slice(&self.qclass.to_u16().to_be_bytes());
    }

    /// Converts the question to wire format bytes.
    pub fn to_wire(&self) -> Vec<u8> {
        let mut buf = BytesMut::with_capacity(self.wire_len());
        self.write_to(&mut buf);
        buf.to_vec()
    }

    /// Returns true if this question matches another (name compared
    /// case-insensitively, type and class exactly).
    pub fn matches(&self, other: &Question) -> bool {
        self.qname == other.qname && self.qtype == other.qtype && self.qclass == other.qclass
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.qname, self.qclass, self.qtype)
    }
}

/// Parser for the question section, driven by the header count.
#[derive(Debug)]
pub struct QuestionParser<'a> {
    /// The message data.
    data: &'a [u8],
    /// Current offset in the message.
    offset: usize,
    /// Number of questions remaining.
    remaining: u16,
}

impl<'a> QuestionParser<'a> {
    /// Creates a new question parser.
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

    /// Parses the next question, or `None` once the declared count is done.
    pub fn next(&mut self) -> Result<Option<Question>> {
        if self.remaining == 0 {
            return Ok(None);
        }

        let (question, consumed) = Question::parse(self.data, self.offset)?;
        self.offset += consumed;
        self.remaining -= 1;

        Ok(Some(question))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_question_creation() {
        let name = Name::from_str("example.com").unwrap();
        let q = Question::a(name.clone());

        assert_eq!(q.qname, name);
        assert_eq!(q.qtype, Type::Known(RecordType::A));
        assert_eq!(q.qclass, Class::Known(RecordClass::IN));

        assert!(Question::ns(name.clone()).qtype.is_ns());
        assert!(Question::aaaa(name).qtype.is_aaaa());
    }

    #[test]
    fn test_question_roundtrip() {
        let name = Name::from_str("www.example.com").unwrap();
        let original = Question::aaaa(name);

        let wire = original.to_wire();
        let (parsed, consumed) = Question::parse(&wire, 0).unwrap();

        assert_eq!(consumed, wire.len());
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_question_unknown_qtype_passthrough() {
        let name = Name::from_str("example.com").unwrap();
        let original = Question::new_generic(name, Type::Unknown(99), Class::Known(RecordClass::IN));

        let wire = original.to_wire();
        let (parsed, _) = Question::parse(&wire, 0).unwrap();
        assert_eq!(parsed.qtype, Type::Unknown(99));
    }

    #[test]
    fn test_question_truncated() {
        let name = Name::from_str("example.com").unwrap();
        let wire = original_without_qclass(&name);
        assert!(Question::parse(&wire, 0).is_err());
    }

    fn original_without_qclass(name: &Name) -> Vec<u8> {
        let mut buf = BytesMut::new();
        name.write_wire(&mut buf);
        buf.extend_from_slice(&1u16.to_be_bytes());
        buf.to_vec()
    }

    #[test]
    fn test_question_matching() {
        let name = Name::from_str("example.com").unwrap();
        let q1 = Question::a(name.clone());
        let q2 = Question::a(Name::from_str("EXAMPLE.COM").unwrap());
        let q3 = Question::aaaa(name);

        assert!(q1.matches(&q2)); // case insensitive
        assert!(!q1.matches(&q3)); // different type
    }
}
