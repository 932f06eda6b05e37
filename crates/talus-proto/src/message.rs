//! DNS message representation.
//!
//! A message is a header followed by four sections: questions, answers,
//! authority records, and additional records. Decoding is driven entirely
//! by the header counts; after the answer section is decoded, CNAME chains
//! inside it are resolved in place.

use crate::error::{Error, Result};
use crate::header::{HEADER_SIZE, Header};
use crate::question::{Question, QuestionParser};
use crate::rdata::RData;
use crate::record::{RecordParser, ResourceRecord};
use bytes::{Bytes, BytesMut};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// A complete DNS message.
///
/// A decoded message owns its questions and record lists; nothing
/// outlives the message it was parsed from, and nothing persists across
/// round trips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// The message header.
    header: Header,
    /// The question section.
    questions: Vec<Question>,
    /// The answer section.
    answers: Vec<ResourceRecord>,
    /// The authority section.
    authority: Vec<ResourceRecord>,
    /// The additional section.
    additional: Vec<ResourceRecord>,
}

impl Message {
    /// Creates a new empty message with the given header.
    pub fn new(header: Header) -> Self {
        Self {
            header,
            questions: Vec::new(),
            answers: Vec::new(),
            authority: Vec::new(),
            additional: Vec::new(),
        }
    }

    /// Creates a query message with a random transaction id, recursion
    /// desired, and the given question.
    pub fn query(question: Question) -> Self {
        Self {
            header: Header::query(),
            questions: vec![question],
            answers: Vec::new(),
            authority: Vec::new(),
            additional: Vec::new(),
        }
    }

    /// Creates a query message with an explicit transaction id.
    pub fn query_with_id(question: Question, id: u16) -> Self {
        Self {
            header: Header::query_with_id(id),
            questions: vec![question],
            answers: Vec::new(),
            authority: Vec::new(),
            additional: Vec::new(),
        }
    }

    /// Creates a response skeleton echoing a query's id, RD flag, and
    /// question section.
    pub fn response_from(query: &Message) -> Self {
        let mut header = Header::response_from(&query.header);
        header.qd_count = query.questions.len() as u16;

        Self {
            header,
            questions: query.questions.clone(),
            answers: Vec::new(),
            authority: Vec::new(),
            additional: Vec::new(),
        }
    }

    /// Returns the message header.
    #[inline]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Returns the message id.
    #[inline]
    pub fn id(&self) -> u16 {
        self.header.id
    }

    /// Returns the question section.
    #[inline]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Returns the first question if present.
    #[inline]
    pub fn question(&self) -> Option<&Question> {
        self.questions.first()
    }

    /// Returns the answer section.
    #[inline]
    pub fn answers(&self) -> &[ResourceRecord] {
        &self.answers
    }

    /// Returns the authority section.
    #[inline]
    pub fn authority(&self) -> &[ResourceRecord] {
        &self.authority
    }

    /// Returns the additional section.
    #[inline]
    pub fn additional(&self) -> &[ResourceRecord] {
        &self.additional
    }

    /// Adds an answer record, keeping the header count in sync.
    pub fn add_answer(&mut self, record: ResourceRecord) {
        self.answers.push(record);
        self.header.an_count = self.answers.len() as u16;
    }

    /// Adds an authority record, keeping the header count in sync.
    pub fn add_authority(&mut self, record: ResourceRecord) {
        self.authority.push(record);
        self.header.ns_count = self.authority.len() as u16;
    }

    /// Adds an additional record, keeping the header count in sync.
    pub fn add_additional(&mut self, record: ResourceRecord) {
        self.additional.push(record);
        self.header.ar_count = self.additional.len() as u16;
    }

    /// Returns true if this response is a referral: no answers, but NS
    /// records in the authority section.
    pub fn is_referral(&self) -> bool {
        self.answers.is_empty()
            && self
                .authority
                .iter()
                .any(|r| r.rtype().is_ns())
    }

    /// Returns A record addresses from the answers.
    pub fn a_records(&self) -> impl Iterator<Item = Ipv4Addr> + '_ {
        self.answers.iter().filter_map(|r| r.rdata().as_a())
    }

    /// Returns AAAA record addresses from the answers.
    pub fn aaaa_records(&self) -> impl Iterator<Item = Ipv6Addr> + '_ {
        self.answers.iter().filter_map(|r| r.rdata().as_aaaa())
    }

    /// Parses a DNS message from wire format.
    ///
    /// Every section length comes from the header; a count that overruns
    /// the buffer is a malformed-message error. CNAME chains in the
    /// answer section are resolved before the message is returned.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(Error::buffer_too_short(HEADER_SIZE, data.len()));
        }

        let header = Header::parse(data)?;

        let mut questions = Vec::with_capacity(header.qd_count as usize);
        let mut answers = Vec::with_capacity(header.an_count as usize);
        let mut authority = Vec::with_capacity(header.ns_count as usize);
        let mut additional = Vec::with_capacity(header.ar_count as usize);

        let mut q_parser = QuestionParser::new(data, HEADER_SIZE, header.qd_count);
        while let Some(q) = q_parser.next()? {
            questions.push(q);
        }

        let mut an_parser = RecordParser::new(data, q_parser.offset(), header.an_count);
        while let Some(r) = an_parser.next()? {
            answers.push(r);
        }

        let mut ns_parser = RecordParser::new(data, an_parser.offset(), header.ns_count);
        while let Some(r) = ns_parser.next()? {
            authority.push(r);
        }

        let mut ar_parser = RecordParser::new(data, ns_parser.offset(), header.ar_count);
        while let Some(r) = ar_parser.next()? {
            additional.push(r);
        }

        resolve_aliases(&mut answers);

        Ok(Self {
            header,
            questions,
            answers,
            authority,
            additional,
        })
    }

    /// Returns the wire format length of this message.
    pub fn wire_len(&self) -> usize {
        let mut len = HEADER_SIZE;

        for q in &self.questions {
            len += q.wire_len();
        }
        for r in &self.answers {
            len += r.wire_len();
        }
        for r in &self.authority {
            len += r.wire_len();
        }
        for r in &self.additional {
            len += r.wire_len();
        }

        len
    }

    /// Writes the message to wire format.
    pub fn write_to(&self, buf: &mut BytesMut) {
        // Counts always reflect the actual section contents
        let mut header = self.header.clone();
        header.qd_count = self.questions.len() as u16;
        header.an_count = self.answers.len() as u16;
        header.ns_count = self.authority.len() as u16;
        header.ar_count = self.additional.len() as u16;

        header.write_to(buf);

        for q in &self.questions {
            q.write_to(buf);
        }
        for r in &self.answers {
            r.write_to(buf);
        }
        for r in &self.authority {
            r.write_to(buf);
        }
        for r in &self.additional {
            r.write_to(buf);
        }
    }

    /// Converts the message to wire format bytes.
    pub fn to_wire(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.wire_len());
        self.write_to(&mut buf);
        buf.freeze()
    }
}

impl Default for Message {
    fn default() -> Self {
        Self::new(Header::default())
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, ";; ->>HEADER<<- {}", self.header)?;

        writeln!(f, "\n;; QUESTION SECTION:")?;
        for q in &self.questions {
            writeln!(f, ";{}", q)?;
        }

        if !self.answers.is_empty() {
            writeln!(f, "\n;; ANSWER SECTION:")?;
            for r in &self.answers {
                writeln!(f, "{}", r)?;
            }
        }

        if !self.authority.is_empty() {
            writeln!(f, "\n;; AUTHORITY SECTION:")?;
            for r in &self.authority {
                writeln!(f, "{}", r)?;
            }
        }

        if !self.additional.is_empty() {
            writeln!(f, "\n;; ADDITIONAL SECTION:")?;
            for r in &self.additional {
                writeln!(f, "{}", r)?;
            }
        }

        Ok(())
    }
}

/// Resolves CNAME chains within one answer section, in place.
///
/// For every unresolved CNAME whose target equals the owner name of some
/// other answer record, the CNAME takes that record's resolved value.
/// Chains resolve transitively; the pass count is bounded by the section
/// length, so a crafted alias cycle terminates with the cycle members
/// simply left unresolved.
fn resolve_aliases(answers: &mut [ResourceRecord]) {
    for _ in 0..answers.len() {
        let mut changed = false;

        for i in 0..answers.len() {
            let target = match answers[i].rdata() {
                RData::Cname(c) if c.resolved().is_none() => c.target().clone(),
                _ => continue,
            };

            let resolved: Option<IpAddr> = answers
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .find_map(|(_, rr)| {
                    if rr.name() != &target {
                        return None;
                    }
                    rr.rdata().address()
                });

            if let Some(addr) = resolved {
                answers[i].resolve_alias(addr);
                changed = true;
            }
        }

        if !changed {
            break;
        }
    }
}
