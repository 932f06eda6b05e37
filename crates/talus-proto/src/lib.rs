//! # Talus DNS Protocol Library
//!
//! Wire format types and codec for the talus stub-to-recursive resolver.
//! This crate covers the subset of RFC 1035 the resolver actually speaks:
//! building queries, and decoding untrusted response buffers (compressed
//! names included) into structured records.
//!
//! ## Example
//!
//! ```rust,ignore
//! use talus_proto::{Message, Name, Question, RecordClass, RecordType};
//! use std::str::FromStr;
//!
//! // Build a query
//! let question = Question::a(Name::from_str("example.com")?);
//! let query = Message::query(question);
//! let wire = query.to_wire();
//!
//! // Decode a response
//! let response = Message::parse(&wire)?;
//! ```
//!
//! Decoding is hardened against hostile input: every read is bounds
//! checked, compression pointers must strictly decrease, and the number
//! of pointer jumps per name is capped.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod class;
pub mod error;
pub mod header;
pub mod message;
pub mod name;
pub mod question;
pub mod rdata;
pub mod record;
pub mod rtype;
pub mod wire;

// Re-exports for convenience
pub use class::{Class, RecordClass};
pub use error::{Error, Result};
pub use header::{Header, HeaderFlags};
pub use message::Message;
pub use name::Name;
pub use question::Question;
pub use rdata::RData;
pub use record::ResourceRecord;
pub use rtype::{RecordType, Type};

/// Maximum length of a DNS label (63 bytes per RFC 1035)
pub const MAX_LABEL_LENGTH: usize = 63;

/// Maximum length of a domain name in wire format (255 bytes per RFC 1035)
pub const MAX_NAME_LENGTH: usize = 255;

/// Receive buffer size for UDP responses; larger messages arrive truncated.
pub const MAX_UDP_PAYLOAD: usize = 4096;

/// DNS port (53)
pub const DNS_PORT: u16 = 53;
