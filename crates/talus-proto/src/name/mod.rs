//! DNS domain name representation and operations.
//!
//! A domain name is a sequence of labels, each up to 63 bytes, whose wire
//! encoding (length-prefixed labels plus the terminating root label) is at
//! most 255 bytes. Comparison is ASCII case-insensitive per RFC 1035, so a
//! name round-trips losslessly through the wire except for letter case.

mod label;
mod parse;

pub use label::{Label, LabelIter};
pub use parse::NameParser;

use crate::error::{Error, Result};
use crate::{MAX_LABEL_LENGTH, MAX_NAME_LENGTH};
use bytes::BytesMut;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A DNS domain name.
///
/// Stored in uncompressed wire format: each label prefixed by its length
/// byte, terminated by a zero-length root label. `www.example.com` is
///
/// ```text
/// 03 'w' 'w' 'w' 07 'e' 'x' 'a' 'm' 'p' 'l' 'e' 03 'c' 'o' 'm' 00
/// ```
///
/// Compression pointers never appear in a stored name; they are resolved
/// during parsing by [`NameParser`].
///
/// # Example
///
/// ```rust
/// use talus_proto::name::Name;
/// use std::str::FromStr;
///
/// let name = Name::from_str("www.example.com").unwrap();
/// assert_eq!(name.label_count(), 4); // www, example, com, root
///
/// // Case-insensitive comparison
/// assert_eq!(Name::from_str("WWW.EXAMPLE.COM").unwrap(), name);
/// ```
#[derive(Clone)]
pub struct Name {
    /// Uncompressed wire form. Empty for the root name.
    wire: SmallVec<[u8; 64]>,
    /// Number of labels (including root).
    label_count: u8,
}

impl Name {
    /// Creates the root domain name.
    #[inline]
    pub const fn root() -> Self {
        Self {
            wire: SmallVec::new_const(),
            label_count: 1,
        }
    }

    /// Used by the parser once wire bytes have been validated.
    pub(super) fn from_raw_parts(wire: SmallVec<[u8; 64]>, label_count: u8) -> Self {
        Self { wire, label_count }
    }

    /// Creates a domain name from uncompressed wire bytes, copying them.
    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        let label_count = Self::validate_wire(slice)?;
        Ok(Self {
            wire: SmallVec::from_slice(slice),
            label_count,
        })
    }

    /// Validates wire format and returns the label count.
    fn validate_wire(bytes: &[u8]) -> Result<u8> {
        if bytes.is_empty() {
            // Just the implicit root
            return Ok(1);
        }

        let mut pos = 0;
        let mut labels = 0u8;
        let mut total_len = 0usize;

        while pos < bytes.len() {
            let len = bytes[pos] as usize;

            if len == 0 {
                // Root label terminates the name
                labels += 1;
                break;
            }

            // Pointers are a parse-time construct only
            if len >= 0xC0 {
                return Err(Error::invalid_data(
                    pos,
                    "compression pointer in stored name",
                ));
            }

            if len > MAX_LABEL_LENGTH {
                return Err(Error::LabelTooLong { length: len });
            }

            total_len += 1 + len;
            if total_len > MAX_NAME_LENGTH {
                return Err(Error::NameTooLong { length: total_len });
            }

            pos += 1 + len;
            labels += 1;

            if pos > bytes.len() {
                return Err(Error::UnexpectedEof { offset: pos });
            }
        }

        Ok(labels)
    }

    /// Returns the wire format representation.
    #[inline]
    pub fn as_wire(&self) -> &[u8] {
        &self.wire
    }

    /// Returns the wire format length (including the terminating zero).
    #[inline]
    pub fn wire_len(&self) -> usize {
        self.wire.len().max(1) // root is stored empty but encodes as one byte
    }

    /// Returns the number of labels in the name (including root).
    #[inline]
    pub const fn label_count(&self) -> usize {
        self.label_count as usize
    }

    /// Returns true if this is the root domain.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.wire.is_empty() || (self.wire.len() == 1 && self.wire[0] == 0)
    }

    /// Returns an iterator over the labels in the name.
    #[inline]
    pub fn labels(&self) -> LabelIter<'_> {
        LabelIter::new(self.as_wire())
    }

    /// Writes the name in wire format to a buffer.
    pub fn write_wire(&self, buf: &mut BytesMut) {
        if self.wire.is_empty() {
            buf.extend_from_slice(&[0]);
        } else {
            buf.extend_from_slice(&self.wire);
        }
    }

    /// Converts to the dotted string representation (no trailing dot for
    /// non-root names; the root renders as `.`).
    pub fn to_dotted(&self) -> CompactString {
        let mut result = CompactString::new("");

        for label in self.labels() {
            if !label.is_root() {
                if !result.is_empty() {
                    result.push('.');
                }
                result.push_str(label.as_str_lossy().as_ref());
            }
        }

        if result.is_empty() {
            result.push('.');
        }

        result
    }
}

impl FromStr for Name {
    type Err = Error;

    /// Parses a domain name from dotted text (e.g. `www.example.com`).
    /// A trailing dot is accepted and implied when absent.
    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() || s == "." {
            return Ok(Self::root());
        }

        let s = s.strip_suffix('.').unwrap_or(s);

        let mut wire = SmallVec::<[u8; 64]>::new();
        let mut label_count = 0u8;

        for part in s.split('.') {
            if part.is_empty() {
                return Err(Error::invalid_data(0, "empty label"));
            }
            if part.len() > MAX_LABEL_LENGTH {
                return Err(Error::LabelTooLong { length: part.len() });
            }

            // Hostname characters plus underscore (service labels) and
            // asterisk (wildcards)
            for (i, c) in part.chars().enumerate() {
                if !c.is_ascii_alphanumeric() && c != '-' && c != '_' && c != '*' {
                    return Err(Error::InvalidLabelChar {
                        character: c,
                        position: i,
                    });
                }
            }

            wire.push(part.len() as u8);
            wire.extend_from_slice(part.as_bytes());
            label_count += 1;
        }

        wire.push(0);
        label_count += 1;

        if wire.len() > MAX_NAME_LENGTH {
            return Err(Error::NameTooLong { length: wire.len() });
        }

        Ok(Self { wire, label_count })
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_dotted())
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name(\"{}\")", self)
    }
}

impl PartialEq for Name {
    /// Case-insensitive comparison per DNS semantics.
    fn eq(&self, other: &Self) -> bool {
        if self.label_count != other.label_count {
            return false;
        }

        self.labels()
            .zip(other.labels())
            .all(|(a, b)| a.eq_ignore_ascii_case(&b))
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for label in self.labels() {
            let lower: SmallVec<[u8; 64]> = label
                .as_bytes()
                .iter()
                .map(|b| b.to_ascii_lowercase())
                .collect();
            lower.hash(state);
        }
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::root()
    }
}

impl Serialize for Name {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_dotted())
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}
