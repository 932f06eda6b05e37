//! DNS record types.
//!
//! The resolver speaks a closed set of record types; anything else is
//! carried opaquely as its numeric value, never rejected.

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;

/// DNS record type.
///
/// The closed set this resolver understands: address records, the
/// delegation record, and the alias record.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    IntoPrimitive,
    TryFromPrimitive,
    Serialize,
    Deserialize,
)]
#[repr(u16)]
pub enum RecordType {
    /// IPv4 address - RFC 1035
    A = 1,

    /// Authoritative name server - RFC 1035
    NS = 2,

    /// Canonical name (alias) - RFC 1035
    CNAME = 5,

    /// IPv6 address - RFC 3596
    AAAA = 28,
}

impl RecordType {
    /// Returns the numeric value of the record type.
    #[inline]
    pub const fn to_u16(self) -> u16 {
        self as u16
    }

    /// Creates a record type from its numeric value.
    #[inline]
    pub fn from_u16(value: u16) -> Option<Self> {
        Self::try_from(value).ok()
    }

    /// Maps a textual type to its enum value.
    ///
    /// Returns `None` for anything outside {A, AAAA, NS, CNAME}; callers
    /// must treat that as a usage error rather than defaulting.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "A" => Some(Self::A),
            "AAAA" => Some(Self::AAAA),
            "NS" => Some(Self::NS),
            "CNAME" => Some(Self::CNAME),
            _ => None,
        }
    }

    /// Returns the textual name of the record type.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::NS => "NS",
            Self::CNAME => "CNAME",
            Self::AAAA => "AAAA",
        }
    }

    /// Returns true if this is an address record type.
    #[inline]
    pub const fn is_address(self) -> bool {
        matches!(self, Self::A | Self::AAAA)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Default for RecordType {
    fn default() -> Self {
        Self::A
    }
}

/// A type value covering both the known set and arbitrary numeric values.
///
/// Unknown values survive a decode/encode round trip untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    /// A known, standard record type.
    Known(RecordType),
    /// An unknown type value (rendered `TYPE####` per RFC 3597).
    Unknown(u16),
}

impl Type {
    /// Creates a type from a u16 value.
    #[inline]
    pub fn from_u16(value: u16) -> Self {
        RecordType::from_u16(value)
            .map(Self::Known)
            .unwrap_or(Self::Unknown(value))
    }

    /// Returns the numeric value.
    #[inline]
    pub const fn to_u16(self) -> u16 {
        match self {
            Self::Known(t) => t.to_u16(),
            Self::Unknown(v) => v,
        }
    }

    /// Returns the standard type if known.
    #[inline]
    pub const fn as_known(self) -> Option<RecordType> {
        match self {
            Self::Known(t) => Some(t),
            Self::Unknown(_) => None,
        }
    }

    /// Returns true if this is an A record type.
    #[inline]
    pub const fn is_a(self) -> bool {
        matches!(self, Self::Known(RecordType::A))
    }

    /// Returns true if this is an AAAA record type.
    #[inline]
    pub const fn is_aaaa(self) -> bool {
        matches!(self, Self::Known(RecordType::AAAA))
    }

    /// Returns true if this is a CNAME record type.
    #[inline]
    pub const fn is_cname(self) -> bool {
        matches!(self, Self::Known(RecordType::CNAME))
    }

    /// Returns true if this is an NS record type.
    #[inline]
    pub const fn is_ns(self) -> bool {
        matches!(self, Self::Known(RecordType::NS))
    }
}

impl From<RecordType> for Type {
    fn from(t: RecordType) -> Self {
        Self::Known(t)
    }
}

impl From<u16> for Type {
    fn from(value: u16) -> Self {
        Self::from_u16(value)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(t) => write!(f, "{t}"),
            Self::Unknown(v) => write!(f, "TYPE{v}"),
        }
    }
}

impl Default for Type {
    fn default() -> Self {
        Self::Known(RecordType::A)
    }
}
