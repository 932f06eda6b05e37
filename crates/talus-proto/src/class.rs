//! DNS record classes.
//!
//! Only the Internet class carries meaning for this resolver; other
//! numeric values pass through opaquely.

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;

/// DNS record class.
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
pub enum RecordClass {
    /// Internet - RFC 1035
    IN = 1,
}

impl RecordClass {
    /// Returns the numeric value of the class.
    #[inline]
    pub const fn to_u16(self) -> u16 {
        self as u16
    }

    /// Creates a class from its numeric value.
    #[inline]
    pub fn from_u16(value: u16) -> Option<Self> {
        Self::try_from(value).ok()
    }

    /// Maps a textual class to its enum value; `None` outside {IN}.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "IN" => Some(Self::IN),
            _ => None,
        }
    }

    /// Returns the textual name of the class.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::IN => "IN",
        }
    }
}

impl fmt::Display for RecordClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Default for RecordClass {
    fn default() -> Self {
        Self::IN
    }
}

/// A class value covering both the known set and arbitrary numeric values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Class {
    /// A known, standard class.
    Known(RecordClass),
    /// An unknown class value.
    Unknown(u16),
}

impl Class {
    /// Creates a class from a u16 value.
    #[inline]
    pub fn from_u16(value: u16) -> Self {
        RecordClass::from_u16(value)
            .map(Self::Known)
            .unwrap_or(Self::Unknown(value))
    }

    /// Returns the numeric value.
    #[inline]
    pub const fn to_u16(self) -> u16 {
        match self {
            Self::Known(c) => c.to_u16(),
            Self::Unknown(v) => v,
        }
    }

    /// Returns the standard class if known.
    #[inline]
    pub const fn as_known(self) -> Option<RecordClass> {
        match self {
            Self::Known(c) => Some(c),
            Self::Unknown(_) => None,
        }
    }

    /// Returns true if this is the Internet class.
    #[inline]
    pub const fn is_internet(self) -> bool {
        matches!(self, Self::Known(RecordClass::IN))
    }
}

impl From<RecordClass> for Class {
    fn from(c: RecordClass) -> Self {
        Self::Known(c)
    }
}

impl From<u16> for Class {
    fn from(value: u16) -> Self {
        Self::from_u16(value)
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(c) => write!(f, "{c}"),
            Self::Unknown(v) => write!(f, "CLASS{v}"),
        }
    }
}

impl Default for Class {
    fn default() -> Self {
        Self::Known(RecordClass::IN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_values() {
        assert_eq!(RecordClass::IN.to_u16(), 1);
        assert_eq!(RecordClass::from_u16(1), Some(RecordClass::IN));
        assert_eq!(RecordClass::from_u16(3), None);
    }

    #[test]
    fn test_class_text_mapping() {
        assert_eq!(RecordClass::from_name("IN"), Some(RecordClass::IN));
        assert_eq!(RecordClass::from_name("CH"), None);
        assert_eq!(RecordClass::from_name("in"), None);
    }

    #[test]
    fn test_generic_class_passthrough() {
        let c = Class::from_u16(1);
        assert!(c.is_internet());

        let c = Class::from_u16(254);
        assert!(!c.is_internet());
        assert_eq!(c.to_u16(), 254);
        assert_eq!(c.to_string(), "CLASS254");
    }
}
