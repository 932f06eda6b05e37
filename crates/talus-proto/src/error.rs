//! DNS protocol error types.

use thiserror::Error;

/// Result type alias for DNS protocol operations.
pub type Result<T> = std::result::Result<T, Error>;

/// DNS protocol errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Buffer is too short to contain the expected data.
    #[error("buffer too short: expected at least {expected} bytes, got {actual}")]
    BufferTooShort {
        /// Expected minimum size.
        expected: usize,
        /// Actual buffer size.
        actual: usize,
    },

    /// Unexpected end of data while parsing.
    #[error("unexpected end of data at offset {offset}")]
    UnexpectedEof {
        /// Byte offset where EOF was encountered.
        offset: usize,
    },

    /// Invalid data encountered during parsing.
    #[error("invalid data at offset {offset}: {message}")]
    InvalidData {
        /// Byte offset of the invalid data.
        offset: usize,
        /// Description of the error.
        message: String,
    },

    /// Label exceeds maximum length of 63 bytes.
    #[error("label too long: {length} bytes exceeds maximum of 63")]
    LabelTooLong {
        /// Actual label length.
        length: usize,
    },

    /// Domain name exceeds maximum length of 255 bytes.
    #[error("name too long: {length} bytes exceeds maximum of 255")]
    NameTooLong {
        /// Actual name length in wire format.
        length: usize,
    },

    /// Invalid label character.
    #[error("invalid character '{character}' in label at position {position}")]
    InvalidLabelChar {
        /// The invalid character.
        character: char,
        /// Position in the label.
        position: usize,
    },

    /// A compression pointer that does not strictly decrease.
    ///
    /// Forward or self-referencing pointers would let a hostile message
    /// drive the name decoder in circles.
    #[error("invalid compression pointer at offset {offset}: points to {target}")]
    InvalidCompressionPointer {
        /// Offset of the pointer.
        offset: usize,
        /// Target offset the pointer references.
        target: usize,
    },

    /// Too many compression pointer jumps while decoding one name.
    #[error("too many compression pointer jumps (>{max_jumps})")]
    TooManyCompressionJumps {
        /// Maximum allowed jumps.
        max_jumps: usize,
    },

    /// RDATA length does not match what the record type requires.
    #[error("RDATA length mismatch for {rtype}: expected {expected}, got {actual}")]
    RDataLengthMismatch {
        /// Record type.
        rtype: String,
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },
}

impl Error {
    /// Creates a new `BufferTooShort` error.
    #[inline]
    pub fn buffer_too_short(expected: usize, actual: usize) -> Self {
        Self::BufferTooShort { expected, actual }
    }

    /// Creates a new `UnexpectedEof` error.
    #[inline]
    pub fn unexpected_eof(offset: usize) -> Self {
        Self::UnexpectedEof { offset }
    }

    /// Creates a new `InvalidData` error.
    #[inline]
    pub fn invalid_data(offset: usize, message: impl Into<String>) -> Self {
        Self::InvalidData {
            offset,
            message: message.into(),
        }
    }

    /// Returns true if this error indicates a malformed message.
    ///
    /// Malformed messages are a hard failure of the hop they arrived on;
    /// the resolver surfaces them instead of reinterpreting the buffer.
    #[inline]
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::BufferTooShort { .. }
                | Self::UnexpectedEof { .. }
                | Self::InvalidData { .. }
                | Self::InvalidCompressionPointer { .. }
                | Self::TooManyCompressionJumps { .. }
                | Self::RDataLengthMismatch { .. }
        )
    }

    /// Returns true if this error indicates an unencodable domain name.
    #[inline]
    pub fn is_encoding(&self) -> bool {
        matches!(
            self,
            Self::LabelTooLong { .. } | Self::NameTooLong { .. } | Self::InvalidLabelChar { .. }
        )
    }
}
