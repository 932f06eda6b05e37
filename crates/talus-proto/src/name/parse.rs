//! DNS name parsing from wire format with compression support.
//!
//! Handles domain names as they appear inside a message, including
//! compression pointers (RFC 1035 Section 4.1.4). Decoding is an explicit
//! bounded loop: a pointer must reference an earlier offset and the number
//! of jumps per name is capped, so a crafted message cannot drive the
//! decoder in circles.

use super::Name;
use crate::MAX_NAME_LENGTH;
use crate::error::{Error, Result};
use smallvec::SmallVec;

/// Maximum number of compression pointer jumps while decoding one name.
pub const MAX_POINTER_JUMPS: usize = 32;

/// Parser for reading domain names from DNS wire format.
///
/// Holds the complete message buffer so that compression pointers can be
/// resolved against earlier offsets.
#[derive(Debug, Clone)]
pub struct NameParser<'a> {
    /// The complete message buffer.
    message: &'a [u8],
}

impl<'a> NameParser<'a> {
    /// Creates a new name parser over the given message buffer.
    #[inline]
    pub const fn new(message: &'a [u8]) -> Self {
        Self { message }
    }

    /// Parses a domain name starting at the given offset.
    ///
    /// Returns the parsed name and the number of bytes consumed at the
    /// starting position. Once a compression pointer has been followed,
    /// consumption stops growing: the pointer itself is two bytes and the
    /// referenced tail lives elsewhere in the message.
    pub fn parse_name(&self, offset: usize) -> Result<(Name, usize)> {
        let mut wire = SmallVec::<[u8; 64]>::new();
        let mut consumed = 0;
        let mut pos = offset;
        let mut jumps = 0;
        let mut jumped = false;
        let mut label_count = 0u8;

        loop {
            if pos >= self.message.len() {
                return Err(Error::UnexpectedEof { offset: pos });
            }

            let len_byte = self.message[pos];

            // Top two bits set: compression pointer
            if len_byte >= 0xC0 {
                if pos + 1 >= self.message.len() {
                    return Err(Error::UnexpectedEof { offset: pos + 1 });
                }

                let target =
                    u16::from_be_bytes([len_byte & 0x3F, self.message[pos + 1]]) as usize;

                // A pointer must strictly decrease; forward or
                // self-referencing targets would loop
                if target >= pos {
                    return Err(Error::InvalidCompressionPointer {
                        offset: pos,
                        target,
                    });
                }

                if !jumped {
                    consumed = pos - offset + 2;
                    jumped = true;
                }

                jumps += 1;
                if jumps > MAX_POINTER_JUMPS {
                    return Err(Error::TooManyCompressionJumps {
                        max_jumps: MAX_POINTER_JUMPS,
                    });
                }

                pos = target;
                continue;
            }

            // 0x40 and 0x80 label types are reserved
            if len_byte >= 0x40 {
                return Err(Error::invalid_data(
                    pos,
                    format!("invalid label type 0x{:02X}", len_byte),
                ));
            }

            let len = len_byte as usize;

            // Root label terminates the name
            if len == 0 {
                wire.push(0);
                label_count += 1;

                if !jumped {
                    consumed = pos - offset + 1;
                }
                break;
            }

            if pos + 1 + len > self.message.len() {
                return Err(Error::UnexpectedEof {
                    offset: pos + 1 + len,
                });
            }

            if wire.len() + 1 + len > MAX_NAME_LENGTH {
                return Err(Error::NameTooLong {
                    length: wire.len() + 1 + len,
                });
            }

            wire.push(len as u8);
            wire.extend_from_slice(&self.message[pos + 1..pos + 1 + len]);
            label_count += 1;

            pos += 1 + len;
        }

        Ok((Name::from_raw_parts(wire, label_count), consumed))
    }
}
