//! The 24-byte `EBYEDATA` block header
//!
//! ```text
//! offset  size  field
//!      0     8  magic, always "EBYEDATA"
//!      8     4  sequence number within the file
//!     12     2  acquisition stream (1..=4)
//!     14     2  tape, always 1
//!     16     2  header endianness marker, a native 1
//!     18     2  payload endianness marker, a native 1
//!     20     4  payload length in bytes
//! ```
//!
//! Integers are in whatever byte order the writing host used. The header
//! marker tells us whether the header itself must be byte swapped; the
//! payload marker only seeds the payload swap detection in [`crate::block`].

use std::fmt;

use crate::error::{Error, Result};

pub const MAGIC: &[u8; 8] = b"EBYEDATA";
pub const HEADER_SIZE: usize = 24;

/// Byte order of a header or payload relative to this host
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ByteOrder {
    Native,
    Swapped,
}

impl ByteOrder {
    fn from_marker(marker: u16) -> ByteOrder {
        match marker {
            1 => ByteOrder::Native,
            _ => ByteOrder::Swapped,
        }
    }

    fn marker(self) -> u16 {
        match self {
            ByteOrder::Native => 1,
            ByteOrder::Swapped => 1u16.swap_bytes(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BlockHeader {
    pub sequence: u32,
    pub stream: u16,
    pub tape: u16,
    /// Byte order the header fields were written in
    pub header_order: ByteOrder,
    /// Byte order the payload marker claims for the data words
    pub data_order: ByteOrder,
    /// Payload length in bytes, already corrected for `header_order`
    pub data_len: u32,
}

/// True if `bytes` starts with the header magic
pub fn has_magic(bytes: &[u8]) -> bool {
    return bytes.len() >= MAGIC.len() && &bytes[..MAGIC.len()] == MAGIC;
}

fn u16_at(bytes: &[u8], at: usize) -> u16 {
    return u16::from_ne_bytes([bytes[at], bytes[at + 1]]);
}

fn u32_at(bytes: &[u8], at: usize) -> u32 {
    return u32::from_ne_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);
}

impl BlockHeader {
    /// Decode the header at the start of block number `block`.
    pub fn from_bytes(bytes: &[u8], block: usize) -> Result<Self> {
        if bytes.len() < HEADER_SIZE || !has_magic(bytes) {
            return Err(Error::InvalidHeader { block });
        }
        let header_order = ByteOrder::from_marker(u16_at(bytes, 16));
        let fix16 = |x: u16| match header_order {
            ByteOrder::Native => x,
            ByteOrder::Swapped => x.swap_bytes(),
        };
        let fix32 = |x: u32| match header_order {
            ByteOrder::Native => x,
            ByteOrder::Swapped => x.swap_bytes(),
        };
        Ok(BlockHeader {
            sequence: fix32(u32_at(bytes, 8)),
            stream: fix16(u16_at(bytes, 12)),
            tape: fix16(u16_at(bytes, 14)),
            header_order,
            // The payload marker is compared as read, before any header correction
            data_order: ByteOrder::from_marker(u16_at(bytes, 18)),
            data_len: fix32(u32_at(bytes, 20)),
        })
    }

    /// Encode the header as a host of `header_order` would have written it.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        let (sequence, stream, tape, data_len) = match self.header_order {
            ByteOrder::Native => (self.sequence, self.stream, self.tape, self.data_len),
            ByteOrder::Swapped => (
                self.sequence.swap_bytes(),
                self.stream.swap_bytes(),
                self.tape.swap_bytes(),
                self.data_len.swap_bytes(),
            ),
        };
        buf[0..8].copy_from_slice(MAGIC);
        buf[8..12].copy_from_slice(&sequence.to_ne_bytes());
        buf[12..14].copy_from_slice(&stream.to_ne_bytes());
        buf[14..16].copy_from_slice(&tape.to_ne_bytes());
        buf[16..18].copy_from_slice(&self.header_order.marker().to_ne_bytes());
        buf[18..20].copy_from_slice(&self.data_order.marker().to_ne_bytes());
        buf[20..24].copy_from_slice(&data_len.to_ne_bytes());
        buf
    }

    /// Number of whole 64-bit words in the payload
    pub fn word_count(&self) -> usize {
        return self.data_len as usize / 8;
    }
}

impl fmt::Display for BlockHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Block {} stream {} tape {} with {} payload bytes",
            self.sequence, self.stream, self.tape, self.data_len,
        )
    }
}
