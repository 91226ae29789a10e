//! Block validation and payload byte-order detection
//!
//! Payload words may arrive with their bytes reversed, with their two 32-bit
//! halves exchanged, or both. The payload marker in the header tells us about
//! the bytes; the half-word order has to be guessed from content. Bits 31:28
//! of every timestamp-carrying word are always zero while the tag in bits
//! 63:62 is not, so the first word with a non-zero nibble in either place
//! settles the question for the rest of the stream.

use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::bit::BitField;
use crate::error::{Error, Result};
use crate::header::{BlockHeader, ByteOrder, HEADER_SIZE};
use crate::word::Word;

const HIGH_NIBBLE: u64 = 0xF000_0000_0000_0000;
const LOW_NIBBLE: u64 = 0x0000_0000_F000_0000;

/// How payload words must be rearranged before decoding
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct SwapMode {
    /// Detection has concluded; no further blocks need scanning
    pub known: bool,
    /// Reverse the eight bytes of each word
    pub endian: bool,
    /// Exchange the 32-bit halves of each word (after `endian`)
    pub words: bool,
}

impl SwapMode {
    #[inline]
    pub fn apply(self, raw: u64) -> u64 {
        let mut w = raw;
        if self.endian {
            w = w.swap_bytes();
        }
        if self.words {
            w = w.rotate_left(32);
        }
        return w;
    }
}

impl fmt::Display for SwapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match (self.known, self.endian, self.words) {
            (false, _, _) => "unknown byte order",
            (true, false, false) => "unswapped",
            (true, true, false) => "swapped endianness",
            (true, false, true) => "swapped pairs of 32-bit words",
            (true, true, true) => "swapped endianness and pairs of 32-bit words",
        };
        write!(f, "{}", s)
    }
}

#[inline]
fn read_word(chunk: &[u8]) -> u64 {
    return u64::from_ne_bytes([
        chunk[0], chunk[1], chunk[2], chunk[3], chunk[4], chunk[5], chunk[6], chunk[7],
    ]);
}

/// A validated view of one block: its header and its payload words.
#[derive(Clone, Debug)]
pub struct Block<'a> {
    pub index: usize,
    pub header: BlockHeader,
    payload: &'a [u8],
    swap: SwapMode,
}

impl<'a> Block<'a> {
    /// Number of 64-bit payload words
    pub fn len(&self) -> usize {
        return self.payload.len() / 8;
    }

    pub fn is_empty(&self) -> bool {
        return self.payload.is_empty();
    }

    /// The swap mode words of this block are read with
    pub fn swap(&self) -> SwapMode {
        return self.swap;
    }

    /// Word `n` in host order, or 0 when `n` is out of range
    pub fn word(&self, n: usize) -> u64 {
        if n >= self.len() {
            return 0;
        }
        return self.swap.apply(read_word(&self.payload[n * 8..n * 8 + 8]));
    }

    /// All payload words in host order, in stream order
    pub fn words(&self) -> impl Iterator<Item = u64> + 'a {
        let swap = self.swap;
        self.payload
            .chunks_exact(8)
            .map(move |c| swap.apply(read_word(c)))
    }

    /// All payload words, decoded
    pub fn decoded(&self) -> impl Iterator<Item = Word> + 'a {
        return self.words().map(Word::decode);
    }
}

impl fmt::Display for Block<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Block {} has {} 64-bit words - {}",
            self.header.sequence,
            self.len(),
            self.swap,
        )
    }
}

/// Validates blocks and carries the swap mode from one block to the next.
#[derive(Clone, Debug, Default)]
pub struct BlockDecoder {
    swap: SwapMode,
    /// Blocks decoded before the swap mode was known
    pub undetermined: u64,
}

impl BlockDecoder {
    pub fn new() -> BlockDecoder {
        BlockDecoder::default()
    }

    pub fn swap(&self) -> SwapMode {
        return self.swap;
    }

    /// Validate block number `index` and resolve its word order.
    pub fn decode<'a>(&mut self, index: usize, bytes: &'a [u8]) -> Result<Block<'a>> {
        let header = BlockHeader::from_bytes(bytes, index)?;
        if header.data_len % 8 != 0 {
            return Err(Error::MisalignedPayload {
                block: index,
                len: header.data_len,
            });
        }
        let available = bytes.len() - HEADER_SIZE;
        if header.data_len as usize > available {
            return Err(Error::PayloadOverrun {
                block: index,
                len: header.data_len,
                available,
            });
        }
        let payload = &bytes[HEADER_SIZE..HEADER_SIZE + header.data_len as usize];

        if !self.swap.known {
            if header.data_order == ByteOrder::Swapped {
                self.swap.endian = true;
            }
            self.detect(payload);
            if self.swap.known {
                debug!(block = index, swap = %self.swap, "resolved payload byte order");
            } else {
                self.undetermined += 1;
                warn!(block = index, "payload byte order still undetermined");
            }
        }

        Ok(Block {
            index,
            header,
            payload,
            swap: self.swap,
        })
    }

    fn detect(&mut self, payload: &[u8]) {
        for chunk in payload.chunks_exact(8) {
            let raw = read_word(chunk);
            let w = if self.swap.endian { raw.swap_bytes() } else { raw };
            if w.any(HIGH_NIBBLE) {
                self.swap.known = true;
                return;
            }
            if w.any(LOW_NIBBLE) {
                self.swap.known = true;
                self.swap.words = true;
                return;
            }
        }
    }
}
