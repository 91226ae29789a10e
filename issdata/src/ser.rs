//! Serialization: writing block streams and tab-separated hits

use std::io::Write;

use crate::error::Result;
use crate::event::Event;
use crate::header::{BlockHeader, ByteOrder, HEADER_SIZE};

/// Writes words into `EBYEDATA` blocks the way a given host would have.
///
/// Decoded data is the inverse: a stream written with any combination of
/// header order, payload byte swap and half-word swap decodes back to the
/// words that went in.
#[derive(Clone, Copy, Debug)]
pub struct StreamWriter {
    pub block_size: usize,
    pub stream: u16,
    pub header_order: ByteOrder,
    /// Reverse the bytes of each payload word, and say so in the header
    pub swap_endian: bool,
    /// Exchange the 32-bit halves of each payload word; nothing says so
    pub swap_words: bool,
}

impl StreamWriter {
    pub fn new(block_size: usize) -> StreamWriter {
        StreamWriter {
            block_size,
            stream: 1,
            header_order: ByteOrder::Native,
            swap_endian: false,
            swap_words: false,
        }
    }

    /// Payload words that fit in one block
    pub fn capacity(&self) -> usize {
        return (self.block_size - HEADER_SIZE) / 8;
    }

    /// One block holding `words`, zero padded to the block size.
    /// Words beyond the capacity are not written.
    pub fn block(&self, sequence: u32, words: &[u64]) -> Vec<u8> {
        let words = &words[..words.len().min(self.capacity())];
        let header = BlockHeader {
            sequence,
            stream: self.stream,
            tape: 1,
            header_order: self.header_order,
            data_order: if self.swap_endian {
                ByteOrder::Swapped
            } else {
                ByteOrder::Native
            },
            data_len: (words.len() * 8) as u32,
        };
        let mut buf = Vec::with_capacity(self.block_size);
        buf.extend_from_slice(&header.to_bytes());
        for &w in words {
            let mut raw = w;
            if self.swap_words {
                raw = raw.rotate_left(32);
            }
            if self.swap_endian {
                raw = raw.swap_bytes();
            }
            buf.extend_from_slice(&raw.to_ne_bytes());
        }
        buf.resize(self.block_size, 0);
        return buf;
    }

    /// As many blocks as `words` needs, numbered from 0
    pub fn stream(&self, words: &[u64]) -> Vec<u8> {
        let mut buf = Vec::new();
        for (i, chunk) in words.chunks(self.capacity()).enumerate() {
            buf.extend(self.block(i as u32, chunk));
        }
        return buf;
    }
}

/// Serialize the hits of one event as tab-separated values:
/// event number, trigger timestamp, module, channel, data kind, timestamp,
/// conversion and number of trace samples.
pub fn tsv(wtr: &mut csv::Writer<impl Write>, index: u64, event: &Event) -> Result<()> {
    let trigger = match event.trigger {
        Some(t) => t.to_string(),
        None => String::new(),
    };
    for hit in event.hits() {
        wtr.write_record(&[
            index.to_string(),
            trigger.clone(),
            hit.module.to_string(),
            hit.channel.to_string(),
            (hit.kind as u8).to_string(),
            hit.timestamp.to_string(),
            hit.conversion.to_string(),
            hit.samples().len().to_string(),
        ])?;
    }
    Ok(())
}
