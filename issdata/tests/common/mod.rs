#![allow(dead_code)]

use issdata::ser::StreamWriter;
use issdata::word::{Adc, DataKind, Info, Samples, TraceHeader};
use issdata::Hit;

pub const BLOCK_SIZE: usize = 256;

/// Extended timestamp info word
pub fn ext(module: u8, ext: u32, low: u32) -> u64 {
    return Info::extension(module, ext, low).to_raw();
}

pub fn adc(module: u8, channel: u8, kind: DataKind, conversion: u16, low: u32) -> u64 {
    return Adc { module, channel, kind, conversion, low_timestamp: low }.to_raw();
}

pub fn trace(module: u8, channel: u8, samples: u16, low: u32) -> u64 {
    return TraceHeader { module, channel, samples, low_timestamp: low }.to_raw();
}

pub fn samples(s: [u16; 4]) -> u64 {
    return Samples(s).to_raw();
}

pub fn hit(timestamp: u64) -> Hit {
    return hit_conv(timestamp, 0);
}

pub fn hit_conv(timestamp: u64, conversion: u16) -> Hit {
    Hit {
        module: 1,
        channel: 0,
        kind: DataKind::QLong,
        timestamp,
        conversion,
        trace: None,
    }
}

/// Blocks holding `words`, followed by one empty block so the block size
/// can always be determined
pub fn stream(writer: &StreamWriter, words: &[u64]) -> Vec<u8> {
    let mut bytes = writer.stream(words);
    let n = (bytes.len() / writer.block_size) as u32;
    bytes.extend(writer.block(n, &[]));
    return bytes;
}

/// Two triggers around two hits, then one more hit
pub fn triggered_words() -> Vec<u64> {
    vec![
        ext(63, 1, 0x10),
        ext(1, 2, 0x0),
        adc(1, 0, DataKind::QLong, 100, 0x30),
        adc(1, 1, DataKind::QShort, 200, 0x20),
        ext(63, 1, 0x1000),
        adc(1, 0, DataKind::QLong, 300, 0x40),
    ]
}
