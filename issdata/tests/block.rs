mod common;

use common::*;
use issdata::block::{BlockDecoder, SwapMode};
use issdata::header::ByteOrder;
use issdata::ser::StreamWriter;
use issdata::word::DataKind;
use issdata::{Error, Word};

fn writers() -> Vec<StreamWriter> {
    let mut all = Vec::new();
    for header_order in [ByteOrder::Native, ByteOrder::Swapped] {
        for swap_endian in [false, true] {
            for swap_words in [false, true] {
                let mut w = StreamWriter::new(BLOCK_SIZE);
                w.header_order = header_order;
                w.swap_endian = swap_endian;
                w.swap_words = swap_words;
                all.push(w);
            }
        }
    }
    all
}

/// However a block was written, its words read back unchanged
#[test]
fn swap_detection_is_transparent() {
    let words = triggered_words();
    for writer in writers() {
        let bytes = writer.block(0, &words);
        let mut decoder = BlockDecoder::new();
        let block = decoder.decode(0, &bytes).unwrap();
        assert_eq!(words, block.words().collect::<Vec<_>>());
        assert_eq!(words.len(), block.len());
        assert_eq!(
            SwapMode {
                known: true,
                endian: writer.swap_endian,
                words: writer.swap_words,
            },
            block.swap()
        );
        assert_eq!(0, decoder.undetermined);
    }
}

#[test]
fn undetermined_until_resolved() {
    let mut writer = StreamWriter::new(BLOCK_SIZE);
    writer.swap_words = true;
    let first = writer.block(0, &[0, 0]);
    let second = writer.block(1, &triggered_words());
    let third = writer.block(2, &[ext(63, 3, 0)]);

    let mut decoder = BlockDecoder::new();
    let block = decoder.decode(0, &first).unwrap();
    assert!(!block.swap().known);
    assert_eq!(0, block.word(0));
    assert_eq!(1, decoder.undetermined);

    let block = decoder.decode(1, &second).unwrap();
    assert!(block.swap().known);
    assert!(block.swap().words);
    assert_eq!(triggered_words()[0], block.word(0));

    // Carried over, not detected again
    let block = decoder.decode(2, &third).unwrap();
    assert_eq!(decoder.swap(), block.swap());
    assert_eq!(ext(63, 3, 0), block.word(0));
    assert_eq!(1, decoder.undetermined);
}

#[test]
fn decoded_words() {
    let mut writer = StreamWriter::new(BLOCK_SIZE);
    writer.swap_endian = true;
    let bytes = writer.block(0, &triggered_words());
    let block = BlockDecoder::new().decode(0, &bytes).unwrap();
    let words: Vec<Word> = block.decoded().collect();
    assert_eq!(6, words.len());
    assert_eq!(Word::decode(ext(63, 1, 0x10)), words[0]);
    assert_eq!(63, words[0].module());
    assert!(words[2].is_kind(DataKind::QLong));
    assert_eq!(100, words[2].conversion());
    assert!(words[3].is_kind(DataKind::QShort));
}

#[test]
fn word_out_of_range_is_zero() {
    let bytes = StreamWriter::new(BLOCK_SIZE).block(0, &[ext(63, 1, 1)]);
    let block = BlockDecoder::new().decode(0, &bytes).unwrap();
    assert_eq!(ext(63, 1, 1), block.word(0));
    assert_eq!(0, block.word(1));
    assert_eq!(0, block.word(usize::MAX));
}

#[test]
fn empty_block() {
    let bytes = StreamWriter::new(BLOCK_SIZE).block(4, &[]);
    let block = BlockDecoder::new().decode(0, &bytes).unwrap();
    assert!(block.is_empty());
    assert_eq!(0, block.words().count());
    assert_eq!(4, block.header.sequence);
}

fn with_data_len(mut bytes: Vec<u8>, len: u32) -> Vec<u8> {
    bytes[20..24].copy_from_slice(&len.to_ne_bytes());
    bytes
}

#[test]
fn misaligned_payload() {
    let bytes = with_data_len(StreamWriter::new(BLOCK_SIZE).block(0, &[1, 2]), 12);
    assert!(matches!(
        BlockDecoder::new().decode(3, &bytes),
        Err(Error::MisalignedPayload { block: 3, len: 12 })
    ));
}

#[test]
fn payload_overrun() {
    let bytes = with_data_len(StreamWriter::new(BLOCK_SIZE).block(0, &[1, 2]), 800);
    assert!(matches!(
        BlockDecoder::new().decode(0, &bytes),
        Err(Error::PayloadOverrun { block: 0, len: 800, available: 232 })
    ));
}

#[test]
fn display() {
    let mode = SwapMode { known: true, endian: true, words: false };
    assert_eq!("swapped endianness", mode.to_string());
    assert_eq!("unknown byte order", SwapMode::default().to_string());

    let bytes = StreamWriter::new(BLOCK_SIZE).block(9, &triggered_words());
    let block = BlockDecoder::new().decode(0, &bytes).unwrap();
    assert_eq!("Block 9 has 6 64-bit words - unswapped", block.to_string());
}
