use issdata::word::{Adc, DataKind, Info, InfoCode, Samples, Tag, TraceHeader};
use issdata::Word;

#[test]
fn tags() {
    assert_eq!(Tag::Sample, Tag::of(0));
    assert_eq!(Tag::TraceHeader, Tag::of(1 << 62));
    assert_eq!(Tag::Info, Tag::of(2 << 62));
    assert_eq!(Tag::Adc, Tag::of(3 << 62));
}

#[test]
fn info_fields() {
    let max = Info {
        module: 63,
        code: InfoCode::Timestamp,
        field: 0xF_FFFF,
        low_timestamp: 0x0FFF_FFFF,
    };
    assert_eq!(0xBF4F_FFFF_0FFF_FFFF, max.to_raw());
    assert_eq!(Word::Info(max), Word::decode(max.to_raw()));

    let zero = Info {
        module: 0,
        code: InfoCode::Undefined,
        field: 0,
        low_timestamp: 0,
    };
    assert_eq!(0x8000_0000_0000_0000, zero.to_raw());
    assert_eq!(Word::Info(zero), Word::decode(zero.to_raw()));

    let w = Word::decode(Info::extension(5, 0x12345, 0x0ABC_DEF0).to_raw());
    assert_eq!(5, w.module());
    assert_eq!(0x12345, w.info_field());
    assert_eq!(0x0ABC_DEF0, w.low_timestamp());
    assert_eq!(InfoCode::Timestamp, w.info_code());
    assert!(w.has_extended_timestamp());
}

#[test]
fn adc_fields() {
    let max = Adc {
        module: 31,
        channel: 63,
        kind: DataKind::FineTiming,
        conversion: 0xFFFF,
        low_timestamp: 0x0FFF_FFFF,
    };
    assert_eq!(0xDFFF_FFFF_0FFF_FFFF, max.to_raw());
    assert_eq!(Word::Adc(max), Word::decode(max.to_raw()));

    let zero = Adc {
        module: 0,
        channel: 0,
        kind: DataKind::QLong,
        conversion: 0,
        low_timestamp: 0,
    };
    assert_eq!(0xC000_0000_0000_0000, zero.to_raw());
    assert_eq!(Word::Adc(zero), Word::decode(zero.to_raw()));

    for kind in [DataKind::QLong, DataKind::QShort, DataKind::Unused, DataKind::FineTiming] {
        let a = Adc { module: 7, channel: 21, kind, conversion: 1234, low_timestamp: 99 };
        let w = Word::decode(a.to_raw());
        assert!(w.is_kind(kind));
        assert_eq!(7, w.module());
        assert_eq!(21, w.channel());
        assert_eq!(1234, w.conversion());
        assert_eq!(99, w.low_timestamp());
    }
}

#[test]
fn trace_header_fields() {
    let max = TraceHeader {
        module: 31,
        channel: 63,
        samples: 0xFFFF,
        low_timestamp: 0x0FFF_FFFF,
    };
    assert_eq!(0x5F3F_FFFF_0FFF_FFFF, max.to_raw());
    assert_eq!(Word::TraceHeader(max), Word::decode(max.to_raw()));
    assert_eq!(0xFFFF, Word::decode(max.to_raw()).trace_samples());
}

#[test]
fn sample_lanes() {
    let s = Samples([0x3FFF, 0, 0x1234, 1]);
    assert_eq!(0x3FFF_0000_1234_0001, s.to_raw());
    assert_eq!(Word::Sample(s), Word::decode(s.to_raw()));
    assert_eq!(Word::Sample(Samples([0; 4])), Word::decode(0));
}

/// Asking a word for another tag's fields gives zero, never a panic
#[test]
fn mismatched_fields_are_zero() {
    let info = Word::decode(Info::extension(63, 0xF_FFFF, 0x0FFF_FFFF).to_raw());
    assert_eq!(0, info.conversion());
    assert_eq!(0, info.channel());
    assert_eq!(0, info.trace_samples());
    assert!(!info.is_kind(DataKind::QLong));

    let adc = Word::decode(
        Adc {
            module: 31,
            channel: 63,
            kind: DataKind::FineTiming,
            conversion: 0xFFFF,
            low_timestamp: 0x0FFF_FFFF,
        }
        .to_raw(),
    );
    assert_eq!(0, adc.info_field());
    assert_eq!(InfoCode::Undefined, adc.info_code());
    assert!(!adc.has_extended_timestamp());
    assert_eq!(0, adc.trace_samples());

    let sample = Word::decode(Samples([0x3FFF; 4]).to_raw());
    assert_eq!(0, sample.low_timestamp());
    assert_eq!(0, sample.module());
    assert_eq!(0, sample.channel());
    assert_eq!(0, sample.conversion());
}

#[test]
fn info_codes() {
    for bits in 0..16u8 {
        assert_eq!(bits, InfoCode::from_bits(bits) as u8);
    }
    assert_eq!(InfoCode::Timestamp, InfoCode::from_bits(4));
    assert_eq!("TS", InfoCode::Timestamp.name());
    assert_eq!("SHARC", InfoCode::from_bits(15).to_string());
    assert_eq!("Pile-up", InfoCode::PileUp.to_string());
}

#[test]
fn display() {
    let w = Word::decode(
        Adc { module: 3, channel: 7, kind: DataKind::QShort, conversion: 42, low_timestamp: 0x10 }
            .to_raw(),
    );
    let s = w.to_string();
    assert!(s.contains("ADC"));
    assert!(s.contains("Module: 3 Channel: 7"));
    assert!(s.contains("Conversion:   42"));
}
