//! Decoding of the 64-bit tagged data words
//!
//! Bits 63:62 of every word select its type. Bit positions below count from
//! the least significant bit of the word after swap correction.
//!
//! ```text
//! Info         63:62 = 2  61:56 module  55:52 code  51:32 field    27:0 timestamp
//! ADC          63:62 = 3  60:56 module  55:54 kind  53:48 channel  47:32 conversion  27:0 timestamp
//! Trace header 63:62 = 1  60:56 module              53:48 channel  47:32 samples     27:0 timestamp
//! Sample       63:62 = 0  61:48 s0  45:32 s1  29:16 s2  13:0 s3
//! ```

use std::fmt;

use crate::bit::BitField;

/// Field positions as (shift, width)
pub mod layout {
    pub const TAG: (usize, usize) = (62, 2);
    pub const LOW_TIMESTAMP: (usize, usize) = (0, 28);

    pub const INFO_FIELD: (usize, usize) = (32, 20);
    pub const INFO_CODE: (usize, usize) = (52, 4);
    pub const INFO_MODULE: (usize, usize) = (56, 6);

    pub const ADC_CONVERSION: (usize, usize) = (32, 16);
    pub const ADC_CHANNEL: (usize, usize) = (48, 6);
    pub const ADC_KIND: (usize, usize) = (54, 2);
    pub const ADC_MODULE: (usize, usize) = (56, 5);

    pub const TRACE_SAMPLES: (usize, usize) = (32, 16);
    pub const TRACE_CHANNEL: (usize, usize) = (48, 6);
    pub const TRACE_MODULE: (usize, usize) = (56, 5);

    /// Sample lanes in stream order
    pub const SAMPLES: [(usize, usize); 4] = [(48, 14), (32, 14), (16, 14), (0, 14)];
}

#[inline]
fn get(raw: u64, (shift, width): (usize, usize)) -> u64 {
    return raw.field(shift, width);
}

#[inline]
fn put(raw: u64, (shift, width): (usize, usize), value: u64) -> u64 {
    return raw.with_field(shift, width, value);
}

/// Item type held in bits 63:62
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Tag {
    Sample = 0,
    TraceHeader = 1,
    Info = 2,
    Adc = 3,
}

impl Tag {
    pub fn of(raw: u64) -> Tag {
        match get(raw, layout::TAG) {
            0 => Tag::Sample,
            1 => Tag::TraceHeader,
            2 => Tag::Info,
            _ => Tag::Adc,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Tag::Sample => "SAMPLE",
            Tag::TraceHeader => "TRACE",
            Tag::Info => "INFO",
            Tag::Adc => "ADC",
        };
        f.pad(s)
    }
}

/// What an ADC word measures. Which kinds appear depends on the digitiser
/// firmware; with pulse-shape firmware 0 and 1 are the long and short gates.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize)]
pub enum DataKind {
    QLong = 0,
    QShort = 1,
    Unused = 2,
    FineTiming = 3,
}

impl DataKind {
    pub fn from_bits(bits: u8) -> DataKind {
        match bits & 3 {
            0 => DataKind::QLong,
            1 => DataKind::QShort,
            2 => DataKind::Unused,
            _ => DataKind::FineTiming,
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DataKind::QLong => "QL",
            DataKind::QShort => "QS",
            DataKind::Unused => "--",
            DataKind::FineTiming => "FT",
        };
        f.pad(s)
    }
}

/// Info word codes
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InfoCode {
    Undefined = 0,
    PileUp = 1,
    Pause = 2,
    Resume = 3,
    /// Field carries bits 47:28 of the module's timestamp
    Timestamp = 4,
    WhiteRabbit = 5,
    Aida = 6,
    ExtTs = 7,
    ScanningTable = 8,
    OverRange = 9,
    UnderRange = 10,
    Overflow = 11,
    Underflow = 12,
    TrigSeq = 13,
    DataLink = 14,
    Sharc = 15,
}

impl InfoCode {
    pub fn from_bits(bits: u8) -> InfoCode {
        use InfoCode::*;
        const CODES: [InfoCode; 16] = [
            Undefined, PileUp, Pause, Resume, Timestamp, WhiteRabbit, Aida, ExtTs,
            ScanningTable, OverRange, UnderRange, Overflow, Underflow, TrigSeq, DataLink, Sharc,
        ];
        return CODES[(bits & 0xF) as usize];
    }

    pub fn name(self) -> &'static str {
        use InfoCode::*;
        match self {
            Undefined => "UNDEFINED",
            PileUp => "Pile-up",
            Pause => "Pause",
            Resume => "Resume",
            Timestamp => "TS",
            WhiteRabbit => "WhiteRabbit",
            Aida => "Aida",
            ExtTs => "ExtTs",
            ScanningTable => "ScanningTable",
            OverRange => "OverRange",
            UnderRange => "UnderRange",
            Overflow => "Overflow",
            Underflow => "Underflow",
            TrigSeq => "TrigSeq",
            DataLink => "DataLink",
            Sharc => "SHARC",
        }
    }
}

impl fmt::Display for InfoCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Info {
    pub module: u8,
    pub code: InfoCode,
    pub field: u32,
    pub low_timestamp: u32,
}

impl Info {
    /// Info word announcing the upper 20 timestamp bits of `module`
    pub fn extension(module: u8, ext: u32, low_timestamp: u32) -> Info {
        Info {
            module,
            code: InfoCode::Timestamp,
            field: ext,
            low_timestamp,
        }
    }

    pub fn has_extended_timestamp(&self) -> bool {
        return self.code == InfoCode::Timestamp;
    }

    pub fn to_raw(&self) -> u64 {
        let mut w = put(0, layout::TAG, Tag::Info as u64);
        w = put(w, layout::INFO_MODULE, self.module as u64);
        w = put(w, layout::INFO_CODE, self.code as u64);
        w = put(w, layout::INFO_FIELD, self.field as u64);
        return put(w, layout::LOW_TIMESTAMP, self.low_timestamp as u64);
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Adc {
    pub module: u8,
    pub channel: u8,
    pub kind: DataKind,
    pub conversion: u16,
    pub low_timestamp: u32,
}

impl Adc {
    pub fn to_raw(&self) -> u64 {
        let mut w = put(0, layout::TAG, Tag::Adc as u64);
        w = put(w, layout::ADC_MODULE, self.module as u64);
        w = put(w, layout::ADC_KIND, self.kind as u64);
        w = put(w, layout::ADC_CHANNEL, self.channel as u64);
        w = put(w, layout::ADC_CONVERSION, self.conversion as u64);
        return put(w, layout::LOW_TIMESTAMP, self.low_timestamp as u64);
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TraceHeader {
    pub module: u8,
    pub channel: u8,
    /// Number of samples that follow, a multiple of 4
    pub samples: u16,
    pub low_timestamp: u32,
}

impl TraceHeader {
    pub fn to_raw(&self) -> u64 {
        let mut w = put(0, layout::TAG, Tag::TraceHeader as u64);
        w = put(w, layout::TRACE_MODULE, self.module as u64);
        w = put(w, layout::TRACE_CHANNEL, self.channel as u64);
        w = put(w, layout::TRACE_SAMPLES, self.samples as u64);
        return put(w, layout::LOW_TIMESTAMP, self.low_timestamp as u64);
    }
}

/// Four 14-bit trace samples
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Samples(pub [u16; 4]);

impl Samples {
    pub fn to_raw(&self) -> u64 {
        let mut w = 0;
        for (lane, s) in layout::SAMPLES.iter().zip(self.0.iter()) {
            w = put(w, *lane, *s as u64);
        }
        return w;
    }
}

/// One payload word, decoded by its tag
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Word {
    Sample(Samples),
    TraceHeader(TraceHeader),
    Info(Info),
    Adc(Adc),
}

impl Word {
    pub fn decode(raw: u64) -> Word {
        let low_timestamp = get(raw, layout::LOW_TIMESTAMP) as u32;
        match Tag::of(raw) {
            Tag::Sample => {
                let mut s = [0u16; 4];
                for (out, lane) in s.iter_mut().zip(layout::SAMPLES.iter()) {
                    *out = get(raw, *lane) as u16;
                }
                Word::Sample(Samples(s))
            }
            Tag::TraceHeader => Word::TraceHeader(TraceHeader {
                module: get(raw, layout::TRACE_MODULE) as u8,
                channel: get(raw, layout::TRACE_CHANNEL) as u8,
                samples: get(raw, layout::TRACE_SAMPLES) as u16,
                low_timestamp,
            }),
            Tag::Info => Word::Info(Info {
                module: get(raw, layout::INFO_MODULE) as u8,
                code: InfoCode::from_bits(get(raw, layout::INFO_CODE) as u8),
                field: get(raw, layout::INFO_FIELD) as u32,
                low_timestamp,
            }),
            Tag::Adc => Word::Adc(Adc {
                module: get(raw, layout::ADC_MODULE) as u8,
                channel: get(raw, layout::ADC_CHANNEL) as u8,
                kind: DataKind::from_bits(get(raw, layout::ADC_KIND) as u8),
                conversion: get(raw, layout::ADC_CONVERSION) as u16,
                low_timestamp,
            }),
        }
    }

    pub fn to_raw(&self) -> u64 {
        match self {
            Word::Sample(s) => s.to_raw(),
            Word::TraceHeader(t) => t.to_raw(),
            Word::Info(i) => i.to_raw(),
            Word::Adc(a) => a.to_raw(),
        }
    }

    pub fn tag(&self) -> Tag {
        match self {
            Word::Sample(_) => Tag::Sample,
            Word::TraceHeader(_) => Tag::TraceHeader,
            Word::Info(_) => Tag::Info,
            Word::Adc(_) => Tag::Adc,
        }
    }

    // Tag-specific accessors below return zero for words of another tag.

    /// Lowest 28 timestamp bits; samples carry none
    pub fn low_timestamp(&self) -> u32 {
        match self {
            Word::Sample(_) => 0,
            Word::TraceHeader(t) => t.low_timestamp,
            Word::Info(i) => i.low_timestamp,
            Word::Adc(a) => a.low_timestamp,
        }
    }

    pub fn module(&self) -> u8 {
        match self {
            Word::Sample(_) => 0,
            Word::TraceHeader(t) => t.module,
            Word::Info(i) => i.module,
            Word::Adc(a) => a.module,
        }
    }

    pub fn channel(&self) -> u8 {
        match self {
            Word::TraceHeader(t) => t.channel,
            Word::Adc(a) => a.channel,
            _ => 0,
        }
    }

    pub fn conversion(&self) -> u16 {
        match self {
            Word::Adc(a) => a.conversion,
            _ => 0,
        }
    }

    pub fn info_field(&self) -> u32 {
        match self {
            Word::Info(i) => i.field,
            _ => 0,
        }
    }

    pub fn info_code(&self) -> InfoCode {
        match self {
            Word::Info(i) => i.code,
            _ => InfoCode::Undefined,
        }
    }

    pub fn has_extended_timestamp(&self) -> bool {
        match self {
            Word::Info(i) => i.has_extended_timestamp(),
            _ => false,
        }
    }

    pub fn trace_samples(&self) -> u16 {
        match self {
            Word::TraceHeader(t) => t.samples,
            _ => 0,
        }
    }

    pub fn is_kind(&self, kind: DataKind) -> bool {
        match self {
            Word::Adc(a) => a.kind == kind,
            _ => false,
        }
    }
}

impl From<u64> for Word {
    fn from(raw: u64) -> Word {
        Word::decode(raw)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Low timestamp: 0x{:07X} Type: {:<6} \t",
            self.low_timestamp(),
            self.tag(),
        )?;
        match self {
            Word::Sample(s) => write!(f, "Samples: {:?}", s.0),
            Word::TraceHeader(t) => write!(
                f,
                "Module: {} Channel: {:<2} Nsamples: {}",
                t.module, t.channel, t.samples,
            ),
            Word::Info(i) => write!(
                f,
                "Module: {} Code: {} {:<8} Field: 0x{:05X}",
                i.module, i.code as u8, i.code, i.field,
            ),
            Word::Adc(a) => write!(
                f,
                "Module: {} Channel: {:<2} {} Conversion: {:4}",
                a.module, a.channel, a.kind, a.conversion,
            ),
        }
    }
}
