//! Reconstruction of 48-bit timestamps from 28-bit word timestamps
//!
//! Data words only carry bits 27:0 of their timestamp. Bits 47:28 arrive
//! separately, in info words with code [`InfoCode::Timestamp`], one stream
//! of them per clock. The upper bits latched from the latest such word are
//! combined with the lower bits of every following word of the same clock,
//! so words must be stamped in exactly the order they were recorded.
//!
//! [`InfoCode::Timestamp`]: crate::word::InfoCode::Timestamp

use std::collections::HashMap;

use tracing::warn;

use crate::word::{Info, Word};

/// Module id of the logic unit providing the global trigger clock
pub const GLOBAL_CLOCK_MODULE: u8 = 63;
/// Module id of the digitiser with the faster ADC clock
pub const HIRES_CLOCK_MODULE: u8 = 2;

pub const LOW_BITS: u32 = 28;

/// A timing source whose upper timestamp bits are latched separately
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Clock {
    Global,
    Adc(u8),
    /// Kept apart from the other ADC clocks: nothing relates its ticks to
    /// theirs yet, so its extension never stands in for a missing one.
    HiRes,
}

/// Combine latched upper bits with a word's lower 28 bits
#[inline]
pub fn full_timestamp(ext: u32, low: u32) -> u64 {
    return ((ext as u64) << LOW_BITS) | (low as u64 & 0x0FFF_FFFF);
}

#[derive(Clone, Debug)]
pub struct TimestampContext {
    global_module: u8,
    hires_module: Option<u8>,
    global_ext: u32,
    hires_ext: u32,
    adc_ext: HashMap<u8, u32>,
    /// Most recent extension from any ordinary ADC clock
    latest_adc_ext: u32,
    last_global: u64,
    last_adc: u64,
    last_latched: HashMap<Clock, u64>,
    /// Extension words whose timestamp went backwards on their clock
    pub regressions: u64,
}

impl Default for TimestampContext {
    fn default() -> Self {
        TimestampContext::new(GLOBAL_CLOCK_MODULE, Some(HIRES_CLOCK_MODULE))
    }
}

impl TimestampContext {
    pub fn new(global_module: u8, hires_module: Option<u8>) -> TimestampContext {
        TimestampContext {
            global_module,
            hires_module,
            global_ext: 0,
            hires_ext: 0,
            adc_ext: HashMap::new(),
            latest_adc_ext: 0,
            last_global: 0,
            last_adc: 0,
            last_latched: HashMap::new(),
            regressions: 0,
        }
    }

    pub fn clock_of(&self, module: u8) -> Clock {
        if module == self.global_module {
            Clock::Global
        } else if Some(module) == self.hires_module {
            Clock::HiRes
        } else {
            Clock::Adc(module)
        }
    }

    /// Upper 20 bits currently latched for `clock`.
    ///
    /// An ADC clock that has not announced its own extension yet borrows the
    /// most recent one from any ordinary ADC clock.
    pub fn extension(&self, clock: Clock) -> u32 {
        match clock {
            Clock::Global => self.global_ext,
            Clock::HiRes => self.hires_ext,
            Clock::Adc(m) => *self.adc_ext.get(&m).unwrap_or(&self.latest_adc_ext),
        }
    }

    /// Most recent full timestamp on the global clock
    pub fn global_timestamp(&self) -> u64 {
        return self.last_global;
    }

    /// Most recent full timestamp on an ADC clock
    pub fn adc_timestamp(&self) -> u64 {
        return self.last_adc;
    }

    fn latch(&mut self, info: &Info) {
        let clock = self.clock_of(info.module);
        match clock {
            Clock::Global => self.global_ext = info.field,
            Clock::HiRes => self.hires_ext = info.field,
            Clock::Adc(m) => {
                self.adc_ext.insert(m, info.field);
                self.latest_adc_ext = info.field;
            }
        }
        let ts = full_timestamp(info.field, info.low_timestamp);
        if let Some(&prev) = self.last_latched.get(&clock) {
            if ts < prev {
                self.regressions += 1;
                warn!(
                    ?clock,
                    new = %format!("0x{:012X}", ts),
                    previous = %format!("0x{:012X}", prev),
                    "timestamp went backwards"
                );
            }
        }
        self.last_latched.insert(clock, ts);
    }

    /// Full timestamp of `word`, latching new upper bits first if it is an
    /// extension word. Samples carry no timestamp and report the latest one
    /// on the ADC clocks.
    pub fn stamp(&mut self, word: &Word) -> u64 {
        let (clock, low) = match word {
            Word::Sample(_) => return self.last_adc,
            Word::Info(info) => {
                if info.has_extended_timestamp() {
                    self.latch(info);
                }
                (self.clock_of(info.module), info.low_timestamp)
            }
            Word::Adc(adc) => (self.clock_of(adc.module), adc.low_timestamp),
            Word::TraceHeader(t) => (self.clock_of(t.module), t.low_timestamp),
        };
        let ts = full_timestamp(self.extension(clock), low);
        match clock {
            Clock::Global => self.last_global = ts,
            _ => self.last_adc = ts,
        }
        return ts;
    }
}
