//! Turning the word stream into timestamped hits and trigger marks

use std::collections::HashMap;

use serde::Serialize;

use crate::cfg::Config;
use crate::hit::Hit;
use crate::timestamp::TimestampContext;
use crate::word::{DataKind, Word};

/// What a word contributes to event building
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Item {
    Hit(Hit),
    /// An info word from the trigger module, with its full global timestamp
    Trigger(u64),
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Stats {
    pub words: u64,
    pub info: u64,
    pub adc: u64,
    pub trace_headers: u64,
    pub samples: u64,
    pub qlong: u64,
    pub qshort: u64,
    pub fine_timing: u64,
    pub unused: u64,
    pub global_extensions: u64,
    pub adc_extensions: u64,
    pub triggers: u64,
    /// First and latest global timestamps announced by the trigger module
    pub first_global: u64,
    pub last_global: u64,
    pub regressions: u64,
    /// ADC, trace header and sample words from ignored modules
    pub ignored: u64,
    /// Completed traces attached to a hit
    pub traces: u64,
    /// Sample words with no open trace
    pub orphan_samples: u64,
}

#[derive(Clone, Debug)]
struct OpenTrace {
    module: u8,
    channel: u8,
    wanted: usize,
    seen: usize,
    /// Belongs to an ignored module: samples are counted, not kept
    skipped: bool,
    samples: Vec<u16>,
}

/// Stamps each word with its full timestamp and collects trace samples.
///
/// A trace header opens a trace for its module and channel; the sample
/// words after it fill the trace, and once complete it rides along with the
/// next ADC hit from the same channel.
#[derive(Clone, Debug)]
pub struct Unpacker {
    ctx: TimestampContext,
    config: Config,
    open: Option<OpenTrace>,
    complete: HashMap<(u8, u8), Vec<u16>>,
    pub stats: Stats,
}

impl Unpacker {
    pub fn new(config: &Config) -> Unpacker {
        Unpacker {
            ctx: TimestampContext::new(config.trigger_module, config.hires_module),
            config: config.clone(),
            open: None,
            complete: HashMap::new(),
            stats: Stats::default(),
        }
    }

    pub fn context(&self) -> &TimestampContext {
        return &self.ctx;
    }

    /// Decode and consume one raw word
    pub fn push(&mut self, raw: u64) -> Option<Item> {
        let word = Word::decode(raw);
        return self.push_word(&word);
    }

    pub fn push_word(&mut self, word: &Word) -> Option<Item> {
        self.stats.words += 1;
        let ts = self.ctx.stamp(word);
        match word {
            Word::Info(info) => {
                self.stats.info += 1;
                self.stats.regressions = self.ctx.regressions;
                let trigger = info.module == self.config.trigger_module;
                if info.has_extended_timestamp() {
                    if trigger {
                        self.stats.global_extensions += 1;
                        if self.stats.global_extensions == 1 {
                            self.stats.first_global = ts;
                        }
                        self.stats.last_global = ts;
                    } else {
                        self.stats.adc_extensions += 1;
                    }
                }
                if trigger {
                    self.stats.triggers += 1;
                    return Some(Item::Trigger(ts));
                }
                None
            }
            Word::Adc(adc) => {
                if self.config.is_ignored(adc.module) {
                    self.stats.ignored += 1;
                    return None;
                }
                self.stats.adc += 1;
                match adc.kind {
                    DataKind::QLong => self.stats.qlong += 1,
                    DataKind::QShort => self.stats.qshort += 1,
                    DataKind::Unused => self.stats.unused += 1,
                    DataKind::FineTiming => self.stats.fine_timing += 1,
                }
                let trace = self.complete.remove(&(adc.module, adc.channel));
                if trace.is_some() {
                    self.stats.traces += 1;
                }
                Some(Item::Hit(Hit {
                    module: adc.module,
                    channel: adc.channel,
                    kind: adc.kind,
                    timestamp: ts,
                    conversion: adc.conversion,
                    trace,
                }))
            }
            Word::TraceHeader(t) => {
                let skipped = self.config.is_ignored(t.module);
                if skipped {
                    self.stats.ignored += 1;
                } else {
                    self.stats.trace_headers += 1;
                }
                self.open = None;
                if t.samples > 0 {
                    self.open = Some(OpenTrace {
                        module: t.module,
                        channel: t.channel,
                        wanted: t.samples as usize,
                        seen: 0,
                        skipped,
                        samples: Vec::new(),
                    });
                }
                None
            }
            Word::Sample(s) => {
                let open = match self.open.as_mut() {
                    Some(open) => open,
                    None => {
                        self.stats.samples += 1;
                        self.stats.orphan_samples += 1;
                        return None;
                    }
                };
                let take = (open.wanted - open.seen).min(s.0.len());
                open.seen += take;
                if open.skipped {
                    self.stats.ignored += 1;
                } else {
                    self.stats.samples += 1;
                    open.samples.extend_from_slice(&s.0[..take]);
                }
                if open.seen == open.wanted {
                    if let Some(done) = self.open.take() {
                        if !done.skipped {
                            self.complete.insert((done.module, done.channel), done.samples);
                        }
                    }
                }
                None
            }
        }
    }
}
