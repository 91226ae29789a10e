//! Configuration of a decoding session
//!
//! Every field has a default, so a configuration file only needs to name
//! what differs. For example, to group hits into fixed 2 µs windows of the
//! 8 ns ADC clock and skip module 2:
//!
//! ```json
//! { "policy": { "Window": 250 }, "ignore_modules": [2] }
//! ```

use serde::{Deserialize, Serialize};
use std::io::Read;

use crate::error::Result;
use crate::timestamp::{GLOBAL_CLOCK_MODULE, HIRES_CLOCK_MODULE};

pub const MAX_HITS_DEFAULT: usize = 1_000_000;

/// How hits are grouped into events
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Policy {
    /// Close an event at each info word from the trigger module
    Trigger,
    /// Close an event when a hit falls more than this many clock ticks
    /// after the event's first hit
    Window(u64),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub policy:         Policy,
    /// Pending hits beyond which an event is emitted early
    pub max_hits:       usize,
    /// Module providing the global trigger clock
    pub trigger_module: u8,
    /// Module whose clock is kept apart from the other ADC clocks
    pub hires_module:   Option<u8>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ignore_modules: Vec<u8>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            policy:         Policy::Trigger,
            max_hits:       MAX_HITS_DEFAULT,
            trigger_module: GLOBAL_CLOCK_MODULE,
            hires_module:   Some(HIRES_CLOCK_MODULE),
            ignore_modules: Vec::new(),
        }
    }
}

impl Config {
    /// Parse a JSON configuration
    pub fn from_reader(rdr: impl Read) -> Result<Config> {
        let config = serde_json::from_reader(rdr)?;
        Ok(config)
    }

    pub fn is_ignored(&self, module: u8) -> bool {
        return self.ignore_modules.contains(&module);
    }
}
