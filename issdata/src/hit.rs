use std::fmt;

use serde::Serialize;

use crate::word::DataKind;

/// One ADC measurement with its full timestamp
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Hit {
    pub module: u8,
    pub channel: u8,
    pub kind: DataKind,
    /// Full 48-bit timestamp on the module's ADC clock
    pub timestamp: u64,
    pub conversion: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Vec<u16>>,
}

impl Hit {
    pub fn samples(&self) -> &[u16] {
        match &self.trace {
            Some(t) => t,
            None => &[],
        }
    }
}

impl fmt::Display for Hit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MODULE {:<4} CHANNEL {:<4} DATAID {:<4} TS 0x{:012X} Conversion {:04}",
            self.module, self.channel, self.kind as u8, self.timestamp, self.conversion,
        )
    }
}
