//! Error types for decoding ISS data streams

use thiserror::Error;

/// Fatal conditions: the byte region, or one of its blocks, cannot be
/// decoded at all. Recoverable anomalies are counted, not returned.
#[derive(Debug, Error)]
pub enum Error {
    /// The region does not start with an `EBYEDATA` header
    #[error("not an ISS data stream: first block lacks the EBYEDATA header")]
    NotAnIssStream,

    /// No power-of-two offset below the region length holds a second header
    #[error("unable to determine block size for a region of {len} bytes")]
    UndeterminedBlockSize { len: usize },

    /// A block index past the end of the region
    #[error("block {block} requested but the region holds {count} blocks")]
    NoBlock { block: usize, count: usize },

    /// A block's header magic does not match
    #[error("block {block} has an invalid header")]
    InvalidHeader { block: usize },

    /// The payload length is not a whole number of 64-bit words
    #[error("block {block} declares {len} payload bytes, not a multiple of 8")]
    MisalignedPayload { block: usize, len: u32 },

    /// The payload length runs past the end of the block
    #[error("block {block} declares {len} payload bytes but only {available} are present")]
    PayloadOverrun {
        block: usize,
        len: u32,
        available: usize,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
