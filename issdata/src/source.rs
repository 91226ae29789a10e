//! Fixed-size block addressing over a captured byte region

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::header::has_magic;

/// Smallest block size probed for a second header
pub const MIN_BLOCK_SIZE: usize = 1 << 8;

/// A byte region split into blocks of one size, each starting with a header.
///
/// The block size is not stored anywhere in the data, so it is inferred by
/// looking for the second header at increasing power-of-two offsets.
#[derive(Clone, Copy, Debug)]
pub struct BlockSource<'a> {
    bytes: &'a [u8],
    block_size: usize,
}

impl<'a> BlockSource<'a> {
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        if !has_magic(bytes) {
            return Err(Error::NotAnIssStream);
        }
        let block_size = determine_block_size(bytes)?;
        let trailing = bytes.len() % block_size;
        if trailing != 0 {
            warn!(trailing, block_size, "region does not end on a block boundary");
        }
        debug!(block_size, blocks = bytes.len() / block_size, "determined block size");
        Ok(BlockSource { bytes, block_size })
    }

    /// Total size of the region in bytes
    pub fn len(&self) -> usize {
        return self.bytes.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.bytes.is_empty();
    }

    pub fn block_size(&self) -> usize {
        return self.block_size;
    }

    /// Number of whole blocks; a partial block at the end is not counted
    pub fn block_count(&self) -> usize {
        return self.bytes.len() / self.block_size;
    }

    /// Bytes of block `n`, or `None` past the last whole block
    pub fn block(&self, n: usize) -> Option<&'a [u8]> {
        if n >= self.block_count() {
            return None;
        }
        let start = n * self.block_size;
        return Some(&self.bytes[start..start + self.block_size]);
    }
}

fn determine_block_size(bytes: &[u8]) -> Result<usize> {
    let mut size = MIN_BLOCK_SIZE;
    while size < bytes.len() {
        if has_magic(&bytes[size..]) {
            return Ok(size);
        }
        size <<= 1;
    }
    Err(Error::UndeterminedBlockSize { len: bytes.len() })
}
