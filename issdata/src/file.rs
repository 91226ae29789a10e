//! Acquiring the byte region a session decodes

use memmap2::Mmap;
use std::fs::File;
use std::io::Read;
use std::ops::Deref;
use std::path::Path;

use crate::error::Result;

/// Bytes of a captured data file, either mapped or read into memory
pub enum Region {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl Region {
    /// Map the file at `path` read-only
    pub fn open(path: impl AsRef<Path>) -> Result<Region> {
        let file = File::open(path)?;
        // SAFETY: the map is read-only; captured data files are not
        // rewritten while they are being decoded
        let map = unsafe { Mmap::map(&file)? };
        Ok(Region::Mapped(map))
    }

    /// Read everything from `rdr`, e.g. standard input
    pub fn from_reader(mut rdr: impl Read) -> Result<Region> {
        let mut buf = Vec::new();
        rdr.read_to_end(&mut buf)?;
        Ok(Region::Owned(buf))
    }
}

impl Deref for Region {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Region::Mapped(m) => m,
            Region::Owned(v) => v,
        }
    }
}

impl AsRef<[u8]> for Region {
    fn as_ref(&self) -> &[u8] {
        return self;
    }
}
