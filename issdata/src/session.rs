//! Decoding sessions over one captured byte region
//!
//! A session owns all the stream-position dependent state: the payload swap
//! mode and, while [`Session::run`] is going, the timestamp context. Blocks
//! are therefore decoded strictly in order. Separate regions may be decoded
//! in parallel with one session each.

use serde::Serialize;
use tracing::info;

use crate::block::{Block, BlockDecoder, SwapMode};
use crate::cfg::Config;
use crate::error::{Error, Result};
use crate::event::{self, Event, EventAssembler};
use crate::source::BlockSource;
use crate::unpack::{self, Unpacker};

pub struct Session<'a> {
    source: BlockSource<'a>,
    decoder: BlockDecoder,
}

/// Counters gathered over a whole run
#[derive(Clone, Debug, Default, Serialize)]
pub struct Summary {
    pub blocks: usize,
    pub block_size: usize,
    /// Swap mode at the end of the run; it carries over to later runs of
    /// the same session
    pub swap: SwapMode,
    /// Blocks decoded in this run before the swap mode was known
    pub undetermined_blocks: u64,
    pub words: unpack::Stats,
    pub events: event::Stats,
}

impl<'a> Session<'a> {
    pub fn open(bytes: &'a [u8]) -> Result<Session<'a>> {
        let source = BlockSource::new(bytes)?;
        info!(
            bytes = source.len(),
            blocks = source.block_count(),
            block_size = source.block_size(),
            "opened ISS data stream"
        );
        Ok(Session {
            source,
            decoder: BlockDecoder::new(),
        })
    }

    pub fn source(&self) -> &BlockSource<'a> {
        return &self.source;
    }

    pub fn block_count(&self) -> usize {
        return self.source.block_count();
    }

    pub fn block_size(&self) -> usize {
        return self.source.block_size();
    }

    /// Swap mode resolved so far
    pub fn swap(&self) -> SwapMode {
        return self.decoder.swap();
    }

    /// Validate block `index`. Call in block order: the swap mode found in
    /// one block is reused for all later ones.
    pub fn decode_block(&mut self, index: usize) -> Result<Block<'a>> {
        let bytes = self.source.block(index).ok_or(Error::NoBlock {
            block: index,
            count: self.source.block_count(),
        })?;
        return self.decoder.decode(index, bytes);
    }

    /// Iterate over all blocks in order
    pub fn blocks(&mut self) -> Blocks<'_, 'a> {
        Blocks {
            session: self,
            next: 0,
        }
    }

    /// Decode every block, group the hits into events per `config`, and hand
    /// each event to `sink` as soon as it is complete.
    pub fn run<F>(&mut self, config: &Config, mut sink: F) -> Result<Summary>
    where
        F: FnMut(Event),
    {
        let mut unpacker = Unpacker::new(config);
        let mut assembler = EventAssembler::from_config(config);
        let undetermined = self.decoder.undetermined;
        let mut blocks = 0;
        for block in self.blocks() {
            let block = block?;
            blocks += 1;
            for word in block.decoded() {
                if let Some(item) = unpacker.push_word(&word) {
                    if let Some(event) = assembler.feed(item) {
                        sink(event);
                    }
                }
            }
        }
        if let Some(event) = assembler.finish() {
            sink(event);
        }
        Ok(Summary {
            blocks,
            block_size: self.block_size(),
            swap: self.swap(),
            undetermined_blocks: self.decoder.undetermined - undetermined,
            words: unpacker.stats,
            events: assembler.stats,
        })
    }

    /// Decode the whole region and collect the events
    pub fn events(&mut self, config: &Config) -> Result<(Vec<Event>, Summary)> {
        let mut events = Vec::new();
        let summary = self.run(config, |e| events.push(e))?;
        Ok((events, summary))
    }
}

pub struct Blocks<'s, 'a> {
    session: &'s mut Session<'a>,
    next: usize,
}

impl<'s, 'a> Iterator for Blocks<'s, 'a> {
    type Item = Result<Block<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.session.block_count() {
            return None;
        }
        let index = self.next;
        self.next += 1;
        Some(self.session.decode_block(index))
    }
}
