//! Decoding of ISS `EBYEDATA` acquisition files into time-ordered events.
//!
//! Data flows through four stages, each usable on its own:
//!
//! - [`source::BlockSource`] splits a byte region into fixed-size blocks,
//!   inferring the block size from where the second header sits.
//! - [`block::BlockDecoder`] validates each block header and works out the
//!   byte and half-word order of the 64-bit payload words.
//! - [`unpack::Unpacker`] decodes each [`word::Word`], rebuilds full 48-bit
//!   timestamps through a [`timestamp::TimestampContext`], and yields hits
//!   and trigger marks.
//! - [`event::EventAssembler`] groups hits into time-sorted events bounded by
//!   triggers or by a fixed window.
//!
//! [`session::Session`] strings them together over one region:
//!
//! ```no_run
//! use issdata::{cfg::Config, file::Region, session::Session};
//!
//! let region = Region::open("R20_0")?;
//! let mut session = Session::open(&region)?;
//! let summary = session.run(&Config::default(), |event| {
//!     for hit in event.hits() {
//!         println!("{}", hit);
//!     }
//! })?;
//! println!("{} events", summary.events.events);
//! # Ok::<(), issdata::Error>(())
//! ```

pub mod bit;
pub mod block;
pub mod cfg;
pub mod error;
pub mod event;
pub mod file;
pub mod header;
pub mod hit;
pub mod ser;
pub mod session;
pub mod source;
pub mod timestamp;
pub mod unpack;
pub mod word;

pub use error::{Error, Result};
pub use event::Event;
pub use hit::Hit;
pub use word::Word;

/// Clock tick of the global trigger logic unit, in seconds
pub const GLOBAL_TSTEP: f64 = 10e-9;
