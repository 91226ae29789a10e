use argh::FromArgs;
use anyhow::{bail, Result};
use either::{Left, Right};
use std::fs;
use std::io::{stdin, stdout, Write};

use issdata::file::Region;
use issdata::session::Session;
use issdata::timestamp::TimestampContext;
use issdata::Word;

const GIT_VERSION: &str = git_version::git_version!(fallback = "unknown");

#[derive(Debug, FromArgs, Clone)]
/// Show the contents of ISS data files: the block layout of each file,
/// the byte order of each block, and optionally every decoded word with
/// its full timestamp.
pub struct CliArgs {
    /// print version information
    #[argh(switch, short = 'v')]
    pub version: bool,
    /// also show every word in every block
    #[argh(switch, short = 'w')]
    pub words: bool,
    /// with no input or when input is '-', read from standard input
    #[argh(positional)]
    pub input: Vec<String>,
}

fn main() -> Result<()> {
    let args: CliArgs = argh::from_env();
    if args.version {
        let stdout = stdout();
        let mut stdout = stdout.lock();
        writeln!(
            stdout,
            concat!(
                env!("CARGO_BIN_NAME"),
                " ",
                "{}",
            ),
            GIT_VERSION,
        )?;
        return Ok(())
    }

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Collect inputs
    let mut inputs = Vec::new();
    if args.input.is_empty() {
        inputs.push(Left(()));
    } else {
        let mut contains_stdin = false;
        for i in args.input {
            if i == "-" {
                if contains_stdin {
                    bail!("cannot specify '-' for stdin twice");
                }
                contains_stdin = true;
                inputs.push(Left(()));
            } else {
                match fs::metadata(&i) {
                    Ok(m) => {
                        if m.is_file() {
                            inputs.push(Right(i));
                        } else {
                            bail!("{} is not a file", &i);
                        }
                    },
                    Err(e) => bail!(e),
                }
            }
        }
    }

    let stdout = stdout();
    let mut out = stdout.lock();

    for i in inputs {
        let region = match i {
            Left(()) => Region::from_reader(stdin().lock())?,
            Right(path) => {
                writeln!(out, "Opening file: {}", path)?;
                Region::open(path)?
            },
        };
        let mut session = Session::open(&region)?;
        let (nblocks, size) = (session.block_count(), session.block_size());
        writeln!(out, "File has {} bytes", region.len())?;
        writeln!(
            out,
            "File has {} blocks of {} bytes = {} bytes",
            nblocks,
            size,
            nblocks * size,
        )?;

        let mut ctx = TimestampContext::default();
        for block in session.blocks() {
            let block = block?;
            writeln!(out, "{}", block)?;
            if !args.words {
                continue;
            }
            for raw in block.words() {
                let word = Word::decode(raw);
                let ts = ctx.stamp(&word);
                writeln!(out, "Word: 0x{:016X} Timestamp: 0x{:012X} {}", raw, ts, word)?;
            }
        }
    }
    Ok(())
}
