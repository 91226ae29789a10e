use argh::FromArgs;
use anyhow::{bail, Context, Result};
use either::{Left, Right};
use std::fs::{self, File};
use std::io::{stdin, stdout, BufReader, Write};

use issdata::cfg::{Config, Policy};
use issdata::file::Region;
use issdata::session::Session;
use issdata::{ser, GLOBAL_TSTEP};

const GIT_VERSION: &str = git_version::git_version!(fallback = "unknown");

#[derive(Debug, FromArgs, Clone)]
/// Decode ISS data files into events and print their hits as
/// tab-separated values: event, trigger timestamp, module, channel,
/// data kind, timestamp, conversion, trace samples. Counters are
/// written to standard error as JSON when done.
pub struct CliArgs {
    /// print version information
    #[argh(switch, short = 'v')]
    pub version: bool,
    /// JSON configuration file
    #[argh(option, short = 'c')]
    pub config: Option<String>,
    /// group hits in fixed windows of this many clock ticks instead of
    /// by trigger
    #[argh(option, short = 'w')]
    pub window: Option<u64>,
    /// maximum number of pending hits before an event is emitted early
    #[argh(option, short = 'm')]
    pub max_hits: Option<usize>,
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

    let mut config = match &args.config {
        Some(path) => {
            let f = File::open(path).with_context(|| format!("cannot open {}", path))?;
            Config::from_reader(BufReader::new(f))?
        },
        None => Config::default(),
    };
    if let Some(w) = args.window {
        config.policy = Policy::Window(w);
    }
    if let Some(m) = args.max_hits {
        config.max_hits = m;
    }

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
    let stdout = stdout.lock();
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .delimiter(b'\t')
        .from_writer(stdout);

    // Event numbers run on across files; each file is its own session
    let mut n_events = 0u64;
    for i in inputs {
        let (name, region) = match i {
            Left(()) => (String::from("-"), Region::from_reader(stdin().lock())?),
            Right(path) => {
                let region = Region::open(&path)?;
                (path, region)
            },
        };
        let mut session = Session::open(&region)?;
        let mut failed = None;
        let summary = session.run(&config, |event| {
            if failed.is_none() {
                if let Err(e) = ser::tsv(&mut wtr, n_events, &event) {
                    failed = Some(e);
                }
            }
            n_events += 1;
        })?;
        if let Some(e) = failed {
            return Err(e.into());
        }
        wtr.flush()?;

        let first = summary.words.first_global;
        let last = summary.words.last_global;
        let seconds = last.saturating_sub(first) as f64 * GLOBAL_TSTEP;
        eprintln!("{}: acquisition time {:.3} seconds", name, seconds);
        eprintln!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}
