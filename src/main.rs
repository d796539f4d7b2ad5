//! Enigma CLI: encrypts and decrypts message streams.
//!
//! Thin wrapper over the `enigma` library crate. Reads a machine
//! description, then applies every settings line and message line of the
//! input in order.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use enigma::{MachineConfig, Session};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Historical rotor cipher machine simulator.
#[derive(Parser, Debug)]
#[command(name = "enigma", version)]
struct Args {
    /// Machine description: alphabet, slot and pawl counts, rotor types.
    config: PathBuf,

    /// Messages and settings lines. Default: standard input.
    input: Option<PathBuf>,

    /// Destination of converted messages. Default: standard output.
    output: Option<PathBuf>,

    /// Log configuration changes to standard error.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("enigma=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("enigma=warn"))
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let text = fs::read_to_string(&args.config)
        .with_context(|| format!("could not open {}", args.config.display()))?;
    let config = MachineConfig::parse(&text)
        .with_context(|| format!("bad machine description {}", args.config.display()))?;
    let session = Session::new(config.build_machine()?);

    let input: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("could not open {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    let output: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("could not open {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    let lines = run(session, input, output)?;
    info!(lines, "input processed");
    Ok(())
}

/// Feeds every input line to `session`, writing each converted message.
/// Returns the number of lines read.
fn run(mut session: Session, input: impl BufRead, mut output: impl Write) -> Result<usize> {
    let mut count = 0;
    for (n, line) in input.lines().enumerate() {
        let line = line.context("failed to read input")?;
        let converted = session
            .process_line(&line)
            .with_context(|| format!("input line {}", n + 1))?;
        if let Some(converted) = converted {
            writeln!(output, "{}", converted)?;
        }
        count += 1;
    }
    output.flush()?;
    Ok(count)
}
