//! sdpfmt: parse SDP and print it in canonical form
//!
//! Reads SDP from a file or stdin and writes canonical SDP, or the structured
//! value as JSON. With `--from-json` the direction is reversed.
//!
//! Set `RUST_LOG=rvoip_sdp_core=trace` to follow the parser line by line.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use rvoip_sdp_core::{parse_with_config, Error, ParseConfig, SessionDescription};

/// Canonical SDP formatter
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input file (stdin when omitted)
    input: Option<PathBuf>,

    /// Print the structured value as JSON instead of SDP
    #[arg(short, long, conflicts_with = "from_json")]
    json: bool,

    /// Read the structured value as JSON and print SDP
    #[arg(long)]
    from_json: bool,

    /// Skip blank lines and trim whitespace around each line
    #[arg(short, long)]
    lenient: bool,

    /// Longest accepted line, in bytes
    #[arg(long, default_value_t = rvoip_sdp_core::config::MAX_LINE_LENGTH)]
    max_line_length: usize,
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text).context("failed to read stdin")?;
            Ok(text)
        }
    }
}

fn run(args: &Args) -> Result<String> {
    let input = read_input(args.input.as_ref())?;

    if args.from_json {
        let session = SessionDescription::from_json(&input).context("invalid session JSON")?;
        return Ok(session.to_string());
    }

    let config = ParseConfig::default()
        .with_lenient(args.lenient)
        .with_max_line_length(args.max_line_length);
    let session = match parse_with_config(&input, &config) {
        Ok(session) => session,
        Err(Error::Syntax(err)) => anyhow::bail!("invalid SDP: {err}"),
        Err(err) => return Err(err.into()),
    };

    if args.json {
        let mut json = serde_json::to_string_pretty(&session)?;
        json.push('\n');
        Ok(json)
    } else {
        Ok(session.to_string())
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(output) => {
            if let Err(e) = io::stdout().write_all(output.as_bytes()) {
                eprintln!("Error: {e}");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
