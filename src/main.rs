//! Command-line front end: read routes line by line, write the summarized list.

use std::error::Error;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use routefold::{MemStats, RouteSummary};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "routefold",
    version,
    about = "Summarize IPv4 and IPv6 routes to the shortest equivalent list"
)]
struct Args {
    /// File to read. Use - for stdin.
    #[arg(long = "in", value_name = "PATH", default_value = "-")]
    input: PathBuf,

    /// File to write. Use - for stdout.
    #[arg(long = "out", value_name = "PATH", default_value = "-")]
    output: PathBuf,

    /// Report trie node counts and memory usage on stderr after processing.
    #[arg(long)]
    show_mem_stats: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("routefold: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let input = open_input(&args.input)?;
    let mut output = open_output(&args.output)?;

    let summary = summarize(input, &mut output)?;
    output.flush()?;

    if args.show_mem_stats {
        print_mem_stats(&summary.mem_stats());
    }

    Ok(())
}

/// Feed every input line through a summarizer and write the summarized lines out. Split from
/// `run` so tests can drive it over in-memory readers and writers.
fn summarize(
    input: impl BufRead,
    output: &mut impl Write,
) -> Result<RouteSummary, Box<dyn Error>> {
    let mut summary = RouteSummary::new();
    let mut lines_read = 0usize;
    for line in input.lines() {
        let line = line?;
        lines_read += 1;
        summary.insert_line(&line)?;
    }

    let mut lines_written = 0usize;
    for line in summary.lines() {
        output.write_all(line.as_bytes())?;
        output.write_all(b"\n")?;
        lines_written += 1;
    }

    debug!(lines_read, lines_written, "summarized input");
    Ok(summary)
}

fn open_input(path: &Path) -> Result<Box<dyn BufRead>, Box<dyn Error>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }

    // report bad paths up front, naming the argument
    let meta = fs::metadata(path).map_err(|err| format!("`--in` {}: {err}", path.display()))?;
    if !meta.is_file() {
        return Err(format!("`--in` {}: not a regular file", path.display()).into());
    }

    let file = File::open(path).map_err(|err| format!("`--in` {}: {err}", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

fn open_output(path: &Path) -> Result<Box<dyn Write>, Box<dyn Error>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }

    let file = File::create(path).map_err(|err| format!("`--out` {}: {err}", path.display()))?;
    Ok(Box::new(BufWriter::new(file)))
}

fn print_mem_stats(stats: &MemStats) {
    eprintln!("Memory usage:");
    eprintln!("  internal nodes: {}", stats.internal_nodes);
    eprintln!("  leaf nodes:     {}", stats.leaf_nodes);
    eprintln!("  internal bytes: {}", stats.internal_bytes);
    eprintln!("  leaf bytes:     {}", stats.leaf_bytes);
    eprintln!("  total bytes:    {}", stats.total_bytes());
}
