use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use textspan::{rejoin, write_stats, ReaderConfig, SaveTarget, SplitMode, SplitStats, TextReader};

#[derive(Parser, Debug)]
#[command(name = "textspan")]
#[command(about = "Split a file into lines or pattern-delimited pieces and join them back")]
#[command(version)]
struct Args {
    /// File to split
    input: PathBuf,

    /// Split on matches of this regular expression instead of line breaks
    #[arg(long)]
    split: Option<String>,

    /// Delimiter placed between segments in the output
    #[arg(long, default_value = "\n")]
    delimiter: String,

    /// Create this file (must not exist) instead of writing to stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Permission bits for --output, in octal
    #[arg(long, default_value = "644", value_parser = parse_mode)]
    mode: u32,

    /// Use memory-mapped I/O instead of async buffered
    #[arg(long)]
    use_mmap: bool,

    /// Zero the input and output buffers before they are released
    #[arg(long)]
    secure_wipe: bool,

    /// Stats output file path
    #[arg(long)]
    stats_out: Option<PathBuf>,
}

fn parse_mode(raw: &str) -> Result<u32, String> {
    u32::from_str_radix(raw.trim_start_matches("0o"), 8)
        .map_err(|e| format!("invalid octal mode '{raw}': {e}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    // WHY: logs go to stderr so stdout stays free for the saved text
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .json()
        .init();

    let args = Args::parse();
    info!(?args, "Parsed CLI arguments");

    if !args.input.is_file() {
        anyhow::bail!("Input is not a readable file: {}", args.input.display());
    }

    let start_time = std::time::Instant::now();
    let reader = TextReader::new(ReaderConfig {
        use_mmap: args.use_mmap,
        secure_wipe: args.secure_wipe,
    });
    let (text, read_stats) = reader.load(&args.input).await?;

    let mode = match args.split {
        Some(pattern) => SplitMode::Pattern(pattern),
        None => SplitMode::Lines,
    };
    let (mut joined, segments) = rejoin(&text, &mode, args.delimiter.as_bytes())?;
    if args.secure_wipe {
        joined.set_secure_wipe(true)?;
    }

    let target = match &args.output {
        Some(path) => SaveTarget::path_with_mode(path, args.mode),
        None => SaveTarget::Stdout,
    };
    joined
        .save_to_file(target)
        .with_context(|| match &args.output {
            Some(path) => format!("Failed to save output to {}", path.display()),
            None => "Failed to write output to stdout".to_string(),
        })?;

    info!(
        "Split {} bytes into {} segments, wrote {} bytes",
        text.len(),
        segments,
        joined.len()
    );

    if let Some(stats_path) = &args.stats_out {
        let stats = SplitStats {
            file_path: read_stats.file_path,
            bytes_in: read_stats.bytes_read,
            bytes_out: joined.len() as u64,
            segments: segments as u64,
            mapped: read_stats.mapped,
            duration_ms: start_time.elapsed().as_millis() as u64,
        };
        write_stats(stats_path, &stats)
            .await
            .with_context(|| format!("Failed to write stats to {}", stats_path.display()))?;
        info!("Stats written to {}", stats_path.display());
    }

    Ok(())
}
