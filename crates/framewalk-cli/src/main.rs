use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use glob::glob;
use tracing_subscriber::EnvFilter;

use framewalk_core::PcapFileSource;
use framewalk_core::config::{DissectOptions, Verbosity};
use framewalk_core::engine::builtin_registry;
use framewalk_core::names::{HostsResolver, NameCache, NameCacheConfig};
use framewalk_core::pipeline::{CaptureSummary, FramePipeline};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("FRAMEWALK_BUILD_COMMIT"),
    " ",
    env!("FRAMEWALK_BUILD_DATE"),
    ")"
);

const EXAMPLES: &str = "Examples:\n  framewalk pcap dissect capture.pcap\n  framewalk pcap read capture.pcapng -vv --resolve\n  framewalk pcap dissect 'captures/*.pcap' --json --summary";

#[derive(Parser, Debug)]
#[command(name = "framewalk")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Offline multi-protocol packet dissector for pcap and pcapng captures.",
    long_about = None,
    after_help = EXAMPLES
)]
struct Cli {
    /// Log filter used when RUST_LOG is not set (e.g. warn, debug, framewalk_core=trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on PCAP/PCAPNG inputs.
    Pcap {
        #[command(subcommand)]
        command: PcapCommands,
    },
    /// List the built-in dissector table.
    Protocols,
}

#[derive(Subcommand, Debug)]
enum PcapCommands {
    /// Dissect every frame of a capture and print one line per frame.
    #[command(alias = "read")]
    #[command(after_help = EXAMPLES)]
    Dissect(DissectArgs),
}

#[derive(clap::Args, Debug)]
struct DissectArgs {
    /// Path (or glob matching one file) to a .pcap or .pcapng file
    input: PathBuf,

    /// Per-record detail; repeat for more (capped at -vv)
    #[arg(short = 'v', action = ArgAction::Count)]
    verbose: u8,

    /// Print link-layer addresses
    #[arg(short = 'e')]
    link_addresses: bool,

    /// Resolve addresses and ports to names
    #[arg(long)]
    resolve: bool,

    /// Hosts file consulted for address names
    #[arg(long, requires = "resolve")]
    hosts: Option<PathBuf>,

    /// Upper bound on a single name lookup
    #[arg(long, default_value_t = 250)]
    resolver_timeout_ms: u64,

    /// Print one JSON object per frame instead of text
    #[arg(long)]
    json: bool,

    /// Print capture counters to stderr when done
    #[arg(long)]
    summary: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let result = match cli.command {
        Commands::Pcap { command } => match command {
            PcapCommands::Dissect(args) => cmd_pcap_dissect(args),
        },
        Commands::Protocols => cmd_protocols(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

fn cmd_pcap_dissect(args: DissectArgs) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&args.input)?;
    validate_input_file(&resolved_input)?;

    let meta = fs::metadata(&resolved_input)
        .with_context(|| format!("Failed to read input file: {}", resolved_input.display()))?;
    if !meta.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", args.input.display()),
            Some("use a .pcap or .pcapng file".to_string()),
        ));
    }

    let names = build_name_cache(&args)?;
    let options = DissectOptions {
        resolve_names: args.resolve,
        verbosity: Verbosity::from_level(args.verbose),
        emit_link_addresses: args.link_addresses,
    };
    tracing::debug!(input = %resolved_input.display(), ?options, "dissecting capture");

    let mut source = PcapFileSource::open(&resolved_input)
        .with_context(|| format!("Failed to open capture: {}", resolved_input.display()))?;
    let pipeline = FramePipeline::new(builtin_registry(), &names, options);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let json = args.json;
    let summary = pipeline
        .run(&mut source, |frame| {
            if json {
                serde_json::to_writer(&mut out, &frame)?;
                writeln!(out)
            } else {
                writeln!(out, "{}", frame.render_text())
            }
        })
        .context("PCAP/PCAPNG dissection failed")?;
    out.flush().context("Failed to write output")?;

    if args.summary {
        print_summary(&summary, &names);
    }
    Ok(())
}

fn build_name_cache(args: &DissectArgs) -> Result<NameCache, CliError> {
    let config = NameCacheConfig {
        resolver_timeout: Duration::from_millis(args.resolver_timeout_ms),
    };
    let names = NameCache::new(config);
    let Some(hosts) = &args.hosts else {
        return Ok(names);
    };
    let resolver = HostsResolver::load(hosts).map_err(|err| {
        CliError::new(
            format!("cannot read hosts file {}: {err}", hosts.display()),
            Some("pass an /etc/hosts-style file".to_string()),
        )
    })?;
    tracing::debug!(entries = resolver.len(), "hosts resolver loaded");
    Ok(names.with_resolver(Arc::new(resolver)))
}

fn print_summary(summary: &CaptureSummary, names: &NameCache) {
    eprintln!(
        "{} frames: {} decoded, {} truncated, {} corrupt, {} with local corruption",
        summary.frames_total,
        summary.decoded,
        summary.truncated,
        summary.corrupt,
        summary.local_corruptions
    );
    eprintln!(
        "{} bytes captured, {} bytes on the wire",
        summary.bytes_captured, summary.bytes_wire
    );
    if let (Some(start), Some(end)) = (&summary.time_start, &summary.time_end) {
        eprintln!("first frame {start}, last frame {end}");
    }
    let stats = names.stats();
    eprintln!(
        "name cache: {} entries, {} hits, {} misses, {} resolver calls ({} timed out)",
        stats.entries, stats.hits, stats.misses, stats.resolver_calls, stats.resolver_timeouts
    );
}

fn cmd_protocols() -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for entry in builtin_registry().entries() {
        writeln!(out, "{:<14} {:<#10x} {}", entry.layer.as_str(), entry.code, entry.name)
            .context("Failed to write output")?;
    }
    out.flush().context("Failed to write output")?;
    Ok(())
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a .pcap or .pcapng file".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "pcap" && ext != "pcapng" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .pcap or .pcapng file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern; expected .pcap or .pcapng".to_string()),
        ));
    }
    if matches.len() > 1 {
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let more = if matches.len() > 3 { ", ..." } else { "" };
        return Err(CliError::new(
            format!(
                "multiple files match pattern '{}' ({} matches); matches: {listed}{more}",
                pattern,
                matches.len()
            ),
            Some("pass a single capture file, or run once per file".to_string()),
        ));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
