//! framewalk core library: multi-protocol packet dissection.
//!
//! A capture source yields frames; the pipeline hands each one to the
//! dissector registered for its link type, and every dissector reads its
//! header through a bounded [`engine::Cursor`], records a layer and
//! dispatches the rest of the frame onward by type code. Record sequences
//! (options, attributes, capabilities, parameters) go through one shared
//! [`engine::TlvWalker`].
//!
//! Invariants:
//! - No read ever goes past the captured bytes of a frame; running out is
//!   reported as truncation, a self-inconsistent length as corruption.
//! - A truncated or corrupt frame never stops the capture.
//! - Unknown type codes are rendered as raw payload, never as errors.
//! - Addresses and ports are rendered through one shared, thread-safe
//!   [`names::NameCache`].
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use framewalk_core::config::DissectOptions;
//! use framewalk_core::dissect_pcap_file;
//! use framewalk_core::names::NameCache;
//!
//! let names = NameCache::default();
//! let report = dissect_pcap_file(Path::new("capture.pcap"), DissectOptions::default(), &names)?;
//! for frame in &report.frames {
//!     println!("{}", frame.render_text());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::path::Path;

use serde::Serialize;

pub mod config;
pub mod engine;
pub mod names;
pub mod pipeline;
pub mod protocols;
pub mod source;

use config::DissectOptions;
use names::{CacheStats, NameCache};
use pipeline::{CaptureSummary, FrameDissection, FramePipeline, PipelineError};

pub use source::{PacketEvent, PacketSource, PcapFileSource, SourceError};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when no capture time is available.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Every dissected frame of one capture, in capture order.
///
/// # Examples
/// ```
/// use framewalk_core::make_stub_report;
///
/// let report = make_stub_report("capture.pcap", 123);
/// assert_eq!(report.report_version, framewalk_core::REPORT_VERSION);
/// assert!(report.frames.is_empty());
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    pub tool: ToolInfo,
    /// RFC3339 time of the first frame, or [`DEFAULT_GENERATED_AT`].
    pub generated_at: String,
    pub input: InputInfo,
    pub summary: CaptureSummary,
    pub name_cache: CacheStats,
    pub frames: Vec<FrameDissection>,
}

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Input capture metadata embedded in reports.
///
/// # Examples
/// ```
/// use framewalk_core::InputInfo;
///
/// let input = InputInfo {
///     path: "capture.pcapng".to_string(),
///     bytes: 1024,
/// };
/// assert_eq!(input.bytes, 1024);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct InputInfo {
    /// Input path as provided by the caller.
    pub path: String,
    pub bytes: u64,
}

/// Report with base fields filled, no frames and an empty summary.
pub fn make_stub_report(input_path: &str, input_bytes: u64) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "framewalk".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        summary: CaptureSummary::default(),
        name_cache: CacheStats::default(),
        frames: Vec::new(),
    }
}

/// Dissect every frame of a pcap or pcapng file into a [`Report`].
pub fn dissect_pcap_file(
    path: &Path,
    options: DissectOptions,
    names: &NameCache,
) -> Result<Report, PipelineError> {
    let mut source = PcapFileSource::open(path)?;
    dissect_source(path, &mut source, options, names)
}

/// Dissect every frame `source` yields into a [`Report`] for `path`.
pub fn dissect_source<S: PacketSource>(
    path: &Path,
    source: &mut S,
    options: DissectOptions,
    names: &NameCache,
) -> Result<Report, PipelineError> {
    let pipeline = FramePipeline::builtin(names, options);
    let mut frames = Vec::new();
    let summary = pipeline.run(source, |frame| {
        frames.push(frame);
        Ok(())
    })?;

    let mut report = make_stub_report(&path.display().to_string(), path.metadata()?.len());
    if let Some(start) = &summary.time_start {
        report.generated_at = start.clone();
    }
    report.summary = summary;
    report.name_cache = names.stats();
    report.frames = frames;
    Ok(report)
}
