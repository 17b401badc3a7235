//! Frame pipeline.
//!
//! For each captured frame: build a [`FrameView`], dispatch on the capture's
//! link type, and collect the layers until the chain finishes or stops on a
//! truncated or corrupt field. A stopped frame never stops the capture.

mod dissection;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::config::DissectOptions;
use crate::engine::{
    DissectError, Dissection, FrameView, LayerId, Outcome, Registry, builtin_registry,
    truncation_marker,
};
use crate::names::NameCache;
use crate::source::{PacketEvent, PacketSource, SourceError};

pub use dissection::FrameDissection;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// Per-capture counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptureSummary {
    pub frames_total: u64,
    pub decoded: u64,
    pub truncated: u64,
    pub corrupt: u64,
    /// Decoded frames in which some record sequence was abandoned.
    pub local_corruptions: u64,
    pub bytes_captured: u64,
    pub bytes_wire: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
}

/// Accumulates a [`CaptureSummary`] frame by frame.
#[derive(Debug, Default)]
pub struct SummaryBuilder {
    summary: CaptureSummary,
    first_ts: Option<f64>,
    last_ts: Option<f64>,
}

impl SummaryBuilder {
    pub fn record(&mut self, frame: &FrameDissection, ts: Option<f64>) {
        let summary = &mut self.summary;
        summary.frames_total += 1;
        match frame.outcome {
            Outcome::Decoded => summary.decoded += 1,
            Outcome::Truncated => summary.truncated += 1,
            Outcome::Corrupt => summary.corrupt += 1,
        }
        if frame.local_corruptions() > 0 {
            summary.local_corruptions += 1;
        }
        summary.bytes_captured += frame.captured_length as u64;
        summary.bytes_wire += frame.wire_length as u64;
        update_ts_bounds(&mut self.first_ts, &mut self.last_ts, ts);
    }

    pub fn finish(self) -> CaptureSummary {
        CaptureSummary {
            time_start: ts_to_rfc3339(self.first_ts),
            time_end: ts_to_rfc3339(self.last_ts),
            ..self.summary
        }
    }
}

/// Dissects frames against one registry, name cache and option set.
pub struct FramePipeline<'r> {
    registry: &'r Registry,
    names: &'r NameCache,
    options: DissectOptions,
}

impl<'r> FramePipeline<'r> {
    pub fn new(registry: &'r Registry, names: &'r NameCache, options: DissectOptions) -> Self {
        Self {
            registry,
            names,
            options,
        }
    }

    /// Pipeline over the built-in dissector table.
    pub fn builtin(names: &'r NameCache, options: DissectOptions) -> Self {
        Self::new(builtin_registry(), names, options)
    }

    pub fn options(&self) -> &DissectOptions {
        &self.options
    }

    /// Dissect one frame captured with `linktype`.
    pub fn dissect(
        &self,
        frame: &FrameView<'_>,
        linktype: u32,
        frame_number: u64,
        ts: Option<f64>,
    ) -> FrameDissection {
        let mut ctx = Dissection::new(self.registry, self.names, &self.options)
            .with_short_capture(frame.is_short());
        let result = ctx.dispatch(LayerId::LinkType, u64::from(linktype), frame.cursor());
        let layers = ctx.into_layers();

        let (consumed, outcome, marker) = match result {
            Ok(consumed) if frame.is_short() => {
                let innermost = layers.last().map_or("frame", |layer| layer.protocol);
                (
                    consumed,
                    Outcome::Truncated,
                    Some(truncation_marker(innermost)),
                )
            }
            Ok(consumed) => (consumed, Outcome::Decoded, None),
            Err(err) => {
                tracing::debug!(
                    frame = frame_number,
                    outcome = ?err.outcome(),
                    error = %err,
                    "frame dissection stopped early"
                );
                let stopped_at = match &err {
                    DissectError::Truncated { offset, .. }
                    | DissectError::Corrupt { offset, .. } => *offset,
                };
                (
                    stopped_at.min(frame.captured_length()),
                    err.outcome(),
                    Some(err.marker()),
                )
            }
        };

        FrameDissection {
            frame_number,
            timestamp: ts_to_rfc3339(ts),
            captured_length: frame.captured_length(),
            wire_length: frame.wire_length(),
            consumed,
            layers,
            outcome,
            marker,
        }
    }

    pub fn dissect_event(&self, event: &PacketEvent, frame_number: u64) -> FrameDissection {
        let linktype = u32::try_from(event.linktype.0).unwrap_or(u32::MAX);
        self.dissect(&event.frame(), linktype, frame_number, event.ts)
    }

    /// Dissect every frame `source` yields, in capture order, handing each to
    /// `sink`. Only source or sink failures end the run.
    pub fn run<S, F>(&self, source: &mut S, mut sink: F) -> Result<CaptureSummary, PipelineError>
    where
        S: PacketSource,
        F: FnMut(FrameDissection) -> std::io::Result<()>,
    {
        let mut summary = SummaryBuilder::default();
        let mut frame_number = 0u64;
        while let Some(event) = source.next_packet()? {
            frame_number += 1;
            let frame = self.dissect_event(&event, frame_number);
            summary.record(&frame, event.ts);
            sink(frame)?;
        }
        let summary = summary.finish();
        tracing::debug!(
            frames = summary.frames_total,
            truncated = summary.truncated,
            corrupt = summary.corrupt,
            "capture dissected"
        );
        Ok(summary)
    }
}

pub(crate) fn update_ts_bounds(first: &mut Option<f64>, last: &mut Option<f64>, ts: Option<f64>) {
    let ts = match ts {
        Some(ts) => ts,
        None => return,
    };
    match first {
        None => *first = Some(ts),
        Some(existing) => {
            if ts < *existing {
                *first = Some(ts);
            }
        }
    }
    match last {
        None => *last = Some(ts),
        Some(existing) => {
            if ts > *existing {
                *last = Some(ts);
            }
        }
    }
}

pub(crate) fn ts_to_rfc3339(ts: Option<f64>) -> Option<String> {
    let ts = ts?;
    let nanos = (ts * 1_000_000_000.0) as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
}
