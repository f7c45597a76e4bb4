#![forbid(unsafe_code)]

//! Gesture traces: recorded pan input replayed against a headless panel.
//!
//! # Format
//!
//! JSONL. The first line is a header, every following line is one record:
//!
//! ```text
//! {"kind":"header","schema_version":1,"metrics":{..},"config":{..},"initial_state":"collapsed"}
//! {"kind":"pan","phase":"began","translation":{"x":0.0,"y":0.0}}
//! {"kind":"pan","phase":"changed","translation":{"x":0.0,"y":-120.0},"velocity":{"x":0.0,"y":-900.0}}
//! {"kind":"advance","ms":16}
//! {"kind":"set_state","state":"hidden","animated":true}
//! ```
//!
//! Blank lines are skipped. `config` fields default individually; a header
//! may also carry `scroll_offset` to give the host an embedded scroll view.
//!
//! # Determinism
//!
//! A replay is a pure function of the trace: the summary checksum is a
//! `blake3` hash over every recorded outcome, so two replays of the same
//! trace must produce the same checksum.

use std::fs;
use std::path::Path;
use std::time::Duration;

use pullup_core::{HostMetrics, PanEvent, PanOutcome, PanelConfig, PanelError, PanelState};
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span};

use crate::host::HeadlessHost;
use crate::simulation::Simulation;

/// Current trace schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// First line of a trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceHeader {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub metrics: HostMetrics,
    #[serde(default)]
    pub config: PanelConfig,
    pub initial_state: PanelState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_offset: Option<f64>,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// One line of a trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceRecord {
    Header(TraceHeader),
    Pan(PanEvent),
    Advance { ms: u64 },
    SetState { state: PanelState, animated: bool },
}

/// Errors raised while loading or replaying a trace.
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("failed to read trace: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("trace has no header line")]
    MissingHeader,

    #[error("line {line}: unexpected second header")]
    DuplicateHeader { line: usize },

    #[error("unsupported trace schema version {0}")]
    UnsupportedVersion(u32),

    #[error(transparent)]
    Panel(#[from] PanelError),
}

/// A parsed trace.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureTrace {
    pub header: TraceHeader,
    pub records: Vec<TraceRecord>,
}

impl GestureTrace {
    #[must_use]
    pub fn new(header: TraceHeader) -> Self {
        Self {
            header,
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, record: TraceRecord) {
        self.records.push(record);
    }

    /// Parse JSONL text.
    pub fn parse(text: &str) -> Result<Self, TraceError> {
        let mut header = None;
        let mut records = Vec::new();

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            let record: TraceRecord = serde_json::from_str(raw)
                .map_err(|source| TraceError::Json { line, source })?;
            match (record, &header) {
                (TraceRecord::Header(h), None) => header = Some(h),
                (TraceRecord::Header(_), Some(_)) => {
                    return Err(TraceError::DuplicateHeader { line });
                }
                (_, None) => return Err(TraceError::MissingHeader),
                (record, Some(_)) => records.push(record),
            }
        }

        let header = header.ok_or(TraceError::MissingHeader)?;
        if header.schema_version != SCHEMA_VERSION {
            return Err(TraceError::UnsupportedVersion(header.schema_version));
        }
        Ok(Self { header, records })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Serialize back to JSONL, header first.
    pub fn to_jsonl(&self) -> Result<String, TraceError> {
        let mut out = String::new();
        let header = TraceRecord::Header(self.header.clone());
        for (index, record) in std::iter::once(&header).chain(&self.records).enumerate() {
            let line = serde_json::to_string(record).map_err(|source| TraceError::Json {
                line: index + 1,
                source,
            })?;
            out.push_str(&line);
            out.push('\n');
        }
        Ok(out)
    }
}

/// Result of [`replay_trace`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReplaySummary {
    pub final_state: PanelState,
    /// Settled on-screen offset.
    pub final_offset: Option<f64>,
    /// State after each change, starting with the initial state.
    pub states: Vec<PanelState>,
    pub landings: usize,
    pub deferred_to_scroll: usize,
    pub ignored: usize,
    /// Hex `blake3` digest over every outcome of the run.
    pub checksum: String,
}

/// Replay `trace` on a fresh headless panel and settle all animations.
pub fn replay_trace(trace: &GestureTrace) -> Result<ReplaySummary, TraceError> {
    let _span = info_span!("pullup.replay", records = trace.records.len()).entered();

    let header = &trace.header;
    let mut host = HeadlessHost::new(header.metrics).with_content();
    if let Some(offset) = header.scroll_offset {
        host = host.with_scroll(offset);
    }
    let mut sim = Simulation::new(header.config.clone(), host, header.initial_state)?;

    let mut hasher = blake3::Hasher::new();
    let mut states = vec![sim.state()];
    let mut landings = 0;
    let mut deferred_to_scroll = 0;
    let mut ignored = 0;

    for record in &trace.records {
        match record {
            TraceRecord::Header(_) => {}
            TraceRecord::Pan(event) => {
                let outcome = sim.pan(*event);
                match outcome {
                    PanOutcome::Landed(_) => landings += 1,
                    PanOutcome::DeferredToScroll => deferred_to_scroll += 1,
                    PanOutcome::Ignored => ignored += 1,
                    PanOutcome::Tracking | PanOutcome::Moved { .. } => {}
                }
                hasher.update(format!("{outcome:?}\n").as_bytes());
            }
            TraceRecord::Advance { ms } => sim.advance(Duration::from_millis(*ms)),
            TraceRecord::SetState { state, animated } => sim.set_state(*state, *animated),
        }
        if states.last() != Some(&sim.state()) {
            states.push(sim.state());
        }
        hasher.update(format!("{:?} {:?}\n", sim.state(), sim.presented_offset()).as_bytes());
    }

    sim.settle();
    let summary = ReplaySummary {
        final_state: sim.state(),
        final_offset: sim.presented_offset(),
        states,
        landings,
        deferred_to_scroll,
        ignored,
        checksum: hasher.finalize().to_hex().to_string(),
    };
    debug!(
        final_state = ?summary.final_state,
        landings = summary.landings,
        checksum = %summary.checksum,
        "trace replayed"
    );
    Ok(summary)
}
