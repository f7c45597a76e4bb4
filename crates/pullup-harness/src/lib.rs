#![forbid(unsafe_code)]

//! Headless test harness for `pullup-core`.
//!
//! - [`host::HeadlessHost`]: an in-memory [`PanelHost`](pullup_core::PanelHost)
//!   with a stepped ease-out animator, an optional embedded scroll view and a
//!   content view that records alpha.
//! - [`simulation::Simulation`]: a fixed-step clock that forwards frames and
//!   animation completions to the panel and synthesizes drags.
//! - [`trace`]: JSONL gesture traces and deterministic replay.

pub mod host;
pub mod simulation;
pub mod trace;

pub use host::{HeadlessHost, HeadlessScroll, HostStep, RecordingContent};
pub use simulation::{FRAME, Simulation};
pub use trace::{GestureTrace, ReplaySummary, TraceError, TraceHeader, TraceRecord, replay_trace};
