// Forbid unsafe in production; deny in tests.
#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

//! Core: a draggable bottom-sheet ("pullup") panel and its release physics.
//!
//! # Role
//! `pullup-core` owns the interaction logic of a panel that is dragged
//! between discrete vertical snap states. Everything platform-specific (view
//! hierarchy, layout engine, animator, gesture recognizers) is reached
//! through the traits in [`host`], so the crate is testable headlessly.
//!
//! # Primary responsibilities
//! - **Deceleration**: exponential-decay model projecting where a released
//!   drag would come to rest ([`deceleration`]).
//! - **PullupPanel**: attachment lifecycle, state transitions, pan handling,
//!   landing resolution and scroll cooperation ([`panel`]).
//! - **SnapTable**: ordered `(offset, state)` targets recomputed from the
//!   current geometry ([`snap`]).
//!
//! # How it fits in the system
//! A host adapter implements [`host::PanelHost`] and forwards pan events,
//! frame changes and animation completions to [`panel::PullupPanel`]. The
//! `pullup-harness` crate provides an in-memory host for tests and replay.

pub mod animation;
pub mod config;
pub mod deceleration;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod host;
pub mod logging;
pub mod panel;
pub mod snap;
pub mod state;

pub use config::PanelConfig;
pub use deceleration::DecelerationParameters;
pub use error::{ConfigError, DecelerationError, PanelError, Result};
pub use geometry::{Rect, Vec2};
pub use gesture::{PanEvent, PanOutcome, PanPhase, PanSource};
pub use host::{AnimationTicket, Constraint, HostMetrics, PanelDelegate, PanelHost};
pub use panel::{Landing, PullupPanel};
pub use snap::{SnapTable, SnapTarget};
pub use state::PanelState;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, trace, warn};
