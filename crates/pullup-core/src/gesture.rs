#![forbid(unsafe_code)]

//! Pan gesture input and per-gesture session state.

use crate::geometry::Vec2;
use crate::panel::Landing;

/// Phase of a pan callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PanPhase {
    Began,
    Changed,
    Ended,
    Cancelled,
}

/// Which recognizer delivered the callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PanSource {
    /// The panel's own pan recognizer.
    #[default]
    Panel,
    /// The embedded scroll surface's recognizer.
    EmbeddedScroll,
}

/// One pan callback, in the container's coordinate space.
///
/// `translation` is cumulative since the gesture began, as recognizers
/// report it; the panel derives incremental deltas itself.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PanEvent {
    pub phase: PanPhase,
    #[cfg_attr(feature = "serde", serde(default))]
    pub source: PanSource,
    pub translation: Vec2,
    #[cfg_attr(feature = "serde", serde(default))]
    pub velocity: Vec2,
}

impl PanEvent {
    #[must_use]
    pub const fn new(phase: PanPhase, source: PanSource, translation: Vec2, velocity: Vec2) -> Self {
        Self {
            phase,
            source,
            translation,
            velocity,
        }
    }

    /// A vertical-only event from the panel recognizer.
    #[must_use]
    pub const fn vertical(phase: PanPhase, translation_y: f64, velocity_y: f64) -> Self {
        Self::new(
            phase,
            PanSource::Panel,
            Vec2::vertical(translation_y),
            Vec2::vertical(velocity_y),
        )
    }

    /// Same event, attributed to `source`.
    #[must_use]
    pub const fn from_source(mut self, source: PanSource) -> Self {
        self.source = source;
        self
    }
}

/// Transient state of the gesture in progress.
///
/// Created on `Began`, updated on every callback, dropped on
/// `Ended`/`Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragSession {
    /// Translation seen by the previous callback (x forced to 0).
    pub last_translation: Vec2,
    /// Scroll offset of the embedded surface after the previous callback.
    pub scroll_offset_snapshot: Vec2,
}

/// What a pan callback did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanOutcome {
    /// Detached, hidden, or no gesture in progress.
    Ignored,
    /// Session (re)started or a phase with nothing to apply.
    Tracking,
    /// The panel followed the finger to `offset`.
    Moved { offset: f64 },
    /// The embedded scroll surface consumed the movement.
    DeferredToScroll,
    /// The gesture ended and the panel is animating to a snap target.
    Landed(Landing),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_event_has_zero_x() {
        let event = PanEvent::vertical(PanPhase::Changed, 12.0, -30.0);
        assert_eq!(event.translation, Vec2::new(0.0, 12.0));
        assert_eq!(event.velocity, Vec2::new(0.0, -30.0));
        assert_eq!(event.source, PanSource::Panel);
    }

    #[test]
    fn from_source_retags() {
        let event =
            PanEvent::vertical(PanPhase::Began, 0.0, 0.0).from_source(PanSource::EmbeddedScroll);
        assert_eq!(event.source, PanSource::EmbeddedScroll);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_defaults_source_and_velocity() {
        let event: PanEvent =
            serde_json::from_str(r#"{"phase":"changed","translation":{"x":0.0,"y":5.0}}"#)
                .expect("valid pan json");
        assert_eq!(event.source, PanSource::Panel);
        assert_eq!(event.velocity, Vec2::ZERO);
    }
}
