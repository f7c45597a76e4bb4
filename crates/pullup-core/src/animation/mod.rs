#![forbid(unsafe_code)]

//! Animation primitives for panel motion.
//!
//! The panel itself never steps time: it hands an [`AnimationSpec`] to the
//! host, which either delegates to a platform animator or drives one of the
//! [`Animation`] implementations here frame by frame.
//!
//! - [`OffsetTween`]: fixed-duration interpolation between two offsets.
//! - [`DecayAnimation`]: follows the exponential-decay trajectory of a
//!   released drag until it comes to rest.

use std::time::Duration;

mod decay;
mod tween;

pub use decay::DecayAnimation;
pub use tween::OffsetTween;

/// Easing function over normalized progress.
pub type EasingFn = fn(f32) -> f32;

/// A time-driven animation.
pub trait Animation {
    /// Advance by `dt`.
    fn tick(&mut self, dt: Duration);

    /// True once the animation has reached its end value.
    fn is_complete(&self) -> bool;

    /// Normalized progress in [0.0, 1.0].
    fn value(&self) -> f32;

    /// Rewind to the start.
    fn reset(&mut self);
}

/// Identity easing.
#[inline]
#[must_use]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-out: fast start, gentle stop.
#[inline]
#[must_use]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Timing curve of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Curve {
    Linear,
    #[default]
    EaseOut,
}

impl Curve {
    #[must_use]
    pub fn easing(self) -> EasingFn {
        match self {
            Self::Linear => linear,
            Self::EaseOut => ease_out,
        }
    }
}

/// Duration and curve of an animated panel transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationSpec {
    pub duration: Duration,
    pub curve: Curve,
}

impl AnimationSpec {
    /// The panel transition: 0.3 s, ease-out.
    pub const PANEL: Self = Self {
        duration: Duration::from_millis(300),
        curve: Curve::EaseOut,
    };

    #[must_use]
    pub const fn new(duration: Duration, curve: Curve) -> Self {
        Self { duration, curve }
    }
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self::PANEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_endpoints() {
        for easing in [linear, ease_out] {
            assert_eq!(easing(0.0), 0.0);
            assert_eq!(easing(1.0), 1.0);
        }
    }

    #[test]
    fn ease_out_leads_linear() {
        for i in 1..10 {
            let t = i as f32 / 10.0;
            assert!(ease_out(t) > linear(t), "ease_out should lead at t={t}");
        }
    }

    #[test]
    fn panel_spec_is_300ms_ease_out() {
        assert_eq!(AnimationSpec::default().duration, Duration::from_millis(300));
        assert_eq!(AnimationSpec::default().curve, Curve::EaseOut);
    }
}
