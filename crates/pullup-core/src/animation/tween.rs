#![forbid(unsafe_code)]

//! Fixed-duration offset interpolation.
//!
//! # Invariants
//!
//! 1. `offset()` equals `from` before the first tick and `to` once complete.
//! 2. Zero-duration tweens complete on construction.
//! 3. `retarget()` restarts from the current offset, so a superseded
//!    transition never jumps.

use std::time::Duration;

use super::{Animation, AnimationSpec};

/// Interpolates a scalar offset from `from` to `to` along an [`AnimationSpec`].
#[derive(Debug, Clone)]
pub struct OffsetTween {
    from: f64,
    to: f64,
    spec: AnimationSpec,
    elapsed: Duration,
}

impl OffsetTween {
    #[must_use]
    pub fn new(from: f64, to: f64, spec: AnimationSpec) -> Self {
        Self {
            from,
            to,
            spec,
            elapsed: Duration::ZERO,
        }
    }

    /// Offset the current transition started from.
    #[inline]
    #[must_use]
    pub fn start(&self) -> f64 {
        self.from
    }

    /// Offset the current transition ends at.
    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.to
    }

    /// Current interpolated offset.
    #[must_use]
    pub fn offset(&self) -> f64 {
        let eased = f64::from((self.spec.curve.easing())(self.value()));
        self.from + (self.to - self.from) * eased
    }

    /// Start a new transition from the current offset toward `to`.
    pub fn retarget(&mut self, to: f64) {
        self.from = self.offset();
        self.to = to;
        self.elapsed = Duration::ZERO;
    }
}

impl Animation for OffsetTween {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt).min(self.spec.duration);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.spec.duration
    }

    fn value(&self) -> f32 {
        if self.spec.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.spec.duration.as_secs_f64()).clamp(0.0, 1.0) as f32
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Curve;

    const MS_16: Duration = Duration::from_millis(16);

    #[test]
    fn starts_at_from_and_ends_at_to() {
        let mut tween = OffsetTween::new(300.0, 0.0, AnimationSpec::PANEL);
        assert_eq!(tween.offset(), 300.0);
        for _ in 0..30 {
            tween.tick(MS_16);
        }
        assert!(tween.is_complete());
        assert_eq!(tween.offset(), 0.0);
    }

    #[test]
    fn ease_out_covers_more_than_half_at_midpoint() {
        let mut tween = OffsetTween::new(0.0, 100.0, AnimationSpec::PANEL);
        tween.tick(Duration::from_millis(150));
        assert!(tween.offset() > 50.0, "offset: {}", tween.offset());
    }

    #[test]
    fn linear_curve_is_proportional() {
        let spec = AnimationSpec::new(Duration::from_millis(200), Curve::Linear);
        let mut tween = OffsetTween::new(0.0, 100.0, spec);
        tween.tick(Duration::from_millis(50));
        assert!((tween.offset() - 25.0).abs() < 1e-6);
    }

    #[test]
    fn zero_duration_is_immediately_complete() {
        let spec = AnimationSpec::new(Duration::ZERO, Curve::EaseOut);
        let tween = OffsetTween::new(10.0, 20.0, spec);
        assert!(tween.is_complete());
        assert_eq!(tween.offset(), 20.0);
    }

    #[test]
    fn retarget_continues_from_current_offset() {
        let mut tween = OffsetTween::new(0.0, 100.0, AnimationSpec::PANEL);
        tween.tick(Duration::from_millis(100));
        let mid = tween.offset();
        tween.retarget(-50.0);
        assert_eq!(tween.start(), mid);
        assert_eq!(tween.target(), -50.0);
        assert_eq!(tween.offset(), mid);
        assert!(!tween.is_complete());
    }

    #[test]
    fn reset_rewinds() {
        let mut tween = OffsetTween::new(5.0, 15.0, AnimationSpec::PANEL);
        tween.tick(Duration::from_secs(1));
        tween.reset();
        assert_eq!(tween.offset(), 5.0);
    }
}
