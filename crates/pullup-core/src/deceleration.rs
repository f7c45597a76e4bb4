#![forbid(unsafe_code)]

//! Exponential-decay deceleration, modeled on scroll-view momentum.
//!
//! A released drag keeps moving with a velocity that decays by a constant
//! factor every millisecond:
//!
//!   v(t) = v₀ · rate^(1000·t)
//!
//! Integrating gives the trajectory and its asymptote:
//!
//!   x(t) = x₀ + (rate^(1000·t) − 1) / k · v₀
//!   x(∞) = x₀ − v₀ / k
//!
//! with the decay coefficient `k = 1000 · ln(rate)`.
//!
//! # Invariants
//!
//! 1. `rate` lies strictly in (0, 1), so `k < 0` (checked on construction).
//! 2. `value_at(0) == initial_value` exactly.
//! 3. `duration()` is 0 when the initial velocity is zero; otherwise it is the
//!    time at which the remaining distance to `destination()` (equivalently
//!    `|v(t)| / |k|`) falls to `threshold`.
//! 4. `destination()`, `duration()` and `value_at()` share one coefficient.
//!
//! # Failure Modes
//!
//! - An initial speed at or below `|k| · threshold` yields a non-positive raw
//!   duration; it is clamped to zero.

use std::time::Duration;

use crate::error::DecelerationError;
use crate::geometry::Vec2;

/// Per-millisecond velocity retention used for panel release ("normal" scroll
/// deceleration).
pub const DEFAULT_DECELERATION_RATE: f64 = 0.991;

/// Residual distance, in points, below which motion is indistinguishable.
/// Divide by the screen scale to get the threshold in pixels.
pub const DEFAULT_THRESHOLD_POINTS: f64 = 0.5;

/// Validated inputs to the decay model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecelerationParameters {
    initial_value: Vec2,
    initial_velocity: Vec2,
    deceleration_rate: f64,
    threshold: f64,
}

impl DecelerationParameters {
    /// Build parameters, rejecting rates outside (0, 1) and non-positive
    /// thresholds.
    pub fn new(
        initial_value: Vec2,
        initial_velocity: Vec2,
        deceleration_rate: f64,
        threshold: f64,
    ) -> Result<Self, DecelerationError> {
        validate_rate(deceleration_rate)?;
        if !(threshold.is_finite() && threshold > 0.0) {
            return Err(DecelerationError::InvalidThreshold { threshold });
        }
        Ok(Self {
            initial_value,
            initial_velocity,
            deceleration_rate,
            threshold,
        })
    }

    /// Threshold of half a physical pixel at `screen_scale`.
    ///
    /// Non-finite or non-positive scales fall back to 1.
    #[must_use]
    pub fn pixel_threshold(screen_scale: f64) -> f64 {
        let scale = if screen_scale.is_finite() && screen_scale > 0.0 {
            screen_scale
        } else {
            1.0
        };
        DEFAULT_THRESHOLD_POINTS / scale
    }

    #[inline]
    #[must_use]
    pub fn initial_value(&self) -> Vec2 {
        self.initial_value
    }

    #[inline]
    #[must_use]
    pub fn initial_velocity(&self) -> Vec2 {
        self.initial_velocity
    }

    #[inline]
    #[must_use]
    pub fn deceleration_rate(&self) -> f64 {
        self.deceleration_rate
    }

    #[inline]
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// `1000 · ln(rate)`; always negative.
    #[inline]
    #[must_use]
    pub fn decay_coefficient(&self) -> f64 {
        1000.0 * self.deceleration_rate.ln()
    }

    /// Asymptotic resting point if velocity decayed forever.
    #[must_use]
    pub fn destination(&self) -> Vec2 {
        let k = self.decay_coefficient();
        self.initial_value.sub(self.initial_velocity.div(k))
    }

    /// Time until the trajectory is within `threshold` of its destination.
    #[must_use]
    pub fn duration(&self) -> Duration {
        let speed = self.initial_velocity.length();
        if speed <= 0.0 {
            return Duration::ZERO;
        }
        let k = self.decay_coefficient();
        let secs = (-k * self.threshold / speed).ln() / k;
        if secs.is_finite() && secs > 0.0 {
            Duration::from_secs_f64(secs)
        } else {
            Duration::ZERO
        }
    }

    /// Position along the decay trajectory at `time` after release.
    #[must_use]
    pub fn value_at(&self, time: Duration) -> Vec2 {
        let k = self.decay_coefficient();
        let decay = self.deceleration_rate.powf(1000.0 * time.as_secs_f64());
        self.initial_value
            .add(self.initial_velocity.scale((decay - 1.0) / k))
    }

    /// Velocity along the decay trajectory at `time` after release.
    #[must_use]
    pub fn velocity_at(&self, time: Duration) -> Vec2 {
        let decay = self.deceleration_rate.powf(1000.0 * time.as_secs_f64());
        self.initial_velocity.scale(decay)
    }
}

/// Check that `rate` lies strictly in (0, 1).
pub fn validate_rate(rate: f64) -> Result<(), DecelerationError> {
    if rate.is_finite() && rate > 0.0 && rate < 1.0 {
        Ok(())
    } else {
        Err(DecelerationError::InvalidRate { rate })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(y: f64, vy: f64) -> DecelerationParameters {
        DecelerationParameters::new(
            Vec2::vertical(y),
            Vec2::vertical(vy),
            DEFAULT_DECELERATION_RATE,
            DecelerationParameters::pixel_threshold(3.0),
        )
        .expect("default parameters are valid")
    }

    #[test]
    fn coefficient_is_negative() {
        assert!(params(0.0, 100.0).decay_coefficient() < 0.0);
    }

    #[test]
    fn value_at_zero_is_initial_value() {
        let p = params(123.5, -2400.0);
        assert_eq!(p.value_at(Duration::ZERO), p.initial_value());
    }

    #[test]
    fn zero_velocity_has_zero_duration() {
        let p = params(40.0, 0.0);
        assert_eq!(p.duration(), Duration::ZERO);
        assert_eq!(p.destination(), Vec2::vertical(40.0));
    }

    #[test]
    fn destination_follows_velocity_sign() {
        assert!(params(100.0, 1000.0).destination().y > 100.0);
        assert!(params(100.0, -1000.0).destination().y < 100.0);
    }

    #[test]
    fn destination_known_value() {
        // k = 1000 * ln(0.991) ≈ -9.0407; 1000 / 9.0407 ≈ 110.61
        let p = params(0.0, 1000.0);
        let expected = -1000.0 / (1000.0 * 0.991f64.ln());
        assert!((p.destination().y - expected).abs() < 1e-9);
        assert!((p.destination().y - 110.61).abs() < 0.01);
    }

    #[test]
    fn value_at_duration_is_within_threshold_of_destination() {
        let p = params(300.0, 2500.0);
        let end = p.value_at(p.duration());
        let gap = end.sub(p.destination()).length();
        assert!(
            (gap - p.threshold()).abs() < 1e-6,
            "gap {gap} should equal threshold {}",
            p.threshold()
        );
    }

    #[test]
    fn residual_velocity_matches_threshold_distance() {
        let p = params(0.0, 1800.0);
        let v = p.velocity_at(p.duration()).length();
        let expected = p.threshold() * p.decay_coefficient().abs();
        assert!((v - expected).abs() < 1e-6, "residual speed {v}, expected {expected}");
    }

    #[test]
    fn slow_release_clamps_duration_to_zero() {
        let p = params(0.0, 0.01);
        assert_eq!(p.duration(), Duration::ZERO);
    }

    #[test]
    fn rejects_rate_outside_unit_interval() {
        for rate in [0.0, 1.0, 1.2, -0.5, f64::NAN] {
            let err = DecelerationParameters::new(Vec2::ZERO, Vec2::ZERO, rate, 0.5);
            assert!(
                matches!(err, Err(DecelerationError::InvalidRate { .. })),
                "rate {rate} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_non_positive_threshold() {
        let err = DecelerationParameters::new(Vec2::ZERO, Vec2::ZERO, 0.99, 0.0);
        assert!(matches!(err, Err(DecelerationError::InvalidThreshold { .. })));
    }

    #[test]
    fn pixel_threshold_falls_back_for_bad_scale() {
        assert_eq!(DecelerationParameters::pixel_threshold(2.0), 0.25);
        assert_eq!(DecelerationParameters::pixel_threshold(0.0), 0.5);
        assert_eq!(DecelerationParameters::pixel_threshold(f64::NAN), 0.5);
    }
}
