#![forbid(unsafe_code)]

//! Momentum animation following [`DecelerationParameters`].

use std::time::Duration;

use super::Animation;
use crate::deceleration::DecelerationParameters;
use crate::geometry::Vec2;

/// Drives a value along the decay trajectory until `duration()` elapses.
///
/// Use this when the host has no platform animator capable of replaying a
/// scroll-like deceleration curve.
#[derive(Debug, Clone)]
pub struct DecayAnimation {
    parameters: DecelerationParameters,
    duration: Duration,
    elapsed: Duration,
}

impl DecayAnimation {
    #[must_use]
    pub fn new(parameters: DecelerationParameters) -> Self {
        Self {
            duration: parameters.duration(),
            parameters,
            elapsed: Duration::ZERO,
        }
    }

    #[inline]
    #[must_use]
    pub fn parameters(&self) -> &DecelerationParameters {
        &self.parameters
    }

    #[inline]
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Current point on the trajectory. Snaps to the destination once complete.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        if self.is_complete() {
            self.parameters.destination()
        } else {
            self.parameters.value_at(self.elapsed)
        }
    }

    /// Current velocity; zero once complete.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        if self.is_complete() {
            Vec2::ZERO
        } else {
            self.parameters.velocity_at(self.elapsed)
        }
    }
}

impl Animation for DecayAnimation {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt).min(self.duration);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0) as f32
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}
