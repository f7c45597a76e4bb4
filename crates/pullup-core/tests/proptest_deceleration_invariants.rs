//! Property-based invariant tests for the decay model and snap selection.
//!
//! 1. `value_at(0)` reproduces the initial value exactly
//! 2. At `duration()` the trajectory is within `threshold` of `destination()`
//! 3. Zero velocity means zero duration and no travel
//! 4. The trajectory is monotone and never overshoots the destination
//! 5. `nearest` returns an entry at minimal distance, earliest on ties

use std::time::Duration;

use proptest::prelude::*;
use pullup_core::deceleration::{DEFAULT_THRESHOLD_POINTS, DecelerationParameters};
use pullup_core::{PanelState, SnapTable, SnapTarget, Vec2};

// ── Strategies ──────────────────────────────────────────────────────────

fn rate_strategy() -> impl Strategy<Value = f64> {
    0.9f64..0.999
}

fn scale_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![Just(1.0), Just(2.0), Just(3.0)]
}

fn build(y: f64, vy: f64, rate: f64, scale: f64) -> DecelerationParameters {
    DecelerationParameters::new(
        Vec2::vertical(y),
        Vec2::vertical(vy),
        rate,
        DecelerationParameters::pixel_threshold(scale),
    )
    .expect("generated parameters are valid")
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn value_at_zero_is_exact(
        y in -5000.0f64..5000.0,
        vy in -8000.0f64..8000.0,
        rate in rate_strategy(),
        scale in scale_strategy(),
    ) {
        let p = build(y, vy, rate, scale);
        prop_assert_eq!(p.value_at(Duration::ZERO), Vec2::vertical(y));
    }

    #[test]
    fn ends_within_threshold_of_destination(
        y in -5000.0f64..5000.0,
        vy in -8000.0f64..8000.0,
        rate in rate_strategy(),
        scale in scale_strategy(),
    ) {
        let p = build(y, vy, rate, scale);
        let end = p.value_at(p.duration());
        let gap = end.sub(p.destination()).length();
        prop_assert!(
            gap <= p.threshold() * (1.0 + 1e-6) + 1e-9,
            "gap {} exceeds threshold {} (duration {:?})", gap, p.threshold(), p.duration()
        );
    }

    #[test]
    fn zero_velocity_goes_nowhere(
        y in -5000.0f64..5000.0,
        rate in rate_strategy(),
        scale in scale_strategy(),
    ) {
        let p = build(y, 0.0, rate, scale);
        prop_assert_eq!(p.duration(), Duration::ZERO);
        prop_assert_eq!(p.destination(), Vec2::vertical(y));
    }

    #[test]
    fn trajectory_is_monotone_without_overshoot(
        vy in prop_oneof![-8000.0f64..-1.0, 1.0f64..8000.0],
        rate in rate_strategy(),
    ) {
        let p = build(0.0, vy, rate, 2.0);
        let destination = p.destination().y;
        let mut previous = 0.0f64;
        for ms in (0..=2000).step_by(50) {
            let y = p.value_at(Duration::from_millis(ms)).y;
            prop_assert!((y - previous) * vy.signum() >= -1e-9, "reversed at {}ms", ms);
            prop_assert!((destination - y) * vy.signum() >= -1e-9, "overshot at {}ms", ms);
            previous = y;
        }
    }

    #[test]
    fn nearest_minimizes_distance(
        offsets in proptest::collection::vec(0.0f64..1000.0, 1..6),
        projected in -500.0f64..1500.0,
    ) {
        let table = SnapTable::new(
            offsets.iter().map(|&o| SnapTarget::new(o, PanelState::HalfState)),
        );
        let best = table.nearest(projected).expect("non-empty table");
        let best_distance = (projected - best.offset).abs();
        let first_best = offsets
            .iter()
            .position(|o| (projected - o).abs() == best_distance)
            .expect("best is one of the offsets");
        for (i, o) in offsets.iter().enumerate() {
            let d = (projected - o).abs();
            prop_assert!(d >= best_distance);
            if i < first_best {
                prop_assert!(d > best_distance);
            }
        }
        prop_assert_eq!(best.offset, offsets[first_best]);
    }
}

#[test]
fn default_threshold_is_half_a_point() {
    assert_eq!(DecelerationParameters::pixel_threshold(1.0), DEFAULT_THRESHOLD_POINTS);
    assert_eq!(DecelerationParameters::pixel_threshold(2.0), 0.25);
}
