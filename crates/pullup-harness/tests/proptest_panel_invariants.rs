//! Property-based invariant tests for the pullup panel.
//!
//! 1. Every offset produced by a drag or landing stays in `[0, max_offset]`
//! 2. Landings always pick a snap state, never `Hidden`
//! 3. Gestures never hide the panel
//! 4. Replaying the same gesture sequence yields the same trajectory
//! 5. No panics on arbitrary callback sequences, detached or not

use pullup_core::{
    HostMetrics, PanEvent, PanOutcome, PanPhase, PanSource, PanelConfig, PanelState, PullupPanel,
    Vec2,
};
use pullup_harness::{HeadlessHost, Simulation};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

fn phase_strategy() -> impl Strategy<Value = PanPhase> {
    prop_oneof![
        1 => Just(PanPhase::Began),
        6 => Just(PanPhase::Changed),
        1 => Just(PanPhase::Ended),
        1 => Just(PanPhase::Cancelled),
    ]
}

fn source_strategy() -> impl Strategy<Value = PanSource> {
    prop_oneof![Just(PanSource::Panel), Just(PanSource::EmbeddedScroll)]
}

fn event_strategy() -> impl Strategy<Value = PanEvent> {
    (
        phase_strategy(),
        source_strategy(),
        -1500.0f64..1500.0,
        -1500.0f64..1500.0,
        -6000.0f64..6000.0,
    )
        .prop_map(|(phase, source, tx, ty, vy)| {
            PanEvent::new(phase, source, Vec2::new(tx, ty), Vec2::new(0.0, vy))
        })
}

fn snap_state_strategy() -> impl Strategy<Value = PanelState> {
    prop_oneof![
        Just(PanelState::Collapsed),
        Just(PanelState::HalfState),
        Just(PanelState::Expanded),
    ]
}

fn metrics_strategy() -> impl Strategy<Value = HostMetrics> {
    (200.0f64..1400.0, 0.0f64..50.0, 1.0f64..4.0).prop_map(|(height, safe, scale)| HostMetrics {
        container_height: height + 64.0,
        panel_height: height,
        safe_area_bottom: safe,
        screen_scale: scale,
    })
}

fn build(metrics: HostMetrics, middle: f64, scroll: Option<f64>, state: PanelState) -> Simulation {
    let mut host = HeadlessHost::new(metrics);
    if let Some(offset) = scroll {
        host = host.with_scroll(offset);
    }
    let config = PanelConfig::default().with_middle_state(middle);
    Simulation::new(config, host, state).expect("generated config is valid")
}

fn max_offset(metrics: &HostMetrics) -> f64 {
    metrics.max_offset(PanelConfig::default().collapsed_height).max(0.0)
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn offsets_stay_within_bounds(
        metrics in metrics_strategy(),
        middle in 0.0f64..=1.0,
        scroll in proptest::option::of(-20.0f64..400.0),
        state in snap_state_strategy(),
        events in proptest::collection::vec(event_strategy(), 1..60),
    ) {
        let mut sim = build(metrics, middle, scroll, state);
        let max = max_offset(&metrics);
        for event in events {
            let outcome = sim.pan(event);
            let offset = sim.panel().offset().expect("attached");
            prop_assert!(
                (0.0..=max).contains(&offset),
                "offset {} outside [0, {}] after {:?}", offset, max, outcome
            );
            match outcome {
                PanOutcome::Moved { offset } => prop_assert!((0.0..=max).contains(&offset)),
                PanOutcome::Landed(landing) => {
                    prop_assert!((0.0..=max).contains(&landing.offset));
                    prop_assert!(landing.state.is_snap_state(), "{:?}", landing);
                }
                _ => {}
            }
        }
    }

    #[test]
    fn gestures_never_hide(
        metrics in metrics_strategy(),
        state in snap_state_strategy(),
        events in proptest::collection::vec(event_strategy(), 1..60),
    ) {
        let mut sim = build(metrics, 0.4, None, state);
        for event in events {
            sim.pan(event);
            sim.advance(pullup_harness::FRAME);
            prop_assert_ne!(sim.state(), PanelState::Hidden);
            prop_assert!(!sim.host().expect("attached").is_hidden());
        }
    }

    #[test]
    fn same_gestures_same_trajectory(
        metrics in metrics_strategy(),
        events in proptest::collection::vec(event_strategy(), 1..40),
    ) {
        let run = |events: &[PanEvent]| {
            let mut sim = build(metrics, 0.4, Some(0.0), PanelState::HalfState);
            let mut trajectory = Vec::with_capacity(events.len());
            for event in events {
                let outcome = sim.pan(*event);
                sim.advance(pullup_harness::FRAME);
                trajectory.push((outcome, sim.state(), sim.presented_offset()));
            }
            sim.settle();
            (trajectory, sim.presented_offset())
        };
        prop_assert_eq!(run(&events), run(&events));
    }

    #[test]
    fn detached_panel_ignores_everything(
        events in proptest::collection::vec(event_strategy(), 0..30),
    ) {
        let mut panel: PullupPanel<HeadlessHost> =
            PullupPanel::new(PanelConfig::default()).expect("valid config");
        for event in events {
            prop_assert_eq!(panel.handle_pan(event), PanOutcome::Ignored);
        }
        prop_assert_eq!(panel.state(), PanelState::Uninstalled);
        prop_assert!(panel.detach().is_none());
    }
}
