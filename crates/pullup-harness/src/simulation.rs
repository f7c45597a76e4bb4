#![forbid(unsafe_code)]

//! Deterministic driver around a [`PullupPanel`] on a [`HeadlessHost`].
//!
//! The simulation plays the platform's part: it steps animations in fixed
//! frames, reports every frame change through `position_changed`, and
//! forwards animation completions, interrupted ones included.

use std::time::Duration;

use pullup_core::animation::{Animation, DecayAnimation};
use pullup_core::deceleration::DecelerationParameters;
use pullup_core::{
    HostMetrics, PanEvent, PanOutcome, PanPhase, PanSource, PanelConfig, PanelState, PullupPanel,
    Rect, Result, Vec2,
};
use tracing::{debug, info_span};

use crate::host::HeadlessHost;

/// Frame interval used by [`Simulation::advance`]: 60 Hz.
pub const FRAME: Duration = Duration::from_micros(16_667);

/// Upper bound for [`Simulation::settle`].
const SETTLE_LIMIT: Duration = Duration::from_secs(10);

/// A panel attached to a headless host, plus a clock.
#[derive(Debug)]
pub struct Simulation {
    panel: PullupPanel<HeadlessHost>,
    frame_interval: Duration,
    elapsed: Duration,
    last_frame: Option<Rect>,
}

impl Simulation {
    /// Attach a panel built from `config` to `host` in `state`.
    pub fn new(config: PanelConfig, host: HeadlessHost, state: PanelState) -> Result<Self> {
        let mut panel = PullupPanel::new(config)?;
        panel.attach(host, state, None);
        Ok(Self::from_panel(panel))
    }

    /// Drive an already configured (and possibly attached) panel.
    #[must_use]
    pub fn from_panel(panel: PullupPanel<HeadlessHost>) -> Self {
        let mut sim = Self {
            panel,
            frame_interval: FRAME,
            elapsed: Duration::ZERO,
            last_frame: None,
        };
        sim.sync_frame();
        sim
    }

    #[must_use]
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        if !interval.is_zero() {
            self.frame_interval = interval;
        }
        self
    }

    #[must_use]
    pub fn panel(&self) -> &PullupPanel<HeadlessHost> {
        &self.panel
    }

    /// Mutable access for operations the simulation does not wrap. Call
    /// [`Simulation::sync_frame`] afterwards if the frame may have moved.
    pub fn panel_mut(&mut self) -> &mut PullupPanel<HeadlessHost> {
        &mut self.panel
    }

    #[must_use]
    pub fn host(&self) -> Option<&HeadlessHost> {
        self.panel.host()
    }

    pub fn host_mut(&mut self) -> Option<&mut HeadlessHost> {
        self.panel.host_mut()
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[must_use]
    pub fn state(&self) -> PanelState {
        self.panel.state()
    }

    /// Offset currently on screen.
    #[must_use]
    pub fn presented_offset(&self) -> Option<f64> {
        self.host().map(HeadlessHost::presented_offset)
    }

    #[must_use]
    pub fn into_panel(self) -> PullupPanel<HeadlessHost> {
        self.panel
    }

    /// Report the panel frame if it moved since the last report.
    pub fn sync_frame(&mut self) -> Option<f64> {
        let frame = self.host().and_then(HeadlessHost::panel_frame)?;
        if self.last_frame == Some(frame) {
            return None;
        }
        self.last_frame = Some(frame);
        self.panel.position_changed(frame)
    }

    /// Advance the clock by `dt`, one frame at a time.
    pub fn advance(&mut self, dt: Duration) {
        let mut remaining = dt;
        while !remaining.is_zero() {
            let step = remaining.min(self.frame_interval);
            self.frame(step);
            remaining -= step;
        }
    }

    /// Run frames until no animation is in flight.
    pub fn settle(&mut self) {
        let deadline = self.elapsed + SETTLE_LIMIT;
        while self.host().is_some_and(HeadlessHost::is_animating) && self.elapsed < deadline {
            self.frame(self.frame_interval);
        }
    }

    fn frame(&mut self, dt: Duration) {
        self.elapsed += dt;
        let Some(host) = self.panel.host_mut() else {
            return;
        };
        let step = host.step(dt);
        for (ticket, finished) in step.completions {
            self.panel.animation_finished(ticket, finished);
        }
        if step.moved {
            self.sync_frame();
        }
    }

    /// Feed one pan callback and report the resulting frame.
    pub fn pan(&mut self, event: PanEvent) -> PanOutcome {
        let outcome = self.panel.handle_pan(event);
        self.sync_frame();
        outcome
    }

    pub fn set_state(&mut self, state: PanelState, animated: bool) {
        self.panel.set_state(state, animated);
        self.sync_frame();
    }

    /// Resize the host and notify the panel.
    pub fn resize(&mut self, metrics: HostMetrics) {
        if let Some(host) = self.panel.host_mut() {
            host.resize(metrics);
        }
        self.panel.geometry_changed();
        self.sync_frame();
    }

    /// Synthesize a complete gesture: `Began`, `steps` evenly spaced
    /// `Changed` callbacks covering `dy`, then `Ended` with `velocity_y`.
    ///
    /// One frame elapses between callbacks. Returns the outcome of `Ended`.
    pub fn drag(&mut self, source: PanSource, dy: f64, steps: usize, velocity_y: f64) -> PanOutcome {
        let _span = info_span!("pullup.drag", ?source, dy, steps, velocity_y).entered();
        let steps = steps.max(1);
        let event = |phase, ty, vy| PanEvent::vertical(phase, ty, vy).from_source(source);

        self.pan(event(PanPhase::Began, 0.0, 0.0));
        for i in 1..=steps {
            self.advance(self.frame_interval);
            let ty = dy * i as f64 / steps as f64;
            self.pan(event(PanPhase::Changed, ty, velocity_y));
        }
        self.advance(self.frame_interval);
        let outcome = self.pan(event(PanPhase::Ended, dy, velocity_y));
        debug!(?outcome, state = ?self.state(), "drag finished");
        outcome
    }

    /// Offsets an unconstrained coast from the current position would pass
    /// through at `velocity_y`, sampled once per frame.
    ///
    /// The last sample is the projected destination a release at that
    /// velocity is snapped from. Empty when detached.
    #[must_use]
    pub fn momentum_trail(&self, velocity_y: f64) -> Vec<f64> {
        let (Some(offset), Some(host)) = (self.panel.offset(), self.host()) else {
            return Vec::new();
        };
        let velocity_y = if velocity_y.is_finite() { velocity_y } else { 0.0 };
        let Ok(parameters) = DecelerationParameters::new(
            Vec2::vertical(offset),
            Vec2::vertical(velocity_y),
            self.panel.config().deceleration_rate,
            DecelerationParameters::pixel_threshold(host.metrics().screen_scale),
        ) else {
            return vec![offset];
        };

        let mut coast = DecayAnimation::new(parameters);
        let mut trail = vec![coast.position().y];
        while !coast.is_complete() {
            coast.tick(self.frame_interval);
            trail.push(coast.position().y);
        }
        trail
    }

    /// Fling from the current position with no travel, only velocity.
    pub fn fling(&mut self, velocity_y: f64) -> PanOutcome {
        self.pan(PanEvent::vertical(PanPhase::Began, 0.0, 0.0));
        self.pan(PanEvent::new(
            PanPhase::Ended,
            PanSource::Panel,
            Vec2::ZERO,
            Vec2::vertical(velocity_y),
        ))
    }
}
