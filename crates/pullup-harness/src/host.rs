#![forbid(unsafe_code)]

//! In-memory [`PanelHost`] for tests and trace replay.
//!
//! `HeadlessHost` keeps the bookkeeping a real view hierarchy would do and
//! exposes it for inspection: installed constraints, the bottom-offset
//! constant, the offset currently on screen, the hidden flag and a count of
//! layout passes. Animated layout is driven by an [`OffsetTween`] that the
//! caller steps with [`HeadlessHost::step`].
//!
//! # Invariants
//!
//! 1. `presented_offset()` equals `bottom_offset()` whenever no transition
//!    is running.
//! 2. At most one transition runs; starting another interrupts the first,
//!    which is reported as unfinished on the next step.

use std::time::Duration;

use pullup_core::animation::{Animation, AnimationSpec, OffsetTween};
use pullup_core::host::{ContentView, ScrollSurface};
use pullup_core::{AnimationTicket, Constraint, HostMetrics, PanelHost, Rect, Vec2};

/// Default container width, in points.
pub const DEFAULT_WIDTH: f64 = 390.0;

/// A scroll view whose content offset is set by the test.
#[derive(Debug, Clone, Default)]
pub struct HeadlessScroll {
    offset: Vec2,
    pin_count: usize,
}

impl HeadlessScroll {
    #[must_use]
    pub fn new(offset_y: f64) -> Self {
        Self {
            offset: Vec2::vertical(offset_y),
            pin_count: 0,
        }
    }

    #[must_use]
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Move the content as the user's finger would, without counting as a
    /// pin by the panel.
    pub fn scroll_to(&mut self, offset_y: f64) {
        self.offset = self.offset.with_y(offset_y);
    }

    /// Number of times the panel wrote the content offset back.
    #[must_use]
    pub fn pin_count(&self) -> usize {
        self.pin_count
    }
}

impl ScrollSurface for HeadlessScroll {
    fn content_offset(&self) -> Vec2 {
        self.offset
    }

    fn set_content_offset(&mut self, offset: Vec2) {
        self.offset = offset;
        self.pin_count += 1;
    }
}

/// A content view that records every alpha it was given.
#[derive(Debug, Clone, Default)]
pub struct RecordingContent {
    history: Vec<f64>,
}

impl RecordingContent {
    #[must_use]
    pub fn alpha(&self) -> Option<f64> {
        self.history.last().copied()
    }

    #[must_use]
    pub fn history(&self) -> &[f64] {
        &self.history
    }
}

impl ContentView for RecordingContent {
    fn set_alpha(&mut self, alpha: f64) {
        self.history.push(alpha);
    }
}

#[derive(Debug, Clone)]
struct RunningTransition {
    ticket: AnimationTicket,
    tween: OffsetTween,
}

/// What one [`HeadlessHost::step`] produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostStep {
    /// Completions to forward to the panel, in order.
    pub completions: Vec<(AnimationTicket, bool)>,
    /// Whether the presented offset changed.
    pub moved: bool,
}

/// Headless container holding one panel.
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    metrics: HostMetrics,
    width: f64,
    installed: bool,
    install_order: Option<usize>,
    constraints: Vec<Constraint>,
    bottom_offset: f64,
    presented_offset: f64,
    hidden: bool,
    layout_passes: usize,
    corner_radius: f64,
    scroll: Option<HeadlessScroll>,
    content: Option<RecordingContent>,
    transition: Option<RunningTransition>,
    interrupted: Vec<AnimationTicket>,
    last_spec: Option<AnimationSpec>,
}

impl HeadlessHost {
    #[must_use]
    pub fn new(metrics: HostMetrics) -> Self {
        Self {
            metrics,
            width: DEFAULT_WIDTH,
            installed: false,
            install_order: None,
            constraints: Vec::new(),
            bottom_offset: 0.0,
            presented_offset: 0.0,
            hidden: false,
            layout_passes: 0,
            corner_radius: 0.0,
            scroll: None,
            content: None,
            transition: None,
            interrupted: Vec::new(),
            last_spec: None,
        }
    }

    /// Phone-sized container: 844pt tall with a 34pt home indicator, panel
    /// filling the container minus the default 64pt top gap.
    #[must_use]
    pub fn phone() -> Self {
        Self::new(HostMetrics {
            container_height: 844.0,
            panel_height: 780.0,
            safe_area_bottom: 34.0,
            screen_scale: 3.0,
        })
    }

    #[must_use]
    pub fn with_scroll(mut self, offset_y: f64) -> Self {
        self.scroll = Some(HeadlessScroll::new(offset_y));
        self
    }

    #[must_use]
    pub fn with_content(mut self) -> Self {
        self.content = Some(RecordingContent::default());
        self
    }

    #[must_use]
    pub fn metrics(&self) -> HostMetrics {
        self.metrics
    }

    /// Simulate a rotation or resize. The panel learns about it through
    /// `PullupPanel::geometry_changed`.
    pub fn resize(&mut self, metrics: HostMetrics) {
        self.metrics = metrics;
    }

    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.installed
    }

    #[must_use]
    pub fn install_order(&self) -> Option<usize> {
        self.install_order
    }

    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Constant of the bottom-offset constraint.
    #[must_use]
    pub fn bottom_offset(&self) -> f64 {
        self.bottom_offset
    }

    /// Offset currently on screen, mid-animation included.
    #[must_use]
    pub fn presented_offset(&self) -> f64 {
        self.presented_offset
    }

    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    #[must_use]
    pub fn layout_passes(&self) -> usize {
        self.layout_passes
    }

    #[must_use]
    pub fn corner_radius(&self) -> f64 {
        self.corner_radius
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.transition.is_some() || !self.interrupted.is_empty()
    }

    /// Timing of the most recent animated layout.
    #[must_use]
    pub fn last_animation(&self) -> Option<AnimationSpec> {
        self.last_spec
    }

    #[must_use]
    pub fn scroll(&self) -> Option<&HeadlessScroll> {
        self.scroll.as_ref()
    }

    pub fn scroll_mut(&mut self) -> Option<&mut HeadlessScroll> {
        self.scroll.as_mut()
    }

    #[must_use]
    pub fn content(&self) -> Option<&RecordingContent> {
        self.content.as_ref()
    }

    /// The panel's on-screen frame in container coordinates, if installed.
    #[must_use]
    pub fn panel_frame(&self) -> Option<Rect> {
        if !self.installed {
            return None;
        }
        let bottom = self.metrics.container_height + self.presented_offset;
        Some(Rect::new(
            0.0,
            bottom - self.metrics.panel_height,
            self.width,
            self.metrics.panel_height,
        ))
    }

    /// Advance the running transition by `dt`.
    pub fn step(&mut self, dt: Duration) -> HostStep {
        let mut step = HostStep {
            completions: self.interrupted.drain(..).map(|t| (t, false)).collect(),
            moved: false,
        };

        if let Some(running) = self.transition.as_mut() {
            running.tween.tick(dt);
            let offset = running.tween.offset();
            step.moved = offset != self.presented_offset;
            self.presented_offset = offset;
            if running.tween.is_complete() {
                self.presented_offset = self.bottom_offset;
                step.completions.push((running.ticket, true));
                self.transition = None;
            }
        }
        step
    }

    fn interrupt_running(&mut self) {
        if let Some(running) = self.transition.take() {
            self.interrupted.push(running.ticket);
        }
    }
}

impl PanelHost for HeadlessHost {
    fn metrics(&self) -> HostMetrics {
        self.metrics
    }

    fn install_panel(&mut self, order: Option<usize>) {
        self.installed = true;
        self.install_order = order;
    }

    fn remove_panel(&mut self) {
        self.installed = false;
        self.install_order = None;
        self.transition = None;
        self.interrupted.clear();
    }

    fn activate(&mut self, constraints: &[Constraint]) {
        self.constraints.extend_from_slice(constraints);
    }

    fn deactivate(&mut self, constraints: &[Constraint]) {
        self.constraints.retain(|c| !constraints.contains(c));
    }

    fn set_bottom_offset(&mut self, offset: f64) {
        self.bottom_offset = offset;
    }

    fn set_panel_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    fn layout_if_needed(&mut self) {
        self.layout_passes += 1;
        self.interrupt_running();
        self.presented_offset = self.bottom_offset;
    }

    fn animate_layout(&mut self, ticket: AnimationTicket, spec: AnimationSpec) {
        self.layout_passes += 1;
        self.interrupt_running();
        self.last_spec = Some(spec);
        self.transition = Some(RunningTransition {
            ticket,
            tween: OffsetTween::new(self.presented_offset, self.bottom_offset, spec),
        });
    }

    fn apply_corner_radius(&mut self, radius: f64) {
        self.corner_radius = radius;
    }

    fn embedded_scroll(&mut self) -> Option<&mut dyn ScrollSurface> {
        self.scroll.as_mut().map(|s| s as &mut dyn ScrollSurface)
    }

    fn content_view(&mut self) -> Option<&mut dyn ContentView> {
        self.content.as_mut().map(|c| c as &mut dyn ContentView)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(n: u64) -> AnimationTicket {
        AnimationTicket(n)
    }

    #[test]
    fn layout_snaps_presented_offset() {
        let mut host = HeadlessHost::phone();
        host.set_bottom_offset(120.0);
        assert_eq!(host.presented_offset(), 0.0);
        host.layout_if_needed();
        assert_eq!(host.presented_offset(), 120.0);
        assert_eq!(host.layout_passes(), 1);
    }

    #[test]
    fn animation_reaches_target_and_completes() {
        let mut host = HeadlessHost::phone();
        host.set_bottom_offset(300.0);
        host.animate_layout(ticket(1), AnimationSpec::PANEL);
        let mid = host.step(Duration::from_millis(150));
        assert!(mid.moved);
        assert!(mid.completions.is_empty());
        let mid_offset = host.presented_offset();
        // Ease-out: more than half the distance after half the time.
        assert!(mid_offset > 150.0 && mid_offset < 300.0, "{mid_offset}");

        let end = host.step(Duration::from_millis(150));
        assert_eq!(end.completions, vec![(ticket(1), true)]);
        assert_eq!(host.presented_offset(), 300.0);
        assert!(!host.is_animating());
    }

    #[test]
    fn newer_animation_interrupts_running_one() {
        let mut host = HeadlessHost::phone();
        host.set_bottom_offset(300.0);
        host.animate_layout(ticket(1), AnimationSpec::PANEL);
        host.step(Duration::from_millis(100));
        let from = host.presented_offset();

        host.set_bottom_offset(0.0);
        host.animate_layout(ticket(2), AnimationSpec::PANEL);
        let step = host.step(Duration::ZERO);
        assert_eq!(step.completions, vec![(ticket(1), false)]);
        assert_eq!(host.presented_offset(), from, "no jump on retarget");

        let step = host.step(Duration::from_millis(300));
        assert_eq!(step.completions, vec![(ticket(2), true)]);
        assert_eq!(host.presented_offset(), 0.0);
    }

    #[test]
    fn panel_frame_follows_presented_offset() {
        let mut host = HeadlessHost::phone();
        assert_eq!(host.panel_frame(), None);
        host.install_panel(None);
        host.set_bottom_offset(100.0);
        host.layout_if_needed();
        let frame = host.panel_frame().expect("installed");
        assert_eq!(frame.min_y(), 844.0 + 100.0 - 780.0);
        assert_eq!(frame.height, 780.0);
        assert_eq!(frame.width, DEFAULT_WIDTH);
    }

    #[test]
    fn constraints_activate_and_deactivate() {
        let mut host = HeadlessHost::phone();
        let set = [Constraint::BottomOffset, Constraint::MatchWidth];
        host.activate(&set);
        assert_eq!(host.constraints(), &set);
        host.deactivate(&set);
        assert!(host.constraints().is_empty());
    }

    #[test]
    fn scroll_counts_pins_only() {
        let mut scroll = HeadlessScroll::new(10.0);
        scroll.scroll_to(40.0);
        assert_eq!(scroll.pin_count(), 0);
        scroll.set_content_offset(Vec2::ZERO);
        assert_eq!(scroll.pin_count(), 1);
        assert_eq!(scroll.offset(), Vec2::ZERO);
    }
}
