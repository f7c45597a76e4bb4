#![forbid(unsafe_code)]

//! The pullup panel state machine.
//!
//! [`PullupPanel`] owns the discrete [`PanelState`], the current bottom
//! offset, and the transient [`DragSession`] of the gesture in progress. It
//! turns pan callbacks into offsets, projects a release with the decay model,
//! and snaps to the nearest entry of the [`SnapTable`].
//!
//! # Attachment
//!
//! The host is held inside an enum: every operation that needs geometry
//! matches on [`Attachment::Attached`] first, so "not attached" is a branch,
//! never a dangling reference. Operations on a detached panel are silent
//! no-ops.
//!
//! # Scroll cooperation
//!
//! Callbacks from the embedded scroll surface's recognizer are routed as
//! follows, evaluated with the panel offset and the scroll offset snapshot
//! taken after the previous callback:
//!
//! - `offset > 0 && (delta.y <= 0 || snapshot.y <= 0)`: the panel moves and
//!   the scroll surface is pinned back to `max(0, snapshot.y)`.
//! - otherwise, if the live scroll offset is `> 0`: the scroll surface keeps
//!   the movement and the panel ignores it.
//! - otherwise the panel moves.
//!
//! # Invariants
//!
//! 1. Detached ⇔ `state() == Uninstalled`.
//! 2. After any drag or landing, `0 <= offset <= max_offset`.
//! 3. `Hidden` is entered only through [`PullupPanel::set_state`].
//! 4. The state changes as soon as a landing is resolved, not when its
//!    animation completes.
//! 5. Only the most recent [`AnimationTicket`] is honored on completion.

use std::fmt;
use std::mem;

use crate::config::PanelConfig;
use crate::deceleration::DecelerationParameters;
use crate::error::Result;
use crate::geometry::{Rect, Vec2, clamp01};
use crate::gesture::{DragSession, PanEvent, PanOutcome, PanPhase, PanSource};
use crate::host::{AnimationTicket, Constraint, HostMetrics, PanelDelegate, PanelHost};
use crate::snap::SnapTable;
use crate::state::PanelState;

#[cfg(feature = "tracing")]
use crate::logging::{debug, trace, warn};
#[cfg(not(feature = "tracing"))]
use crate::{debug, trace, warn};

/// Where a released drag settles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landing {
    /// Snap-table offset the panel animates to.
    pub offset: f64,
    /// State entered immediately.
    pub state: PanelState,
    /// Decay destination used to choose the target.
    pub projected: f64,
}

#[derive(Debug, Clone, Copy)]
struct PendingTransition {
    ticket: AnimationTicket,
    hide_on_finish: bool,
}

struct Mounted<H> {
    host: H,
    constraints: Vec<Constraint>,
    state: PanelState,
    offset: f64,
    drag: Option<DragSession>,
    pending: Option<PendingTransition>,
}

enum Attachment<H> {
    Detached,
    Attached(Mounted<H>),
}

/// A bottom sheet dragged between snap states.
pub struct PullupPanel<H: PanelHost> {
    config: PanelConfig,
    delegate: Option<Box<dyn PanelDelegate>>,
    attachment: Attachment<H>,
    next_ticket: u64,
}

impl<H: PanelHost> fmt::Debug for PullupPanel<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PullupPanel")
            .field("state", &self.state())
            .field("offset", &self.offset())
            .field("dragging", &self.is_dragging())
            .field("has_delegate", &self.delegate.is_some())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Construction and accessors
// ---------------------------------------------------------------------------

impl<H: PanelHost> PullupPanel<H> {
    /// Create a detached panel. Fails if `config` is invalid.
    pub fn new(config: PanelConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            delegate: None,
            attachment: Attachment::Detached,
            next_ticket: 0,
        })
    }

    /// Install lifecycle hooks (builder pattern).
    #[must_use]
    pub fn with_delegate(mut self, delegate: impl PanelDelegate + 'static) -> Self {
        self.delegate = Some(Box::new(delegate));
        self
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Current state; `Uninstalled` while detached.
    #[must_use]
    pub fn state(&self) -> PanelState {
        match &self.attachment {
            Attachment::Detached => PanelState::Uninstalled,
            Attachment::Attached(mounted) => mounted.state,
        }
    }

    /// Current bottom offset, if attached.
    #[must_use]
    pub fn offset(&self) -> Option<f64> {
        self.mounted().map(|mounted| mounted.offset)
    }

    #[inline]
    #[must_use]
    pub fn is_attached(&self) -> bool {
        matches!(self.attachment, Attachment::Attached(_))
    }

    /// Whether a gesture session is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.mounted().is_some_and(|mounted| mounted.drag.is_some())
    }

    /// The attached host.
    #[must_use]
    pub fn host(&self) -> Option<&H> {
        self.mounted().map(|mounted| &mounted.host)
    }

    #[must_use]
    pub fn host_mut(&mut self) -> Option<&mut H> {
        match &mut self.attachment {
            Attachment::Detached => None,
            Attachment::Attached(mounted) => Some(&mut mounted.host),
        }
    }

    /// Constraints currently installed with the host.
    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        self.mounted()
            .map_or(&[][..], |mounted| mounted.constraints.as_slice())
    }

    fn mounted(&self) -> Option<&Mounted<H>> {
        match &self.attachment {
            Attachment::Detached => None,
            Attachment::Attached(mounted) => Some(mounted),
        }
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

impl<H: PanelHost> PullupPanel<H> {
    /// Attach to `host` in `state`, positioned immediately without animation.
    ///
    /// `order` inserts the panel at that index of the container's subviews.
    /// If the panel was attached elsewhere it is detached first and the
    /// previous host is returned. `Uninstalled` falls back to `HalfState`.
    pub fn attach(&mut self, host: H, state: PanelState, order: Option<usize>) -> Option<H> {
        let previous = self.detach();

        let state = if state.is_installed() {
            state
        } else {
            warn!("cannot attach in Uninstalled state; using HalfState");
            PanelState::HalfState
        };

        let constraints = self.build_constraints();
        let mut host = host;
        host.install_panel(order);
        host.activate(&constraints);
        host.apply_corner_radius(self.config.corner_radius);

        self.attachment = Attachment::Attached(Mounted {
            host,
            constraints,
            state: PanelState::Uninstalled,
            offset: 0.0,
            drag: None,
            pending: None,
        });
        debug!(?state, ?order, "panel attached");

        self.set_state(state, false);
        previous
    }

    /// Deactivate constraints, remove the panel from its host and return the
    /// host. No-op (returns `None`) when already detached.
    pub fn detach(&mut self) -> Option<H> {
        let Attachment::Attached(mut mounted) =
            mem::replace(&mut self.attachment, Attachment::Detached)
        else {
            trace!("detach ignored: panel not attached");
            return None;
        };

        mounted.host.deactivate(&mounted.constraints);
        mounted.host.remove_panel();
        debug!(from = ?mounted.state, "panel detached");
        self.notify_state(mounted.state, PanelState::Uninstalled);
        Some(mounted.host)
    }

    fn build_constraints(&self) -> Vec<Constraint> {
        let top_offset = self.config.top_offset;
        let mut constraints = vec![Constraint::BottomOffset, Constraint::MatchWidth];
        if self.config.respect_content_view_height {
            constraints.push(Constraint::MaxHeightMinusTop { top_offset });
            constraints.push(Constraint::MinTop { top_offset });
        } else {
            constraints.push(Constraint::HeightMinusTop { top_offset });
        }
        constraints
    }
}

// ---------------------------------------------------------------------------
// State transitions
// ---------------------------------------------------------------------------

impl<H: PanelHost> PullupPanel<H> {
    /// Move to `target`, animated over the configured transition or applied
    /// immediately.
    ///
    /// Leaving `Hidden` shows the panel first; entering `Hidden` hides it
    /// once the animation completes. A call while an animation is in flight
    /// re-targets it (last write wins). No-op when detached or when `target`
    /// is `Uninstalled`.
    pub fn set_state(&mut self, target: PanelState, animated: bool) {
        if !target.is_installed() {
            debug!("set_state(Uninstalled) ignored; use detach()");
            return;
        }
        let Attachment::Attached(mounted) = &mut self.attachment else {
            debug!(?target, "set_state ignored: panel not attached");
            return;
        };

        let metrics = mounted.host.metrics();
        let offset = match target {
            PanelState::Hidden => metrics.panel_height,
            _ => {
                let table = snap_table_for(&self.config, self.delegate.as_deref(), &metrics);
                let max_offset = metrics.max_offset(self.config.collapsed_height);
                clamp_to(table.offset_of(target).unwrap_or(0.0), max_offset)
            }
        };

        if target != PanelState::Hidden {
            mounted.host.set_panel_hidden(false);
        }

        let from = mounted.state;
        mounted.state = target;
        mounted.offset = offset;

        if animated {
            let ticket = issue_ticket(&mut self.next_ticket);
            mounted.host.set_bottom_offset(offset);
            mounted.host.animate_layout(ticket, self.config.transition);
            mounted.pending = Some(PendingTransition {
                ticket,
                hide_on_finish: target == PanelState::Hidden,
            });
        } else {
            mounted.host.set_panel_hidden(target == PanelState::Hidden);
            mounted.host.set_bottom_offset(offset);
            mounted.host.layout_if_needed();
            mounted.pending = None;
        }

        debug!(?from, to = ?target, offset, animated, "panel state set");
        self.notify_state(from, target);
    }

    /// Completion signal for an animation started with `ticket`.
    ///
    /// Completions of superseded transitions are ignored.
    pub fn animation_finished(&mut self, ticket: AnimationTicket, finished: bool) {
        let Attachment::Attached(mounted) = &mut self.attachment else {
            return;
        };
        match mounted.pending {
            Some(pending) if pending.ticket == ticket => {
                if !finished {
                    debug!(?ticket, "current transition reported unfinished");
                }
                mounted.pending = None;
                mounted.host.set_panel_hidden(pending.hide_on_finish);
            }
            _ => trace!(?ticket, "stale animation completion ignored"),
        }
    }

    /// The host's size changed: restyle and re-apply the current state
    /// without animation so offsets follow the new geometry.
    ///
    /// Skipped while a drag is in progress.
    pub fn geometry_changed(&mut self) {
        let Attachment::Attached(mounted) = &mut self.attachment else {
            return;
        };
        mounted.host.apply_corner_radius(self.config.corner_radius);
        if mounted.drag.is_some() {
            trace!("geometry change during drag; state re-applied on release");
            return;
        }
        let state = mounted.state;
        self.set_state(state, false);
    }

    fn notify_state(&mut self, from: PanelState, to: PanelState) {
        if from == to {
            return;
        }
        if let Some(delegate) = self.delegate.as_deref_mut() {
            delegate.state_changed(from, to);
        }
    }
}

// ---------------------------------------------------------------------------
// Geometry queries
// ---------------------------------------------------------------------------

impl<H: PanelHost> PullupPanel<H> {
    /// Snap table for the current geometry, after delegate adjustments.
    #[must_use]
    pub fn snap_table(&self) -> Option<SnapTable> {
        let metrics = self.mounted()?.host.metrics();
        Some(snap_table_for(&self.config, self.delegate.as_deref(), &metrics))
    }

    /// Clamp `offset` to `[0, panel_height - collapsed_height - safe_area_bottom]`.
    #[must_use]
    pub fn clamp_offset(&self, offset: f64) -> Option<f64> {
        let metrics = self.mounted()?.host.metrics();
        Some(clamp_to(offset, metrics.max_offset(self.config.collapsed_height)))
    }

    /// Where a release at `velocity` from the current offset would land.
    #[must_use]
    pub fn resolve_landing(&self, velocity: Vec2) -> Option<Landing> {
        let mounted = self.mounted()?;
        let metrics = mounted.host.metrics();
        Some(resolve_landing(
            &self.config,
            self.delegate.as_deref(),
            &metrics,
            mounted.offset,
            mounted.state,
            velocity,
        ))
    }

    /// The panel's frame moved (layout pass or animation frame).
    ///
    /// Fades the content view in over `fade_distance` above the collapsed
    /// position and returns the applied alpha. `None` when detached.
    pub fn position_changed(&mut self, frame: Rect) -> Option<f64> {
        let Attachment::Attached(mounted) = &mut self.attachment else {
            return None;
        };
        let metrics = mounted.host.metrics();
        let bottom_offset = metrics.container_height
            - frame.min_y()
            - metrics.safe_area_bottom
            - self.config.collapsed_height;
        let alpha = clamp01(bottom_offset / self.config.fade_distance);

        if let Some(content) = mounted.host.content_view() {
            content.set_alpha(alpha);
        }
        if let Some(delegate) = self.delegate.as_deref_mut() {
            delegate.position_changed(frame, alpha);
        }
        Some(alpha)
    }
}

// ---------------------------------------------------------------------------
// Pan handling
// ---------------------------------------------------------------------------

impl<H: PanelHost> PullupPanel<H> {
    /// Feed one pan callback from either recognizer.
    ///
    /// `Cancelled` settles like a release with zero velocity instead of
    /// leaving the panel where the gesture stopped.
    pub fn handle_pan(&mut self, event: PanEvent) -> PanOutcome {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "pullup_pan",
            phase = ?event.phase,
            source = ?event.source,
            dy = event.translation.y
        )
        .entered();

        let Attachment::Attached(mounted) = &mut self.attachment else {
            trace!("pan ignored: panel not attached");
            return PanOutcome::Ignored;
        };
        if mounted.state == PanelState::Hidden {
            mounted.drag = None;
            return PanOutcome::Ignored;
        }

        let translation = event.translation.with_x(0.0);
        if event.phase == PanPhase::Began {
            let scroll_offset_snapshot = mounted
                .host
                .embedded_scroll()
                .map_or(Vec2::ZERO, |scroll| scroll.content_offset());
            mounted.drag = Some(DragSession {
                last_translation: translation,
                scroll_offset_snapshot,
            });
        }
        let Some(mut session) = mounted.drag else {
            trace!("pan ignored: no gesture in progress");
            return PanOutcome::Ignored;
        };

        let delta = translation.sub(session.last_translation);
        let deferred = event.source == PanSource::EmbeddedScroll
            && route_scroll(mounted, &mut session, delta);

        let metrics = mounted.host.metrics();
        let max_offset = metrics.max_offset(self.config.collapsed_height);
        let mut transition = None;

        let outcome = if deferred {
            PanOutcome::DeferredToScroll
        } else {
            match event.phase {
                PanPhase::Began => PanOutcome::Tracking,
                PanPhase::Changed => {
                    mounted.offset = clamp_to(mounted.offset + delta.y, max_offset);
                    mounted.host.set_bottom_offset(mounted.offset);
                    mounted.host.layout_if_needed();
                    PanOutcome::Moved {
                        offset: mounted.offset,
                    }
                }
                PanPhase::Ended | PanPhase::Cancelled => {
                    let velocity = if event.phase == PanPhase::Ended {
                        event.velocity
                    } else {
                        Vec2::ZERO
                    };
                    let landing = resolve_landing(
                        &self.config,
                        self.delegate.as_deref(),
                        &metrics,
                        mounted.offset,
                        mounted.state,
                        velocity,
                    );
                    let ticket = issue_ticket(&mut self.next_ticket);
                    transition = Some((mounted.state, landing.state));
                    mounted.state = landing.state;
                    mounted.offset = landing.offset;
                    mounted.host.set_bottom_offset(landing.offset);
                    mounted.host.animate_layout(ticket, self.config.transition);
                    mounted.pending = Some(PendingTransition {
                        ticket,
                        hide_on_finish: false,
                    });
                    debug!(
                        state = ?landing.state,
                        offset = landing.offset,
                        projected = landing.projected,
                        "drag landed"
                    );
                    PanOutcome::Landed(landing)
                }
            }
        };

        session.last_translation = translation;
        mounted.drag = match event.phase {
            PanPhase::Ended | PanPhase::Cancelled => None,
            PanPhase::Began | PanPhase::Changed => Some(session),
        };

        if let Some((from, to)) = transition {
            self.notify_state(from, to);
        }
        outcome
    }
}

/// Apply the scroll cooperation rule. Returns `true` when the scroll surface
/// keeps the movement and the panel must ignore it.
fn route_scroll<H: PanelHost>(
    mounted: &mut Mounted<H>,
    session: &mut DragSession,
    delta: Vec2,
) -> bool {
    let panel_offset = mounted.offset;
    let Some(scroll) = mounted.host.embedded_scroll() else {
        return false;
    };
    let snapshot = session.scroll_offset_snapshot;
    let mut deferred = false;
    if panel_offset > 0.0 && (delta.y <= 0.0 || snapshot.y <= 0.0) {
        scroll.set_content_offset(snapshot.with_y(snapshot.y.max(0.0)));
    } else if scroll.content_offset().y > 0.0 {
        deferred = true;
    }
    session.scroll_offset_snapshot = scroll.content_offset();
    deferred
}

fn snap_table_for(
    config: &PanelConfig,
    delegate: Option<&dyn PanelDelegate>,
    metrics: &HostMetrics,
) -> SnapTable {
    let table = SnapTable::standard(
        metrics.panel_height,
        metrics.max_offset(config.collapsed_height),
        config.middle_state,
    );
    let table = match delegate {
        Some(delegate) => delegate.snap_table(metrics, table),
        None => table,
    };
    // Drags may only settle on visible states.
    SnapTable::new(
        table
            .targets()
            .iter()
            .copied()
            .filter(|target| target.state.is_snap_state()),
    )
}

fn resolve_landing(
    config: &PanelConfig,
    delegate: Option<&dyn PanelDelegate>,
    metrics: &HostMetrics,
    offset: f64,
    current: PanelState,
    velocity: Vec2,
) -> Landing {
    let velocity = if velocity.is_finite() {
        velocity
    } else {
        Vec2::ZERO
    };
    let threshold = DecelerationParameters::pixel_threshold(metrics.screen_scale);
    let projected = match DecelerationParameters::new(
        Vec2::vertical(offset),
        velocity,
        config.deceleration_rate,
        threshold,
    ) {
        Ok(parameters) => parameters.destination().y,
        Err(_) => offset,
    };

    let max_offset = metrics.max_offset(config.collapsed_height);
    match snap_table_for(config, delegate, metrics).nearest(projected) {
        Some(target) => Landing {
            offset: clamp_to(target.offset, max_offset),
            state: target.state,
            projected,
        },
        None => Landing {
            offset: clamp_to(offset, max_offset),
            state: current,
            projected,
        },
    }
}

/// `max(0, min(max_offset, offset))`.
fn clamp_to(offset: f64, max_offset: f64) -> f64 {
    offset.min(max_offset).max(0.0)
}

fn issue_ticket(counter: &mut u64) -> AnimationTicket {
    *counter += 1;
    AnimationTicket(*counter)
}
