#![forbid(unsafe_code)]

//! Collaborator interfaces between the panel and its host platform.
//!
//! The panel owns its host once attached and reaches the platform only
//! through [`PanelHost`]. Inbound signals travel the other way as explicit
//! calls on [`PullupPanel`](crate::panel::PullupPanel):
//!
//! | Signal                    | Entry point                    |
//! |---------------------------|--------------------------------|
//! | pan gesture callback      | `handle_pan(event)`            |
//! | panel frame moved         | `position_changed(frame)`      |
//! | host size changed         | `geometry_changed()`           |
//! | animation completion      | `animation_finished(ticket, …)`|
//!
//! # Coordinates
//!
//! Offsets are measured downward from the host's bottom anchor: the panel's
//! bottom edge sits at `container bottom + offset`. `0` is fully expanded.

use crate::animation::AnimationSpec;
use crate::geometry::{Rect, Vec2};
use crate::snap::SnapTable;
use crate::state::PanelState;

/// Live measurements read from the host on every resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HostMetrics {
    /// Height of the hosting container.
    pub container_height: f64,
    /// Height of the panel's own frame.
    pub panel_height: f64,
    /// Bottom safe-area inset of the container.
    pub safe_area_bottom: f64,
    /// Physical pixels per point.
    pub screen_scale: f64,
}

impl HostMetrics {
    /// Largest offset a drag can reach: the collapsed position.
    #[must_use]
    pub fn max_offset(&self, collapsed_height: f64) -> f64 {
        self.panel_height - collapsed_height - self.safe_area_bottom
    }
}

/// Layout relations installed between the panel and its container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    /// `panel.bottom == container.bottom + offset`; the offset is driven
    /// through [`PanelHost::set_bottom_offset`].
    BottomOffset,
    /// `panel.width == container.width`.
    MatchWidth,
    /// `panel.height == container.height - top_offset`.
    HeightMinusTop { top_offset: f64 },
    /// `panel.height <= container.height - top_offset`.
    MaxHeightMinusTop { top_offset: f64 },
    /// `panel.top >= container.top + top_offset`.
    MinTop { top_offset: f64 },
}

/// Identifies one animated transition. Tickets increase monotonically per
/// panel; only the most recent one is honored on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnimationTicket(pub u64);

/// A scroll view embedded in the panel.
pub trait ScrollSurface {
    fn content_offset(&self) -> Vec2;
    fn set_content_offset(&mut self, offset: Vec2);
}

/// The view whose opacity follows the panel's distance from collapsed.
pub trait ContentView {
    fn set_alpha(&mut self, alpha: f64);
}

/// Everything the panel needs from the host platform.
///
/// Calls arrive on the UI thread only and never re-enter the panel.
pub trait PanelHost {
    /// Current container and panel measurements.
    fn metrics(&self) -> HostMetrics;

    /// Insert the panel view into the container, at `order` in the subview
    /// list when given, otherwise on top.
    fn install_panel(&mut self, order: Option<usize>);

    /// Remove the panel view from the container.
    fn remove_panel(&mut self);

    fn activate(&mut self, constraints: &[Constraint]);

    fn deactivate(&mut self, constraints: &[Constraint]);

    /// Set the constant of the [`Constraint::BottomOffset`] relation.
    fn set_bottom_offset(&mut self, offset: f64);

    fn set_panel_hidden(&mut self, hidden: bool);

    /// Run a synchronous layout pass.
    fn layout_if_needed(&mut self);

    /// Animate the pending layout change (the bottom offset was just set)
    /// using `spec`. The host must eventually report completion through
    /// `PullupPanel::animation_finished(ticket, finished)`.
    fn animate_layout(&mut self, ticket: AnimationTicket, spec: AnimationSpec);

    /// Round the panel's top corners.
    fn apply_corner_radius(&mut self, _radius: f64) {}

    /// The scroll view embedded in the panel, if any.
    fn embedded_scroll(&mut self) -> Option<&mut dyn ScrollSurface> {
        None
    }

    /// The view faded by `position_changed`, if any.
    fn content_view(&mut self) -> Option<&mut dyn ContentView> {
        None
    }
}

/// Optional hooks, all defaulting to no-ops.
pub trait PanelDelegate {
    /// Replace or adjust the snap table built from live geometry.
    fn snap_table(&self, _metrics: &HostMetrics, default: SnapTable) -> SnapTable {
        default
    }

    /// Called after the content alpha was recomputed for a new frame.
    fn position_changed(&mut self, _frame: Rect, _alpha: f64) {}

    /// Called whenever the current state changes.
    fn state_changed(&mut self, _from: PanelState, _to: PanelState) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_offset_subtracts_strip_and_safe_area() {
        let metrics = HostMetrics {
            container_height: 844.0,
            panel_height: 780.0,
            safe_area_bottom: 34.0,
            screen_scale: 3.0,
        };
        assert_eq!(metrics.max_offset(44.0), 702.0);
    }

    #[test]
    fn tickets_order_by_sequence() {
        assert!(AnimationTicket(3) > AnimationTicket(2));
    }
}
