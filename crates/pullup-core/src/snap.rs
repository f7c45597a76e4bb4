#![forbid(unsafe_code)]

//! Snap targets: the offsets a released drag may settle on.
//!
//! # Invariants
//!
//! 1. Entries keep insertion order; the standard table is
//!    `[Expanded, HalfState, Collapsed]`.
//! 2. [`SnapTable::nearest`] picks the entry with the smallest absolute
//!    distance; ties go to the earlier entry.
//! 3. The standard table is rebuilt from live geometry on every resolution,
//!    so it follows rotations and size changes.

use crate::state::PanelState;

/// One `(offset, state)` pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapTarget {
    pub offset: f64,
    pub state: PanelState,
}

impl SnapTarget {
    #[inline]
    #[must_use]
    pub const fn new(offset: f64, state: PanelState) -> Self {
        Self { offset, state }
    }
}

/// Ordered set of snap targets.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SnapTable {
    targets: Vec<SnapTarget>,
}

impl SnapTable {
    /// Build a table from explicit targets, kept in the given order.
    #[must_use]
    pub fn new(targets: impl IntoIterator<Item = SnapTarget>) -> Self {
        Self {
            targets: targets.into_iter().collect(),
        }
    }

    /// The default table for a panel of `panel_height` whose collapsed
    /// offset is `max_offset`.
    ///
    /// The half-open entry sits at `panel_height * (1 - middle_state)`,
    /// clamped into `[0, max_offset]`.
    #[must_use]
    pub fn standard(panel_height: f64, max_offset: f64, middle_state: f64) -> Self {
        let max_offset = max_offset.max(0.0);
        let half = (panel_height * (1.0 - middle_state)).clamp(0.0, max_offset);
        Self::new([
            SnapTarget::new(0.0, PanelState::Expanded),
            SnapTarget::new(half, PanelState::HalfState),
            SnapTarget::new(max_offset, PanelState::Collapsed),
        ])
    }

    #[inline]
    #[must_use]
    pub fn targets(&self) -> &[SnapTarget] {
        &self.targets
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// The target closest to `projected`; earliest entry wins ties.
    #[must_use]
    pub fn nearest(&self, projected: f64) -> Option<SnapTarget> {
        let mut best: Option<(f64, SnapTarget)> = None;
        for target in &self.targets {
            let distance = (projected - target.offset).abs();
            if best.is_none_or(|(best_distance, _)| distance < best_distance) {
                best = Some((distance, *target));
            }
        }
        best.map(|(_, target)| target)
    }

    /// Offset of the first entry for `state`.
    #[must_use]
    pub fn offset_of(&self, state: PanelState) -> Option<f64> {
        self.targets
            .iter()
            .find(|target| target.state == state)
            .map(|target| target.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SnapTable {
        SnapTable::new([
            SnapTarget::new(0.0, PanelState::Expanded),
            SnapTarget::new(300.0, PanelState::HalfState),
            SnapTarget::new(600.0, PanelState::Collapsed),
        ])
    }

    #[test]
    fn nearest_picks_closest() {
        assert_eq!(
            table().nearest(280.0),
            Some(SnapTarget::new(300.0, PanelState::HalfState))
        );
        assert_eq!(
            table().nearest(650.0),
            Some(SnapTarget::new(600.0, PanelState::Collapsed))
        );
        assert_eq!(
            table().nearest(-400.0),
            Some(SnapTarget::new(0.0, PanelState::Expanded))
        );
    }

    #[test]
    fn ties_go_to_earlier_entry() {
        assert_eq!(table().nearest(150.0).map(|t| t.state), Some(PanelState::Expanded));
        assert_eq!(table().nearest(450.0).map(|t| t.state), Some(PanelState::HalfState));
    }

    #[test]
    fn empty_table_has_no_nearest() {
        assert_eq!(SnapTable::default().nearest(10.0), None);
    }

    #[test]
    fn nan_projection_falls_back_to_first_entry() {
        assert_eq!(
            table().nearest(f64::NAN).map(|t| t.state),
            Some(PanelState::Expanded)
        );
    }

    #[test]
    fn standard_table_layout() {
        // 700pt panel, 44pt strip, 34pt safe area.
        let t = SnapTable::standard(700.0, 700.0 - 44.0 - 34.0, 0.4);
        let states: Vec<_> = t.targets().iter().map(|t| t.state).collect();
        assert_eq!(
            states,
            vec![PanelState::Expanded, PanelState::HalfState, PanelState::Collapsed]
        );
        let half = t.offset_of(PanelState::HalfState).expect("half entry");
        assert!((half - 420.0).abs() < 1e-9, "half: {half}");
        assert_eq!(t.offset_of(PanelState::Collapsed), Some(622.0));
        assert_eq!(t.offset_of(PanelState::Hidden), None);
    }

    #[test]
    fn standard_half_entry_is_clamped() {
        let t = SnapTable::standard(100.0, 30.0, 0.1);
        assert_eq!(t.offset_of(PanelState::HalfState), Some(30.0));
        let degenerate = SnapTable::standard(40.0, -4.0, 0.4);
        assert_eq!(degenerate.offset_of(PanelState::Collapsed), Some(0.0));
    }
}
