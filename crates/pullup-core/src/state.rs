#![forbid(unsafe_code)]

//! Discrete panel states.

/// Where the panel rests.
///
/// State machine:
///
/// ```text
/// Uninstalled --attach--> {Hidden, Collapsed, HalfState, Expanded}
/// {Hidden, Collapsed, HalfState, Expanded} --set_state / drag--> same set
/// any --detach--> Uninstalled
/// ```
///
/// Drag resolution only ever lands on `Collapsed`, `HalfState` or
/// `Expanded`; `Hidden` is reachable through `set_state` alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PanelState {
    /// Not attached to a host.
    #[default]
    Uninstalled,
    /// Attached but moved fully offscreen and hidden.
    Hidden,
    /// Only the collapsed strip is visible.
    Collapsed,
    /// Resting at the configured middle fraction.
    HalfState,
    /// Fully open (offset 0).
    Expanded,
}

impl PanelState {
    /// True for every state other than [`PanelState::Uninstalled`].
    #[inline]
    #[must_use]
    pub fn is_installed(self) -> bool {
        !matches!(self, Self::Uninstalled)
    }

    /// True for the states a drag can land on.
    #[inline]
    #[must_use]
    pub fn is_snap_state(self) -> bool {
        matches!(self, Self::Collapsed | Self::HalfState | Self::Expanded)
    }
}
