#![forbid(unsafe_code)]

//! Panel configuration.
//!
//! Every tunable of the panel lives in [`PanelConfig`]; there is no
//! subclassing. Build one with [`PanelConfig::default`] and the `with_*`
//! builders, then hand it to [`PullupPanel::new`](crate::panel::PullupPanel::new),
//! which validates it.
//!
//! With the `serde` feature, missing fields deserialize to their defaults:
//!
//! ```ignore
//! let config: PanelConfig = serde_json::from_str(r#"{"middle_state": 0.5}"#)?;
//! assert_eq!(config.collapsed_height, 44.0);
//! ```

use crate::animation::AnimationSpec;
use crate::deceleration::{DEFAULT_DECELERATION_RATE, validate_rate};
use crate::error::ConfigError;

/// Tunables for a [`PullupPanel`](crate::panel::PullupPanel).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PanelConfig {
    /// Gap kept between the host's top edge and the fully expanded panel.
    pub top_offset: f64,
    /// Height of the strip that stays visible when collapsed.
    pub collapsed_height: f64,
    /// Fraction of the panel height, from the top, that is open at `HalfState`.
    pub middle_state: f64,
    /// Radius of the panel's top corners.
    pub corner_radius: f64,
    /// Let the panel size itself to its content (bounded by `top_offset`)
    /// instead of filling the host minus `top_offset`.
    pub respect_content_view_height: bool,
    /// Per-millisecond velocity retention applied on release.
    pub deceleration_rate: f64,
    /// Distance above the collapsed position over which content fades in.
    pub fade_distance: f64,
    /// Timing of animated transitions.
    pub transition: AnimationSpec,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            top_offset: 64.0,
            collapsed_height: 44.0,
            middle_state: 0.4,
            corner_radius: 16.0,
            respect_content_view_height: false,
            deceleration_rate: DEFAULT_DECELERATION_RATE,
            fade_distance: 44.0,
            transition: AnimationSpec::PANEL,
        }
    }
}

impl PanelConfig {
    #[must_use]
    pub fn with_top_offset(mut self, top_offset: f64) -> Self {
        self.top_offset = top_offset;
        self
    }

    #[must_use]
    pub fn with_collapsed_height(mut self, height: f64) -> Self {
        self.collapsed_height = height;
        self
    }

    #[must_use]
    pub fn with_middle_state(mut self, fraction: f64) -> Self {
        self.middle_state = fraction;
        self
    }

    #[must_use]
    pub fn with_corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = radius;
        self
    }

    #[must_use]
    pub fn with_respect_content_view_height(mut self, respect: bool) -> Self {
        self.respect_content_view_height = respect;
        self
    }

    #[must_use]
    pub fn with_deceleration_rate(mut self, rate: f64) -> Self {
        self.deceleration_rate = rate;
        self
    }

    #[must_use]
    pub fn with_fade_distance(mut self, distance: f64) -> Self {
        self.fade_distance = distance;
        self
    }

    #[must_use]
    pub fn with_transition(mut self, transition: AnimationSpec) -> Self {
        self.transition = transition;
        self
    }

    /// Reject values that would make geometry or physics meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("top_offset", self.top_offset),
            ("collapsed_height", self.collapsed_height),
            ("corner_radius", self.corner_radius),
            ("fade_distance", self.fade_distance),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::NegativeLength { field, value });
            }
        }
        if !(0.0..=1.0).contains(&self.middle_state) {
            return Err(ConfigError::MiddleStateOutOfRange {
                value: self.middle_state,
            });
        }
        validate_rate(self.deceleration_rate)?;
        Ok(())
    }
}
