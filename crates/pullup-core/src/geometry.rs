#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Vector arithmetic is exposed through named methods (`add`, `sub`, `neg`,
//! `scale`, `div`) rather than operator overloads.

/// A 2D point or vector in host coordinates (points, origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

// Named methods stand in for `std::ops` on purpose.
#[allow(clippy::should_implement_trait)]
impl Vec2 {
    /// The origin.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// A vector with only a vertical component.
    #[inline]
    #[must_use]
    pub const fn vertical(y: f64) -> Self {
        Self::new(0.0, y)
    }

    #[inline]
    #[must_use]
    pub fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    #[inline]
    #[must_use]
    pub fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    #[inline]
    #[must_use]
    pub fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }

    /// Multiply both components by `factor`.
    #[inline]
    #[must_use]
    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Divide both components by `divisor`. Division by zero follows IEEE 754.
    #[inline]
    #[must_use]
    pub fn div(self, divisor: f64) -> Self {
        Self::new(self.x / divisor, self.y / divisor)
    }

    /// Euclidean length.
    #[inline]
    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Copy with the horizontal component replaced.
    #[inline]
    #[must_use]
    pub fn with_x(self, x: f64) -> Self {
        Self::new(x, self.y)
    }

    /// Copy with the vertical component replaced.
    #[inline]
    #[must_use]
    pub fn with_y(self, y: f64) -> Self {
        Self::new(self.x, y)
    }

    /// True when both components are finite.
    #[inline]
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// An axis-aligned frame in host coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top edge.
    #[inline]
    #[must_use]
    pub const fn min_y(&self) -> f64 {
        self.y
    }

    /// Bottom edge.
    #[inline]
    #[must_use]
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }
}

/// Clamp `value` to `[0, 1]`. NaN maps to 0.
#[inline]
#[must_use]
pub fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}
