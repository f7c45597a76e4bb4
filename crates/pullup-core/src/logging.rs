#![forbid(unsafe_code)]

//! Logging facade.
//!
//! With the `tracing` feature enabled this module re-exports the `tracing`
//! event macros. Without it, no-op macros with the same names are exported at
//! the crate root so call sites compile unchanged:
//!
//! ```ignore
//! #[cfg(feature = "tracing")]
//! use crate::logging::{debug, warn};
//! #[cfg(not(feature = "tracing"))]
//! use crate::{debug, warn};
//! ```
//!
//! The no-op variants still type-check nothing and evaluate nothing, so
//! arguments must not carry side effects.

#[cfg(feature = "tracing")]
pub use tracing::{debug, trace, warn};

#[cfg(not(feature = "tracing"))]
mod noop {
    /// No-op stand-in for `tracing::debug!`.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {{}};
    }

    /// No-op stand-in for `tracing::trace!`.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {{}};
    }

    /// No-op stand-in for `tracing::warn!`.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {{}};
    }
}
