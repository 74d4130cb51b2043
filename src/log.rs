//! Feature-gated logging.
//!
//! The pipeline runs inside a document build whose own output matters
//! more than ours, so instrumentation is opt-in: with the `tracing`
//! feature the macros forward to `tracing`, without it every call site
//! compiles to nothing and the pipeline carries no logging cost.

#[cfg(feature = "tracing")]
pub use tracing::{debug, warn};

/// Compiled-out stand-in for `tracing::debug!`.
#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {{}};
}

/// Compiled-out stand-in for `tracing::warn!`.
#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "tracing"))]
pub use crate::{debug, warn};
