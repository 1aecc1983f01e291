//! Instrumentation for the submission path and the fixpoint driver.
//!
//! Built with the `tracing` feature, this re-exports the tracing macros the
//! crate emits through. Without it the same macros expand to nothing, so the
//! `#[cfg(feature = "tracing")]` call sites in `instantiate`, `unify` and
//! `fixpoint` compile either way.
//!
//! Events emitted:
//! - `submit` span per submitted atom
//! - `submit_arity_mismatch`, `instance_admitted` (trace)
//! - `unify_constant_mismatch`, `unify_binding_conflict`, `unify_success` (trace)
//! - `instantiator_ready`, `evaluated` (debug)
//! - `fixpoint_done` (info)

#[cfg(feature = "tracing")]
pub use tracing::{debug, debug_span, info, trace};

#[cfg(not(feature = "tracing"))]
mod noop {
    /// Stands in for `tracing::Span` at `debug_span!` call sites.
    pub struct Span;

    impl Span {
        pub fn none() -> Self {
            Span
        }

        pub fn entered(self) -> SpanGuard {
            SpanGuard
        }
    }

    pub struct SpanGuard;

    #[macro_export]
    macro_rules! trace {
        ($($tt:tt)*) => {};
    }

    #[macro_export]
    macro_rules! debug {
        ($($tt:tt)*) => {};
    }

    #[macro_export]
    macro_rules! info {
        ($($tt:tt)*) => {};
    }

    #[macro_export]
    macro_rules! debug_span {
        ($($tt:tt)*) => {
            $crate::trace::Span::none()
        };
    }

    pub use crate::{debug, debug_span, info, trace};
}

#[cfg(not(feature = "tracing"))]
pub use noop::*;

/// Send engine events to stderr, filtered by `RUST_LOG` (default `info`, so
/// only `fixpoint_done` shows). The CLI calls this once at startup; later
/// calls are ignored.
#[cfg(feature = "tracing")]
pub fn init_subscriber() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(false),
        )
        .with(filter)
        .try_init()
        .ok();
}

#[cfg(not(feature = "tracing"))]
pub fn init_subscriber() {}

#[cfg(test)]
#[path = "tests/trace.rs"]
mod tests;
