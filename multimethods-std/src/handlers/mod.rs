//! Standard handler wrappers.

pub mod tracing;

pub use self::tracing::TracingHandler;
