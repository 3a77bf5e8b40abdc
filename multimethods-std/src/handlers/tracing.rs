//! Span-per-call instrumentation for handlers.

use multimethods_core::Handler;
use std::fmt::Debug;

/// A handler wrapper that instruments each call with a `tracing` span.
///
/// With the `tracing` feature disabled the wrapper only forwards the call.
pub struct TracingHandler<H> {
    inner: H,
    name: &'static str,
}

impl<H> TracingHandler<H> {
    /// Create a new `TracingHandler` wrapper around a handler.
    pub const fn new(inner: H, name: &'static str) -> Self {
        Self { inner, name }
    }

    /// Get the name recorded on the span.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Get the wrapped handler.
    pub fn inner(&self) -> &H {
        &self.inner
    }
}

impl<H: Clone> Clone for TracingHandler<H> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            name: self.name,
        }
    }
}

impl<A, H> Handler<A> for TracingHandler<H>
where
    A: ?Sized + Debug,
    H: Handler<A>,
{
    type Output = H::Output;

    #[cfg(feature = "tracing")]
    fn call(&self, args: &A) -> Self::Output {
        let span = tracing::info_span!("multimethod_handler", handler = %self.name, args = ?args);
        let _entered = span.enter();
        self.inner.call(args)
    }

    #[cfg(not(feature = "tracing"))]
    fn call(&self, args: &A) -> Self::Output {
        self.inner.call(args)
    }
}
