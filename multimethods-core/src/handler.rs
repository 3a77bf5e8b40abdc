//! # Handler
//!
//! The terminal endpoint of a dispatch: once a rule is selected, its handler
//! receives the original call arguments and produces the call's result.
//!
//! # Usage Patterns
//!
//! 1. **Direct closure**: `|args: &[i64]| args[0] * 2`
//! 2. **Struct implementation**: `impl Handler<Args> for MyHandler`
//! 3. **Bound receiver**: `Bound::new(receiver, |recv: &Shape, args: &Args| ...)`
//!
//! Handlers are stored type-erased as [`BoxHandler`] so that closures and
//! structs can live side by side in one rule list.

use std::{fmt, sync::Arc};

/// The endpoint invoked when a rule is selected.
///
/// `A` is the argument type shared by every handler of an operation. It may be
/// unsized, so operations can take `&[T]`, `&str` or `&dyn Trait` arguments.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot handle arguments of type `{A}`",
    label = "missing `Handler<{A}>` implementation",
    note = "Closures of the form `Fn(&{A}) -> Output` implement `Handler` automatically."
)]
pub trait Handler<A: ?Sized>: Send + Sync + 'static {
    /// The value produced by a call.
    type Output;

    /// Executes the handler logic.
    fn call(&self, args: &A) -> Self::Output;
}

// Blanket impl for closures
impl<F, A, Out> Handler<A> for F
where
    A: ?Sized,
    F: Fn(&A) -> Out + Send + Sync + 'static,
{
    type Output = Out;

    fn call(&self, args: &A) -> Self::Output {
        (self)(args)
    }
}

/// A type-erased, shareable handler.
pub type BoxHandler<A, R> = Arc<dyn Handler<A, Output = R>>;

/// A handler that carries a captured receiver context.
///
/// The context is passed to the wrapped function as an explicit leading
/// argument on every call, so the handler behaves like a method bound to
/// its receiver.
pub struct Bound<C, F> {
    context: C,
    f: F,
}

impl<C, F> Bound<C, F> {
    /// Bind `f` to `context`.
    pub fn new(context: C, f: F) -> Self {
        Self { context, f }
    }

    /// Get the captured context.
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Consume the handler, returning the captured context.
    pub fn into_context(self) -> C {
        self.context
    }
}

impl<C: fmt::Debug, F> fmt::Debug for Bound<C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bound")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

impl<A, C, F, Out> Handler<A> for Bound<C, F>
where
    A: ?Sized,
    C: Send + Sync + 'static,
    F: Fn(&C, &A) -> Out + Send + Sync + 'static,
{
    type Output = Out;

    fn call(&self, args: &A) -> Self::Output {
        (self.f)(&self.context, args)
    }
}
