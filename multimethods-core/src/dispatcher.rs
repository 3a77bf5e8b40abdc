//! Dispatcher core trait and the [`Method`] capability handle.

use crate::error::DispatchError;
use std::{fmt, marker::PhantomData};

/// Anything that can resolve and run a named operation.
///
/// Implemented by the registries in `multimethods-std`. Collaborators that only
/// need to call an operation should hold a [`Method`] rather than the whole
/// registry.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot dispatch calls with arguments of type `{A}`",
    label = "missing `Dispatcher` implementation",
    note = "Implement `Dispatcher<{A}>` to resolve operations by name."
)]
pub trait Dispatcher<A: ?Sized> {
    /// The value produced by a successful call.
    type Output;

    /// Resolve the handler for `name` and run it with `args`.
    fn invoke(&self, name: &str, args: &A) -> Result<Self::Output, DispatchError>;

    /// Get a callable handle for a single operation.
    fn method(&self, name: impl Into<String>) -> Method<'_, Self, A>
    where
        Self: Sized,
    {
        Method::new(self, name)
    }
}

/// A first-class handle to one operation of a [`Dispatcher`].
///
/// The handle does not check that the operation exists; each call is
/// resolved against the dispatcher's current state.
pub struct Method<'d, D: ?Sized, A: ?Sized> {
    dispatcher: &'d D,
    name: String,
    _args: PhantomData<fn(&A)>,
}

impl<'d, D, A> Method<'d, D, A>
where
    D: Dispatcher<A> + ?Sized,
    A: ?Sized,
{
    /// Create a handle for `name` on `dispatcher`.
    pub fn new(dispatcher: &'d D, name: impl Into<String>) -> Self {
        Self {
            dispatcher,
            name: name.into(),
            _args: PhantomData,
        }
    }

    /// Get the operation name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the operation.
    pub fn invoke(&self, args: &A) -> Result<D::Output, DispatchError> {
        self.dispatcher.invoke(&self.name, args)
    }
}

impl<D: ?Sized, A: ?Sized> Clone for Method<'_, D, A> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher,
            name: self.name.clone(),
            _args: PhantomData,
        }
    }
}

impl<D: ?Sized, A: ?Sized> fmt::Debug for Method<'_, D, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method").field("name", &self.name).finish()
    }
}
