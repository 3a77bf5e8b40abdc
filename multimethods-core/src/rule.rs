//! A registered `(Matcher, Handler)` pair.

use crate::{
    handler::{BoxHandler, Handler},
    matcher::Matcher,
};
use std::{fmt, sync::Arc};

/// An immutable pairing of a [`Matcher`] and a handler.
pub struct Rule<A: ?Sized + 'static, K: 'static, R: 'static> {
    matcher: Matcher<A, K>,
    handler: BoxHandler<A, R>,
}

impl<A: ?Sized + 'static, K: 'static, R: 'static> Rule<A, K, R> {
    /// Create a new rule.
    pub fn new<H>(matcher: Matcher<A, K>, handler: H) -> Self
    where
        H: Handler<A, Output = R>,
    {
        Self {
            matcher,
            handler: Arc::new(handler),
        }
    }

    /// Create a rule from an already type-erased handler.
    pub fn from_boxed(matcher: Matcher<A, K>, handler: BoxHandler<A, R>) -> Self {
        Self { matcher, handler }
    }

    /// Get the matcher.
    pub fn matcher(&self) -> &Matcher<A, K> {
        &self.matcher
    }

    /// Get the handler.
    pub fn handler(&self) -> &BoxHandler<A, R> {
        &self.handler
    }
}

impl<A: ?Sized + 'static, K: Clone + 'static, R: 'static> Clone for Rule<A, K, R> {
    fn clone(&self) -> Self {
        Self {
            matcher: self.matcher.clone(),
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<A: ?Sized + 'static, K: fmt::Debug + 'static, R: 'static> fmt::Debug for Rule<A, K, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}
