//! Testing utilities for multimethods.
//!
//! This module provides handlers that make it easy to assert which rule a call
//! was resolved to.
//!
//! # Features
//!
//! - [`RecordingHandler`]: records the arguments of every call it receives
//! - [`CountingHandler`]: counts invocations

use multimethods_core::Handler;
use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Recording Handler
// ============================================================================

/// A handler that records the arguments of every call and returns a fixed
/// output.
///
/// Clones share the same record, so keep one clone for assertions and
/// register the other.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = RecordingHandler::<[i64], _>::new("high");
/// registry.add_rule("classify", high, recorder.clone())?;
///
/// registry.invoke("classify", &[20])?;
/// assert_eq!(recorder.calls(), vec![vec![20]]);
/// ```
pub struct RecordingHandler<A: ?Sized + ToOwned, R> {
    calls: Arc<Mutex<Vec<A::Owned>>>,
    output: R,
}

impl<A: ?Sized + ToOwned, R> RecordingHandler<A, R> {
    /// Create a new recording handler that returns `output` on every call.
    pub fn new(output: R) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            output,
        }
    }

    fn record(&self) -> MutexGuard<'_, Vec<A::Owned>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get a clone of the recorded arguments.
    pub fn calls(&self) -> Vec<A::Owned>
    where
        A::Owned: Clone,
    {
        self.record().clone()
    }

    /// Get the number of recorded calls.
    pub fn count(&self) -> usize {
        self.record().len()
    }

    /// Clear all recorded calls.
    pub fn clear(&self) {
        self.record().clear();
    }
}

impl<A: ?Sized + ToOwned, R: Clone> Clone for RecordingHandler<A, R> {
    fn clone(&self) -> Self {
        Self {
            calls: self.calls.clone(),
            output: self.output.clone(),
        }
    }
}

impl<A, R> Handler<A> for RecordingHandler<A, R>
where
    A: ?Sized + ToOwned + 'static,
    A::Owned: Send + 'static,
    R: Clone + Send + Sync + 'static,
{
    type Output = R;

    fn call(&self, args: &A) -> Self::Output {
        self.record().push(args.to_owned());
        self.output.clone()
    }
}

// ============================================================================
// Counting Handler
// ============================================================================

/// A handler that counts invocations and returns a fixed output.
///
/// # Example
///
/// ```rust,ignore
/// let counter = CountingHandler::new(());
/// registry.add_rule("notify", Matcher::Default, counter.clone())?;
///
/// registry.invoke("notify", &event)?;
/// assert_eq!(counter.count(), 1);
/// ```
pub struct CountingHandler<R> {
    count: Arc<AtomicUsize>,
    output: R,
}

impl<R> CountingHandler<R> {
    /// Create a new counting handler that returns `output` on every call.
    pub fn new(output: R) -> Self {
        Self {
            count: Arc::new(AtomicUsize::new(0)),
            output,
        }
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl<R: Clone> Clone for CountingHandler<R> {
    fn clone(&self) -> Self {
        Self {
            count: self.count.clone(),
            output: self.output.clone(),
        }
    }
}

impl<A, R> Handler<A> for CountingHandler<R>
where
    A: ?Sized,
    R: Clone + Send + Sync + 'static,
{
    type Output = R;

    fn call(&self, _args: &A) -> Self::Output {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.output.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_handler_shares_record() {
        let recorder = RecordingHandler::<[i64], &str>::new("seen");
        let registered = recorder.clone();

        assert_eq!(registered.call(&[1, 2]), "seen");
        assert_eq!(registered.call(&[3]), "seen");

        assert_eq!(recorder.calls(), vec![vec![1, 2], vec![3]]);
        assert_eq!(recorder.count(), 2);
        recorder.clear();
        assert_eq!(registered.count(), 0);
    }

    #[test]
    fn test_counting_handler() {
        let counter = CountingHandler::new(7u8);
        let registered = counter.clone();
        let args: &str = "x";

        assert_eq!(registered.call(args), 7);
        assert_eq!(counter.count(), 1);
        counter.reset();
        assert_eq!(counter.count(), 0);
    }
}
