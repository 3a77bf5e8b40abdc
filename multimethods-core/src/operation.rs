//! # Operation and Resolution
//!
//! An [`Operation`] is a named, ordered, append-only list of [`Rule`]s plus an
//! optional dispatch fn. [`Operation::resolve`] walks the list and selects the
//! single handler a call should run.
//!
//! # Resolution
//!
//! 1. If the operation has a dispatch fn, the dispatch key is computed once.
//! 2. Every rule is visited in registration order:
//!    - a predicate rule on a keyed operation fails the call with
//!      [`DispatchError::ConflictingDispatchMode`];
//!    - a predicate rule matches when the predicate returns `true`;
//!    - a key rule matches when its key equals the dispatch key;
//!    - a default rule records its handler as the fallback.
//! 3. The selected handler, else the fallback, is returned. With neither the
//!    call fails with [`DispatchError::NoMatchingHandler`].
//!
//! # Priority
//!
//! Under the default [`MatchPriority::LastMatch`] the scan never stops early
//! and the **last** matching rule wins, so a later registration overrides an
//! earlier one. Register general rules first and specific rules after them.
//! [`MatchPriority::FirstMatch`] opts into the conventional first-wins order.

use crate::{
    error::DispatchError,
    handler::BoxHandler,
    matcher::Matcher,
    rule::Rule,
};
use std::{fmt, sync::Arc};

/// Computes the dispatch key of a call.
pub type DispatchFn<A, K> = Arc<dyn Fn(&A) -> K + Send + Sync>;

/// Which rule wins when several rules match one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPriority {
    /// The last-registered matching rule wins (default).
    #[default]
    LastMatch,
    /// The first-registered matching rule wins.
    FirstMatch,
}

/// Definition options for an operation.
///
/// # Example
/// ```ignore
/// // Predicate dispatch
/// registry.define_operation("classify", OperationConfig::new());
///
/// // Keyed dispatch
/// registry.define_operation("greet", OperationConfig::keyed(|args: &[&str]| args[0]));
/// ```
pub struct OperationConfig<A: ?Sized + 'static, K: 'static> {
    dispatch_fn: Option<DispatchFn<A, K>>,
    priority: MatchPriority,
}

impl<A: ?Sized + 'static, K: 'static> OperationConfig<A, K> {
    /// Create a config without a dispatch fn.
    pub fn new() -> Self {
        Self {
            dispatch_fn: None,
            priority: MatchPriority::default(),
        }
    }

    /// Create a config that dispatches on the key computed by `dispatch_fn`.
    pub fn keyed<F>(dispatch_fn: F) -> Self
    where
        F: Fn(&A) -> K + Send + Sync + 'static,
    {
        Self::new().with_dispatch_fn(dispatch_fn)
    }

    /// Set the dispatch fn.
    pub fn with_dispatch_fn<F>(mut self, dispatch_fn: F) -> Self
    where
        F: Fn(&A) -> K + Send + Sync + 'static,
    {
        self.dispatch_fn = Some(Arc::new(dispatch_fn));
        self
    }

    /// Set the match priority.
    pub fn with_priority(mut self, priority: MatchPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Get the dispatch fn, if any.
    pub fn dispatch_fn(&self) -> Option<&DispatchFn<A, K>> {
        self.dispatch_fn.as_ref()
    }

    /// Get the match priority.
    pub fn priority(&self) -> MatchPriority {
        self.priority
    }
}

impl<A: ?Sized + 'static, K: 'static> Default for OperationConfig<A, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: ?Sized + 'static, K: 'static> Clone for OperationConfig<A, K> {
    fn clone(&self) -> Self {
        Self {
            dispatch_fn: self.dispatch_fn.clone(),
            priority: self.priority,
        }
    }
}

impl<A: ?Sized + 'static, K: 'static> fmt::Debug for OperationConfig<A, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationConfig")
            .field("keyed", &self.dispatch_fn.is_some())
            .field("priority", &self.priority)
            .finish()
    }
}

/// A named unit of dispatchable behavior.
pub struct Operation<A: ?Sized + 'static, K: 'static, R: 'static> {
    name: String,
    config: OperationConfig<A, K>,
    rules: Vec<Rule<A, K, R>>,
}

impl<A: ?Sized + 'static, K: 'static, R: 'static> Operation<A, K, R> {
    /// Create an operation with an empty rule list.
    pub fn new(name: impl Into<String>, config: OperationConfig<A, K>) -> Self {
        Self {
            name: name.into(),
            config,
            rules: Vec::new(),
        }
    }

    /// Get the operation name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the definition options.
    pub fn config(&self) -> &OperationConfig<A, K> {
        &self.config
    }

    /// Get the rules in registration order.
    pub fn rules(&self) -> &[Rule<A, K, R>] {
        &self.rules
    }

    /// Append a rule.
    pub fn push(&mut self, rule: Rule<A, K, R>) {
        self.rules.push(rule);
    }

    /// Get the number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the operation has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Select the handler for a call without running it.
    pub fn resolve(&self, args: &A) -> Result<&BoxHandler<A, R>, DispatchError>
    where
        K: PartialEq,
    {
        let key = self.config.dispatch_fn.as_ref().map(|dispatch| dispatch(args));
        let first_match = self.config.priority == MatchPriority::FirstMatch;

        let mut selected: Option<(usize, &BoxHandler<A, R>)> = None;
        let mut fallback: Option<&BoxHandler<A, R>> = None;

        for (index, rule) in self.rules.iter().enumerate() {
            // Under FirstMatch the scan still runs to the end so that a
            // conflicting predicate is always reported.
            let locked = first_match && selected.is_some();
            let matched = match rule.matcher() {
                Matcher::Predicate(predicate) => {
                    if key.is_some() {
                        #[cfg(feature = "tracing")]
                        tracing::debug!(
                            operation = %self.name,
                            rule = index,
                            "predicate rule on keyed multimethod"
                        );
                        return Err(DispatchError::ConflictingDispatchMode {
                            name: self.name.clone(),
                            rule_index: index,
                        });
                    }
                    !locked && predicate(args)
                }
                Matcher::Key(literal) => key.as_ref() == Some(literal),
                Matcher::Default => {
                    if !(first_match && fallback.is_some()) {
                        fallback = Some(rule.handler());
                    }
                    false
                }
            };

            if matched && !locked {
                selected = Some((index, rule.handler()));
            }
        }

        match (selected, fallback) {
            (Some((_index, handler)), _) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(operation = %self.name, rule = _index, "selected rule");
                Ok(handler)
            }
            (None, Some(handler)) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(operation = %self.name, "no rule matched, using fallback");
                Ok(handler)
            }
            (None, None) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(operation = %self.name, "no matching handler");
                Err(DispatchError::NoMatchingHandler {
                    name: self.name.clone(),
                })
            }
        }
    }

    /// Resolve the handler for a call and run it.
    pub fn invoke(&self, args: &A) -> Result<R, DispatchError>
    where
        K: PartialEq,
    {
        let handler = self.resolve(args)?;
        Ok(handler.call(args))
    }
}

impl<A: ?Sized + 'static, K: Clone + 'static, R: 'static> Clone for Operation<A, K, R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            config: self.config.clone(),
            rules: self.rules.clone(),
        }
    }
}

impl<A: ?Sized + 'static, K: fmt::Debug + 'static, R: 'static> fmt::Debug for Operation<A, K, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("rules", &self.rules)
            .finish()
    }
}
