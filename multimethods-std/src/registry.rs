//! Registry of named operations.
//!
//! A [`Registry`] owns its operations; there is no process-wide table. Create
//! one per subsystem (or per test) and hand out [`Method`] handles to
//! collaborators that only need to call an operation.
//!
//! [`Method`]: multimethods_core::Method

use crate::scope::LocalOperation;
use multimethods_core::{
    BoxHandler, DispatchError, Dispatcher, Handler, Matcher, Operation, OperationConfig,
    RegistrationError, Rule,
};
use std::{collections::HashMap, fmt};

/// A single-threaded container mapping operation names to rule lists.
///
/// `A` is the argument type, `K` the dispatch key type and `R` the handler
/// output type shared by every operation in the registry.
///
/// # Example
/// ```ignore
/// let mut registry = Registry::<[&'static str], &'static str, String>::new();
/// registry.define_operation("greet", OperationConfig::keyed(|args: &[&'static str]| args[0]));
/// registry.add_rule("greet", Matcher::key("en"), |args: &[&'static str]| format!("hello {}", args[1]))?;
/// registry.add_rule("greet", Matcher::key("fr"), |args: &[&'static str]| format!("bonjour {}", args[1]))?;
///
/// assert_eq!(registry.invoke("greet", &["fr", "Ana"])?, "bonjour Ana");
/// ```
pub struct Registry<A: ?Sized + 'static, K: 'static, R: 'static> {
    operations: HashMap<String, Operation<A, K, R>>,
}

impl<A: ?Sized + 'static, K: 'static, R: 'static> Registry<A, K, R> {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            operations: HashMap::new(),
        }
    }

    /// Install a fresh, empty operation under `name`.
    ///
    /// An existing operation with the same name is replaced, rules included.
    pub fn define_operation(&mut self, name: impl Into<String>, config: OperationConfig<A, K>) {
        let name = name.into();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            operation = %name,
            keyed = config.dispatch_fn().is_some(),
            "defined multimethod"
        );

        let operation = Operation::new(name.clone(), config);
        if let Some(_previous) = self.operations.insert(name, operation) {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                operation = %_previous.name(),
                discarded_rules = _previous.len(),
                "redefined multimethod"
            );
        }
    }

    /// Append a rule to the operation `name`.
    ///
    /// Fails with [`RegistrationError::OperationNotDefined`] and leaves the
    /// registry untouched if `name` has not been defined.
    pub fn add_rule<H>(
        &mut self,
        name: &str,
        matcher: Matcher<A, K>,
        handler: H,
    ) -> Result<(), RegistrationError>
    where
        H: Handler<A, Output = R>,
    {
        self.push_rule(name, Rule::new(matcher, handler))
    }

    /// Append a rule whose handler is already type-erased.
    pub fn add_boxed_rule(
        &mut self,
        name: &str,
        matcher: Matcher<A, K>,
        handler: BoxHandler<A, R>,
    ) -> Result<(), RegistrationError> {
        self.push_rule(name, Rule::from_boxed(matcher, handler))
    }

    fn push_rule(&mut self, name: &str, rule: Rule<A, K, R>) -> Result<(), RegistrationError> {
        let Some(operation) = self.operations.get_mut(name) else {
            #[cfg(feature = "tracing")]
            tracing::debug!(operation = %name, "rule added to undefined multimethod");
            return Err(RegistrationError::OperationNotDefined { name: name.into() });
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            operation = %name,
            rule = operation.len(),
            matcher = rule.matcher().kind(),
            "added rule"
        );

        operation.push(rule);
        Ok(())
    }

    /// Resolve the handler for a call without running it.
    pub fn resolve(&self, name: &str, args: &A) -> Result<&BoxHandler<A, R>, DispatchError>
    where
        K: PartialEq,
    {
        self.lookup(name)?.resolve(args)
    }

    /// Resolve the handler for a call and run it.
    pub fn invoke(&self, name: &str, args: &A) -> Result<R, DispatchError>
    where
        K: PartialEq,
    {
        self.lookup(name)?.invoke(args)
    }

    fn lookup(&self, name: &str) -> Result<&Operation<A, K, R>, DispatchError> {
        self.operations.get(name).ok_or_else(|| {
            #[cfg(feature = "tracing")]
            tracing::debug!(operation = %name, "invoked undefined multimethod");
            DispatchError::OperationNotFound { name: name.into() }
        })
    }

    /// Define a temporary operation, run `body` against it and remove it.
    ///
    /// The operation is removed on every exit path, including an error
    /// returned from `body` and a panic unwinding through it.
    ///
    /// # Example
    /// ```ignore
    /// let area = registry.define_local_operation("area", OperationConfig::new(), |scope| {
    ///     scope.add_rule(Matcher::predicate(|s: &Shape| s.is_square()), square_area)?;
    ///     Ok::<_, MultimethodError>(scope.invoke(&shape)?)
    /// })?;
    /// assert!(!registry.contains("area"));
    /// ```
    pub fn define_local_operation<'r, T, F>(
        &'r mut self,
        name: impl Into<String>,
        config: OperationConfig<A, K>,
        body: F,
    ) -> T
    where
        F: FnOnce(&mut LocalOperation<'r, A, K, R>) -> T,
    {
        let mut scope = LocalOperation::new(self, name, config);
        body(&mut scope)
    }

    /// Define a temporary operation, returning the guard that removes it.
    pub fn local_operation(
        &mut self,
        name: impl Into<String>,
        config: OperationConfig<A, K>,
    ) -> LocalOperation<'_, A, K, R> {
        LocalOperation::new(self, name, config)
    }

    /// Remove the operation `name`, returning it if it existed.
    pub fn remove_operation(&mut self, name: &str) -> Option<Operation<A, K, R>> {
        self.operations.remove(name)
    }

    /// Get the operation `name`.
    pub fn operation(&self, name: &str) -> Option<&Operation<A, K, R>> {
        self.operations.get(name)
    }

    /// Check if an operation named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }

    /// Get the number of rules of the operation `name`.
    pub fn rule_count(&self, name: &str) -> Option<usize> {
        self.operations.get(name).map(Operation::len)
    }

    /// Iterate over the defined operation names, in no particular order.
    pub fn operation_names(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }

    /// Get the number of operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check if the registry has no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl<A: ?Sized + 'static, K: 'static, R: 'static> Default for Registry<A, K, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: ?Sized + 'static, K: fmt::Debug + 'static, R: 'static> fmt::Debug for Registry<A, K, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("operations", &self.operations)
            .finish()
    }
}

impl<A: ?Sized + 'static, K: PartialEq + 'static, R: 'static> Dispatcher<A> for Registry<A, K, R> {
    type Output = R;

    fn invoke(&self, name: &str, args: &A) -> Result<R, DispatchError> {
        Registry::invoke(self, name, args)
    }
}
