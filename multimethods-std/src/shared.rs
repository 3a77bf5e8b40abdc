//! Thread-safe registry with copy-on-write operations.
//!
//! Each operation is held behind an `Arc`. A call clones the `Arc` under a
//! short read lock and scans that snapshot with no lock held, so an in-flight
//! call always sees a consistent rule list and handlers may call back into the
//! registry. Adding a rule clones the operation if a call still holds the old
//! snapshot.

use multimethods_core::{
    BoxHandler, DispatchError, Dispatcher, Handler, Matcher, Operation, OperationConfig,
    RegistrationError, Rule,
};
use std::{
    collections::HashMap,
    fmt,
    sync::{
        Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
        atomic::{AtomicU64, Ordering},
    },
};

struct Slot<A: ?Sized + 'static, K: 'static, R: 'static> {
    generation: u64,
    operation: Arc<Operation<A, K, R>>,
}

/// A registry that can be shared across threads, e.g. from a `static`.
///
/// # Example
/// ```ignore
/// lazy_static! {
///     static ref REGISTRY: SharedRegistry<str, String, usize> = SharedRegistry::new();
/// }
///
/// REGISTRY.define_operation("len", OperationConfig::new());
/// REGISTRY.add_rule("len", Matcher::Default, |s: &str| s.len())?;
/// ```
pub struct SharedRegistry<A: ?Sized + 'static, K: 'static, R: 'static> {
    operations: RwLock<HashMap<String, Slot<A, K, R>>>,
    next_generation: AtomicU64,
}

impl<A: ?Sized + 'static, K: 'static, R: 'static> SharedRegistry<A, K, R> {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            operations: RwLock::new(HashMap::new()),
            next_generation: AtomicU64::new(0),
        }
    }

    // The map is only ever mutated by whole-value inserts, removals and
    // pushes, so a panic elsewhere cannot leave it half-updated.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Slot<A, K, R>>> {
        self.operations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Slot<A, K, R>>> {
        self.operations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Install a fresh, empty operation under `name`, replacing any previous
    /// operation of the same name.
    pub fn define_operation(&self, name: impl Into<String>, config: OperationConfig<A, K>) {
        self.define_generation(name.into(), config);
    }

    pub(crate) fn define_generation(&self, name: String, config: OperationConfig<A, K>) -> u64 {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);

        #[cfg(feature = "tracing")]
        tracing::debug!(operation = %name, generation, "defined shared multimethod");

        let slot = Slot {
            generation,
            operation: Arc::new(Operation::new(name.clone(), config)),
        };
        if let Some(_previous) = self.write().insert(name, slot) {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                operation = %_previous.operation.name(),
                discarded_rules = _previous.operation.len(),
                "redefined shared multimethod"
            );
        }
        generation
    }

    /// Append a rule to the operation `name`.
    pub fn add_rule<H>(
        &self,
        name: &str,
        matcher: Matcher<A, K>,
        handler: H,
    ) -> Result<(), RegistrationError>
    where
        K: Clone,
        H: Handler<A, Output = R>,
    {
        self.push_rule(name, None, Rule::new(matcher, handler))
    }

    /// Append a rule whose handler is already type-erased.
    pub fn add_boxed_rule(
        &self,
        name: &str,
        matcher: Matcher<A, K>,
        handler: BoxHandler<A, R>,
    ) -> Result<(), RegistrationError>
    where
        K: Clone,
    {
        self.push_rule(name, None, Rule::from_boxed(matcher, handler))
    }

    /// Push `rule` onto `name`, optionally only if the slot still holds
    /// `generation`.
    pub(crate) fn push_rule(
        &self,
        name: &str,
        generation: Option<u64>,
        rule: Rule<A, K, R>,
    ) -> Result<(), RegistrationError>
    where
        K: Clone,
    {
        let mut operations = self.write();
        let slot = operations
            .get_mut(name)
            .filter(|slot| generation.is_none_or(|g| g == slot.generation))
            .ok_or_else(|| RegistrationError::OperationNotDefined { name: name.into() })?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            operation = %name,
            rule = slot.operation.len(),
            matcher = rule.matcher().kind(),
            "added rule"
        );

        Arc::make_mut(&mut slot.operation).push(rule);
        Ok(())
    }

    /// Get a snapshot of the operation `name`.
    ///
    /// Later rule additions do not affect an already taken snapshot.
    pub fn snapshot(&self, name: &str) -> Result<Arc<Operation<A, K, R>>, DispatchError> {
        self.read()
            .get(name)
            .map(|slot| Arc::clone(&slot.operation))
            .ok_or_else(|| DispatchError::OperationNotFound { name: name.into() })
    }

    pub(crate) fn snapshot_generation(
        &self,
        name: &str,
        generation: u64,
    ) -> Result<Arc<Operation<A, K, R>>, DispatchError> {
        self.read()
            .get(name)
            .filter(|slot| slot.generation == generation)
            .map(|slot| Arc::clone(&slot.operation))
            .ok_or_else(|| DispatchError::OperationNotFound { name: name.into() })
    }

    /// Resolve the handler for a call without running it.
    pub fn resolve(&self, name: &str, args: &A) -> Result<BoxHandler<A, R>, DispatchError>
    where
        K: PartialEq,
    {
        self.snapshot(name)?.resolve(args).map(Arc::clone)
    }

    /// Resolve the handler for a call and run it.
    ///
    /// No lock is held while the predicates, dispatch fn and handler run.
    pub fn invoke(&self, name: &str, args: &A) -> Result<R, DispatchError>
    where
        K: PartialEq,
    {
        self.snapshot(name)?.invoke(args)
    }

    /// Define a temporary operation, run `body` against it and remove it.
    ///
    /// See [`SharedLocalOperation`] for how overlapping scopes interact.
    pub fn define_local_operation<'r, T, F>(
        &'r self,
        name: impl Into<String>,
        config: OperationConfig<A, K>,
        body: F,
    ) -> T
    where
        F: FnOnce(&SharedLocalOperation<'r, A, K, R>) -> T,
    {
        let scope = SharedLocalOperation::new(self, name, config);
        body(&scope)
    }

    /// Define a temporary operation, returning the guard that removes it.
    pub fn local_operation(
        &self,
        name: impl Into<String>,
        config: OperationConfig<A, K>,
    ) -> SharedLocalOperation<'_, A, K, R> {
        SharedLocalOperation::new(self, name, config)
    }

    /// Remove the operation `name`. Returns whether it existed.
    pub fn remove_operation(&self, name: &str) -> bool {
        self.write().remove(name).is_some()
    }

    pub(crate) fn remove_generation(&self, name: &str, generation: u64) -> bool {
        let mut operations = self.write();
        match operations.get(name) {
            Some(slot) if slot.generation == generation => operations.remove(name).is_some(),
            _ => false,
        }
    }

    /// Check if an operation named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// Get the number of rules of the operation `name`.
    pub fn rule_count(&self, name: &str) -> Option<usize> {
        self.read().get(name).map(|slot| slot.operation.len())
    }

    /// Get the defined operation names, sorted.
    pub fn operation_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Get the number of operations.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Check if the registry has no operations.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

impl<A: ?Sized + 'static, K: 'static, R: 'static> Default for SharedRegistry<A, K, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: ?Sized + 'static, K: 'static, R: 'static> fmt::Debug for SharedRegistry<A, K, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedRegistry")
            .field("operations", &self.operation_names())
            .finish_non_exhaustive()
    }
}

impl<A: ?Sized + 'static, K: PartialEq + 'static, R: 'static> Dispatcher<A>
    for SharedRegistry<A, K, R>
{
    type Output = R;

    fn invoke(&self, name: &str, args: &A) -> Result<R, DispatchError> {
        SharedRegistry::invoke(self, name, args)
    }
}

/// Guard for a temporary operation in a [`SharedRegistry`].
///
/// Each temporary operation is tagged with a unique generation. The guard only
/// adds rules to, invokes, and removes the slot while it still holds that
/// generation. If another thread redefines the same name while the scope is
/// open, the guard's calls fail with `OperationNotDefined`/`OperationNotFound`
/// and its teardown leaves the newer definition alone.
pub struct SharedLocalOperation<'r, A: ?Sized + 'static, K: 'static, R: 'static> {
    registry: &'r SharedRegistry<A, K, R>,
    name: String,
    generation: u64,
}

impl<'r, A: ?Sized + 'static, K: 'static, R: 'static> SharedLocalOperation<'r, A, K, R> {
    /// Define `name` in `registry` and return the guard that removes it.
    pub fn new(
        registry: &'r SharedRegistry<A, K, R>,
        name: impl Into<String>,
        config: OperationConfig<A, K>,
    ) -> Self {
        let name = name.into();
        let generation = registry.define_generation(name.clone(), config);
        Self {
            registry,
            name,
            generation,
        }
    }

    /// Get the name of the temporary operation.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the registry the operation lives in.
    pub fn registry(&self) -> &'r SharedRegistry<A, K, R> {
        self.registry
    }

    /// Append a rule to the temporary operation.
    pub fn add_rule<H>(&self, matcher: Matcher<A, K>, handler: H) -> Result<(), RegistrationError>
    where
        K: Clone,
        H: Handler<A, Output = R>,
    {
        self.registry
            .push_rule(&self.name, Some(self.generation), Rule::new(matcher, handler))
    }

    /// Invoke the temporary operation.
    pub fn invoke(&self, args: &A) -> Result<R, DispatchError>
    where
        K: PartialEq,
    {
        self.registry
            .snapshot_generation(&self.name, self.generation)?
            .invoke(args)
    }
}

impl<A: ?Sized + 'static, K: 'static, R: 'static> Drop for SharedLocalOperation<'_, A, K, R> {
    fn drop(&mut self) {
        let _removed = self.registry.remove_generation(&self.name, self.generation);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            operation = %self.name,
            generation = self.generation,
            removed = _removed,
            "tore down local shared multimethod"
        );
    }
}
