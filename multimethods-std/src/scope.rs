//! Scoped (temporary) operations.
//!
//! A [`LocalOperation`] guard defines an operation when it is created and
//! removes it when it is dropped. Because removal happens in `Drop`, it runs on
//! every exit path: normal return, early return through `?`, and panic
//! unwinding.

use crate::registry::Registry;
use multimethods_core::{DispatchError, Handler, Matcher, OperationConfig, RegistrationError};
use std::ops::{Deref, DerefMut};

/// Guard for a temporary operation in a [`Registry`].
///
/// The guard dereferences to the registry, so other operations stay reachable
/// while it is alive.
///
/// Removal is by name. If the body redefines the same name, the redefinition
/// is removed as well, and a permanent operation that was shadowed by the
/// temporary one is not restored.
pub struct LocalOperation<'r, A: ?Sized + 'static, K: 'static, R: 'static> {
    registry: &'r mut Registry<A, K, R>,
    name: String,
}

impl<'r, A: ?Sized + 'static, K: 'static, R: 'static> LocalOperation<'r, A, K, R> {
    /// Define `name` in `registry` and return the guard that removes it.
    pub fn new(
        registry: &'r mut Registry<A, K, R>,
        name: impl Into<String>,
        config: OperationConfig<A, K>,
    ) -> Self {
        let name = name.into();
        registry.define_operation(name.clone(), config);
        Self { registry, name }
    }

    /// Get the name of the temporary operation.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a rule to the temporary operation.
    pub fn add_rule<H>(
        &mut self,
        matcher: Matcher<A, K>,
        handler: H,
    ) -> Result<(), RegistrationError>
    where
        H: Handler<A, Output = R>,
    {
        self.registry.add_rule(&self.name, matcher, handler)
    }

    /// Invoke the temporary operation.
    pub fn invoke(&self, args: &A) -> Result<R, DispatchError>
    where
        K: PartialEq,
    {
        self.registry.invoke(&self.name, args)
    }
}

impl<A: ?Sized + 'static, K: 'static, R: 'static> Deref for LocalOperation<'_, A, K, R> {
    type Target = Registry<A, K, R>;

    fn deref(&self) -> &Self::Target {
        self.registry
    }
}

impl<A: ?Sized + 'static, K: 'static, R: 'static> DerefMut for LocalOperation<'_, A, K, R> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.registry
    }
}

impl<A: ?Sized + 'static, K: 'static, R: 'static> Drop for LocalOperation<'_, A, K, R> {
    fn drop(&mut self) {
        let _removed = self.registry.remove_operation(&self.name);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            operation = %self.name,
            removed = _removed.is_some(),
            panicking = std::thread::panicking(),
            "tore down local multimethod"
        );
    }
}
