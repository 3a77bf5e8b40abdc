//! Matchers decide whether a rule applies to a call.

use std::{fmt, sync::Arc};

/// A shareable runtime condition over the call arguments.
pub type Predicate<A> = Arc<dyn Fn(&A) -> bool + Send + Sync>;

/// The match condition of a [`Rule`](crate::Rule).
///
/// An operation either dispatches on predicates or on literal keys computed
/// by its dispatch fn. Mixing the two is reported when the operation is
/// invoked (see [`DispatchError::ConflictingDispatchMode`]).
///
/// [`DispatchError::ConflictingDispatchMode`]: crate::DispatchError::ConflictingDispatchMode
pub enum Matcher<A: ?Sized + 'static, K: 'static> {
    /// Matches when the predicate returns `true` for the call arguments.
    Predicate(Predicate<A>),
    /// Matches when the operation's dispatch key equals this value.
    Key(K),
    /// Marks the rule's handler as the operation's fallback. Never matches
    /// directly.
    Default,
}

impl<A: ?Sized + 'static, K: 'static> Matcher<A, K> {
    /// Create a predicate matcher.
    pub fn predicate<P>(predicate: P) -> Self
    where
        P: Fn(&A) -> bool + Send + Sync + 'static,
    {
        Matcher::Predicate(Arc::new(predicate))
    }

    /// Create a literal key matcher.
    pub fn key(key: impl Into<K>) -> Self {
        Matcher::Key(key.into())
    }

    /// Short name of the variant, used in log output.
    pub fn kind(&self) -> &'static str {
        match self {
            Matcher::Predicate(_) => "predicate",
            Matcher::Key(_) => "key",
            Matcher::Default => "default",
        }
    }

    /// Whether this is a [`Matcher::Predicate`].
    pub fn is_predicate(&self) -> bool {
        matches!(self, Matcher::Predicate(_))
    }

    /// Whether this is a [`Matcher::Default`].
    pub fn is_default(&self) -> bool {
        matches!(self, Matcher::Default)
    }
}

impl<A: ?Sized + 'static, K: Clone + 'static> Clone for Matcher<A, K> {
    fn clone(&self) -> Self {
        match self {
            Matcher::Predicate(predicate) => Matcher::Predicate(Arc::clone(predicate)),
            Matcher::Key(key) => Matcher::Key(key.clone()),
            Matcher::Default => Matcher::Default,
        }
    }
}

impl<A: ?Sized + 'static, K: fmt::Debug + 'static> fmt::Debug for Matcher<A, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Predicate(_) => f.write_str("Predicate(..)"),
            Matcher::Key(key) => f.debug_tuple("Key").field(key).finish(),
            Matcher::Default => f.write_str("Default"),
        }
    }
}
