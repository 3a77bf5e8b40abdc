//! Predicate combinators.
//!
//! Build compound match conditions from smaller ones and pass the result to
//! [`Matcher::predicate`](multimethods_core::Matcher::predicate).

use multimethods_core::Predicate;

/// Matches when `predicate` does not.
pub fn not<A, P>(predicate: P) -> impl Fn(&A) -> bool + Send + Sync + 'static
where
    A: ?Sized + 'static,
    P: Fn(&A) -> bool + Send + Sync + 'static,
{
    move |args| !predicate(args)
}

/// Matches when every predicate matches. An empty set always matches.
pub fn all_of<A, I>(predicates: I) -> impl Fn(&A) -> bool + Send + Sync + 'static
where
    A: ?Sized + 'static,
    I: IntoIterator<Item = Predicate<A>>,
{
    let predicates: Vec<Predicate<A>> = predicates.into_iter().collect();
    move |args| predicates.iter().all(|predicate| predicate(args))
}

/// Matches when at least one predicate matches. An empty set never matches.
pub fn any_of<A, I>(predicates: I) -> impl Fn(&A) -> bool + Send + Sync + 'static
where
    A: ?Sized + 'static,
    I: IntoIterator<Item = Predicate<A>>,
{
    let predicates: Vec<Predicate<A>> = predicates.into_iter().collect();
    move |args| predicates.iter().any(|predicate| predicate(args))
}
