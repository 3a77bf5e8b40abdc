//! # multimethods-core
//!
//! Core types for runtime multiple dispatch.
//!
//! This crate has minimal dependencies and holds everything needed to describe
//! and resolve an operation. The registries that own operations live in
//! `multimethods-std`.
//!
//! # Building Blocks
//!
//! - [`Matcher`]: decides whether a rule applies to a call: a predicate, a
//!   literal key compared against the operation's dispatch key, or the
//!   fallback marker.
//! - [`Handler`]: the endpoint run when a rule is selected. Closures implement
//!   it automatically; [`Bound`] carries a receiver context.
//! - [`Rule`]: an immutable `(Matcher, Handler)` pair.
//! - [`Operation`]: a named, append-only rule list with an optional dispatch
//!   fn, and the resolution algorithm ([`Operation::resolve`]).
//! - [`Dispatcher`]: anything that resolves operations by name; [`Method`] is a
//!   callable handle to one of them.
//!
//! # Priority
//!
//! When several rules match a call the **last-registered** one wins by
//! default. See [`MatchPriority`].
//!
//! # Error Types
//!
//! - [`MultimethodError`] - Top-level error type
//! - [`RegistrationError`] - Rule registration errors
//! - [`DispatchError`] - Resolution errors

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod dispatcher;
mod error;
mod handler;
mod matcher;
mod operation;
mod rule;

// Re-exports
pub use dispatcher::{Dispatcher, Method};
pub use error::{BoxError, DispatchError, MultimethodError, RegistrationError};
pub use handler::{BoxHandler, Bound, Handler};
pub use matcher::{Matcher, Predicate};
pub use operation::{DispatchFn, MatchPriority, Operation, OperationConfig};
pub use rule::Rule;
