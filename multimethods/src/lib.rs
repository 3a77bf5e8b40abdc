//! # multimethods - Runtime Multiple Dispatch
//!
//! `multimethods` selects one handler per call from an ordered list of rules.
//! A rule matches either through a predicate over the call's arguments, or
//! through a literal key compared against the value an operation's dispatch
//! fn computes from those arguments. A default rule catches everything else.
//!
//! When several rules match, the **last-registered** one wins, so a later
//! rule overrides an earlier one without touching it.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use multimethods::prelude::*;
//!
//! let mut registry = Registry::<[i64], (), &'static str>::new();
//! registry.define_operation("classify", OperationConfig::new());
//! registry.add_rule("classify", Matcher::predicate(|a: &[i64]| a[0] > 10), |_: &[i64]| "high")?;
//! registry.add_rule("classify", Matcher::Default, |_: &[i64]| "low")?;
//!
//! assert_eq!(registry.invoke("classify", &[20])?, "high");
//! assert_eq!(registry.invoke("classify", &[5])?, "low");
//! ```
//!
//! ## Temporary Operations
//!
//! [`Registry::define_local_operation`] installs an operation for the
//! duration of a closure and removes it on every exit path, panics included.
//! [`SharedRegistry`] offers the same over `&self` for registries shared
//! between threads.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod macros;

pub use multimethods_core::{
    // Handler
    BoxHandler,
    Bound,
    // Error types
    BoxError,
    DispatchError,
    // Operation
    DispatchFn,
    // Dispatcher
    Dispatcher,
    Handler,
    MatchPriority,
    // Matcher
    Matcher,
    Method,
    MultimethodError,
    Operation,
    OperationConfig,
    Predicate,
    RegistrationError,
    Rule,
};

// Registries
pub use multimethods_std::{LocalOperation, Registry, SharedLocalOperation, SharedRegistry};

/// Standard handler wrappers.
pub mod handlers {
    pub use multimethods_std::handlers::TracingHandler;
}

/// Predicate combinators.
pub mod predicates {
    pub use multimethods_std::predicates::{all_of, any_of, not};
}

/// Testing utilities.
pub mod testing {
    pub use multimethods_std::testing::{CountingHandler, RecordingHandler};
}

/// Prelude module - common imports for multimethods.
///
/// # Usage
///
/// ```rust,ignore
/// use multimethods::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Handlers
        Bound,
        // Errors
        DispatchError,
        Dispatcher,
        Handler,
        MatchPriority,
        // Rules
        Matcher,
        MultimethodError,
        OperationConfig,
        // Registries
        Registry,
        RegistrationError,
        SharedRegistry,
        defmethods,
    };
}
