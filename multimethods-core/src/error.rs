//! Error types for multimethods.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`MultimethodError`] - Top-level error type for all multimethod operations
//! - [`RegistrationError`] - Errors while adding rules to an operation
//! - [`DispatchError`] - Errors while resolving a call to a handler

use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all multimethod operations.
///
/// Scoped bodies that both register rules and invoke the operation can use
/// this as their error type and rely on `?` for both halves.
#[derive(Error, Debug)]
pub enum MultimethodError {
    /// An error occurred while registering a rule.
    #[error("registration error: {0}")]
    Registration(#[from] RegistrationError),

    /// An error occurred while dispatching a call.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// A custom error raised by caller code.
    #[error(transparent)]
    Custom(BoxError),
}

/// Errors that can occur while adding rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// `add_rule` referenced a name with no prior `define_operation`.
    #[error("multimethod `{name}` is not defined")]
    OperationNotDefined {
        /// The operation name that was referenced.
        name: String,
    },
}

/// Errors that can occur while resolving a call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// `invoke` referenced an unknown operation name.
    #[error("no multimethod named `{name}`")]
    OperationNotFound {
        /// The operation name that was invoked.
        name: String,
    },

    /// The operation has a dispatch fn and also a predicate rule.
    #[error("multimethod `{name}` has a dispatch fn but rule #{rule_index} is a predicate")]
    ConflictingDispatchMode {
        /// The operation name that was invoked.
        name: String,
        /// Position of the offending predicate rule.
        rule_index: usize,
    },

    /// No rule matched and the operation has no fallback handler.
    #[error("no matching handler for multimethod `{name}`")]
    NoMatchingHandler {
        /// The operation name that was invoked.
        name: String,
    },
}

impl DispatchError {
    /// The name of the operation the failed call targeted.
    pub fn operation(&self) -> &str {
        match self {
            DispatchError::OperationNotFound { name }
            | DispatchError::ConflictingDispatchMode { name, .. }
            | DispatchError::NoMatchingHandler { name } => name,
        }
    }
}

impl RegistrationError {
    /// The name of the operation the failed registration targeted.
    pub fn operation(&self) -> &str {
        match self {
            RegistrationError::OperationNotDefined { name } => name,
        }
    }
}

// Convenience conversions
impl From<BoxError> for MultimethodError {
    fn from(err: BoxError) -> Self {
        MultimethodError::Custom(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_operation() {
        let err = DispatchError::ConflictingDispatchMode {
            name: "area".into(),
            rule_index: 2,
        };
        assert_eq!(
            err.to_string(),
            "multimethod `area` has a dispatch fn but rule #2 is a predicate"
        );
        assert_eq!(err.operation(), "area");

        let err = RegistrationError::OperationNotDefined {
            name: "greet".into(),
        };
        assert_eq!(err.to_string(), "multimethod `greet` is not defined");
    }

    #[test]
    fn test_top_level_conversion() {
        let err: MultimethodError = DispatchError::NoMatchingHandler {
            name: "classify".into(),
        }
        .into();
        assert!(matches!(
            err,
            MultimethodError::Dispatch(DispatchError::NoMatchingHandler { .. })
        ));
        assert_eq!(
            err.to_string(),
            "dispatch error: no matching handler for multimethod `classify`"
        );
    }
}
