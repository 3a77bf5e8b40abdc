//! # multimethods-std
//!
//! Standard implementations for the multimethods library.
//!
//! This crate provides:
//! - **Single-threaded registry**: [`Registry`] with the [`LocalOperation`]
//!   scope guard
//! - **Thread-safe registry**: [`SharedRegistry`] (copy-on-write operations)
//!   with the [`SharedLocalOperation`] scope guard
//! - **Standard handlers**: [`TracingHandler`](handlers::TracingHandler)
//! - **Predicate combinators**: [`predicates`]
//! - **Testing utilities**: [`testing`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core types
pub use multimethods_core;

// Modules
pub mod handlers;
pub mod predicates;
pub mod registry;
pub mod scope;
pub mod shared;
pub mod testing;

pub use registry::Registry;
pub use scope::LocalOperation;
pub use shared::{SharedLocalOperation, SharedRegistry};
