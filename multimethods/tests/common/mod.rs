#![allow(dead_code)]

use multimethods::{OperationConfig, Registry};

// ============================================================================
// Registry Types
// ============================================================================

/// Word arguments dispatched on a string key.
pub type Words = Registry<[&'static str], &'static str, String>;

/// Integer arguments dispatched on predicates only.
pub type Numbers = Registry<[i64], (), &'static str>;

/// Shapes dispatched on their kind.
pub type Shapes = Registry<Shape, &'static str, f64>;

// ============================================================================
// Test Argument Types
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Circle { radius: f64 },
    Rect { width: f64, height: f64 },
}

impl Shape {
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Circle { .. } => "circle",
            Shape::Rect { .. } => "rect",
        }
    }
}

/// A receiver captured by bound handlers.
#[derive(Clone, Debug)]
pub struct Greeter {
    pub greeting: String,
}

impl Greeter {
    pub fn new(greeting: &str) -> Self {
        Self {
            greeting: greeting.to_string(),
        }
    }

    pub fn greet(&self, name: &str) -> String {
        format!("{} {}", self.greeting, name)
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// A registry with `greet` defined to dispatch on the first word.
pub fn greet_registry() -> Words {
    let mut registry = Words::new();
    registry.define_operation("greet", OperationConfig::keyed(|args: &[&'static str]| args[0]));
    registry
}

/// A registry with `classify` defined for predicate dispatch.
pub fn classify_registry() -> Numbers {
    let mut registry = Numbers::new();
    registry.define_operation("classify", OperationConfig::new());
    registry
}
