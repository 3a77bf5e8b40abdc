//! Resolution behavior through the public registry API.

use multimethods::{
    Bound, DispatchError, Dispatcher, MatchPriority, Matcher, OperationConfig, RegistrationError,
    handlers::TracingHandler,
    predicates::{any_of, not},
    testing::{CountingHandler, RecordingHandler},
};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

mod common;
use common::{Greeter, Numbers, Shape, Shapes, Words, classify_registry, greet_registry};

#[test]
fn test_keyed_override_last_match_wins() {
    let mut registry = greet_registry();
    registry
        .add_rule("greet", Matcher::key("en"), |a: &[&'static str]| format!("hello {}", a[1]))
        .unwrap();
    registry
        .add_rule("greet", Matcher::key("fr"), |a: &[&'static str]| format!("bonjour {}", a[1]))
        .unwrap();

    assert_eq!(registry.invoke("greet", &["fr", "Ana"]).unwrap(), "bonjour Ana");

    registry
        .add_rule("greet", Matcher::key("fr"), |a: &[&'static str]| format!("salut {}", a[1]))
        .unwrap();

    assert_eq!(registry.invoke("greet", &["fr", "Ana"]).unwrap(), "salut Ana");
    assert_eq!(registry.invoke("greet", &["en", "Ana"]).unwrap(), "hello Ana");
}

#[test]
fn test_predicate_with_default() {
    let mut registry = classify_registry();
    registry
        .add_rule("classify", Matcher::predicate(|a: &[i64]| a[0] > 10), |_: &[i64]| "high")
        .unwrap();
    registry
        .add_rule("classify", Matcher::Default, |_: &[i64]| "low")
        .unwrap();

    assert_eq!(registry.invoke("classify", &[5]), Ok("low"));
    assert_eq!(registry.invoke("classify", &[20]), Ok("high"));
}

#[test]
fn test_last_true_predicate_wins() {
    let mut registry = classify_registry();
    registry
        .add_rule("classify", Matcher::predicate(|a: &[i64]| a[0] > 0), |_: &[i64]| "positive")
        .unwrap();
    registry
        .add_rule("classify", Matcher::predicate(|a: &[i64]| a[0] > 100), |_: &[i64]| "huge")
        .unwrap();
    registry
        .add_rule("classify", Matcher::predicate(|a: &[i64]| a[0] < 0), |_: &[i64]| "negative")
        .unwrap();

    assert_eq!(registry.invoke("classify", &[500]), Ok("huge"));
    assert_eq!(registry.invoke("classify", &[5]), Ok("positive"));
    assert_eq!(registry.invoke("classify", &[-5]), Ok("negative"));
    assert_eq!(
        registry.invoke("classify", &[0]),
        Err(DispatchError::NoMatchingHandler {
            name: "classify".into()
        })
    );
}

#[test]
fn test_default_registered_first_still_yields_to_match() {
    let mut registry = classify_registry();
    registry
        .add_rule("classify", Matcher::Default, |_: &[i64]| "other")
        .unwrap();
    registry
        .add_rule("classify", Matcher::predicate(|a: &[i64]| a[0] == 1), |_: &[i64]| "one")
        .unwrap();

    assert_eq!(registry.invoke("classify", &[1]), Ok("one"));
    assert_eq!(registry.invoke("classify", &[2]), Ok("other"));
}

#[test]
fn test_first_match_priority() {
    let mut registry = Numbers::new();
    registry.define_operation(
        "classify",
        OperationConfig::new().with_priority(MatchPriority::FirstMatch),
    );
    registry
        .add_rule("classify", Matcher::predicate(|a: &[i64]| a[0] > 0), |_: &[i64]| "positive")
        .unwrap();
    registry
        .add_rule("classify", Matcher::predicate(|a: &[i64]| a[0] > 100), |_: &[i64]| "huge")
        .unwrap();

    assert_eq!(registry.invoke("classify", &[500]), Ok("positive"));
}

#[test]
fn test_keyed_with_default_fallback() {
    let mut registry = Shapes::new();
    registry.define_operation("area", OperationConfig::keyed(Shape::kind));
    registry
        .add_rule("area", Matcher::key("circle"), |s: &Shape| match s {
            Shape::Circle { radius } => std::f64::consts::PI * radius * radius,
            Shape::Rect { .. } => unreachable!(),
        })
        .unwrap();
    registry
        .add_rule("area", Matcher::Default, |_: &Shape| 0.0)
        .unwrap();

    let circle = registry.invoke("area", &Shape::Circle { radius: 1.0 }).unwrap();
    assert!((circle - std::f64::consts::PI).abs() < 1e-12);

    let rect = Shape::Rect {
        width: 2.0,
        height: 3.0,
    };
    assert_eq!(registry.invoke("area", &rect), Ok(0.0));
}

#[test]
fn test_dispatch_fn_runs_once_per_call() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counted = calls.clone();

    let mut registry = Words::new();
    registry.define_operation(
        "greet",
        OperationConfig::keyed(move |args: &[&'static str]| {
            counted.fetch_add(1, Ordering::SeqCst);
            args[0]
        }),
    );
    for key in ["en", "fr", "de", "fr"] {
        registry
            .add_rule("greet", Matcher::key(key), move |_: &[&'static str]| key.to_string())
            .unwrap();
    }

    assert_eq!(registry.invoke("greet", &["fr"]).unwrap(), "fr");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_conflict_fails_on_every_invoke_not_registration() {
    let mut registry = greet_registry();
    registry
        .add_rule("greet", Matcher::key("en"), |_: &[&'static str]| "hello".to_string())
        .unwrap();

    let registered = registry.add_rule(
        "greet",
        Matcher::predicate(|a: &[&'static str]| a.len() > 1),
        |_: &[&'static str]| "many".to_string(),
    );
    assert_eq!(registered, Ok(()));

    let conflict = DispatchError::ConflictingDispatchMode {
        name: "greet".into(),
        rule_index: 1,
    };
    for args in [&["en"][..], &["en", "x"][..], &["zz"][..]] {
        assert_eq!(registry.invoke("greet", args), Err(conflict.clone()));
    }
}

#[test]
fn test_add_rule_to_undefined_leaves_registry_unmodified() {
    let mut registry = classify_registry();
    registry
        .add_rule("classify", Matcher::Default, |_: &[i64]| "low")
        .unwrap();

    let result = registry.add_rule("unknown", Matcher::Default, |_: &[i64]| "x");

    assert_eq!(
        result,
        Err(RegistrationError::OperationNotDefined {
            name: "unknown".into()
        })
    );
    assert_eq!(registry.len(), 1);
    assert!(!registry.contains("unknown"));
    assert_eq!(registry.rule_count("classify"), Some(1));
    assert_eq!(registry.invoke("classify", &[1]), Ok("low"));
}

#[test]
fn test_no_matching_handler_on_empty_operation() {
    let registry = classify_registry();
    let err = registry.invoke("classify", &[1]).unwrap_err();

    assert_eq!(
        err,
        DispatchError::NoMatchingHandler {
            name: "classify".into()
        }
    );
    assert_eq!(err.to_string(), "no matching handler for multimethod `classify`");
}

#[test]
fn test_bound_handler_receives_context() {
    let mut registry = greet_registry();
    registry
        .add_rule(
            "greet",
            Matcher::key("en"),
            Bound::new(Greeter::new("hello"), |g: &Greeter, a: &[&'static str]| {
                g.greet(a[1])
            }),
        )
        .unwrap();
    registry
        .add_rule(
            "greet",
            Matcher::key("es"),
            Bound::new(Greeter::new("hola"), |g: &Greeter, a: &[&'static str]| {
                g.greet(a[1])
            }),
        )
        .unwrap();

    assert_eq!(registry.invoke("greet", &["en", "Bo"]).unwrap(), "hello Bo");
    assert_eq!(registry.invoke("greet", &["es", "Bo"]).unwrap(), "hola Bo");
}

#[test]
fn test_method_handle() {
    let mut registry = classify_registry();
    registry
        .add_rule("classify", Matcher::Default, |_: &[i64]| "any")
        .unwrap();

    let classify = registry.method("classify");
    assert_eq!(classify.name(), "classify");
    assert_eq!(classify.invoke(&[3]), Ok("any"));

    let missing = registry.method("missing");
    assert_eq!(
        missing.invoke(&[3]),
        Err(DispatchError::OperationNotFound {
            name: "missing".into()
        })
    );
}

#[test]
fn test_recording_handler_sees_selected_calls() {
    let high = RecordingHandler::<[i64], &'static str>::new("high");
    let low = CountingHandler::new("low");

    let mut registry = classify_registry();
    registry
        .add_rule("classify", Matcher::predicate(|a: &[i64]| a[0] > 10), high.clone())
        .unwrap();
    registry
        .add_rule("classify", Matcher::Default, low.clone())
        .unwrap();

    for n in [1, 20, 3, 40] {
        registry.invoke("classify", &[n]).unwrap();
    }

    assert_eq!(high.calls(), vec![vec![20], vec![40]]);
    assert_eq!(low.count(), 2);
}

#[test]
fn test_combined_predicates() {
    let mut registry = classify_registry();
    registry
        .add_rule(
            "classify",
            Matcher::predicate(any_of([
                Arc::new(|a: &[i64]| a[0] == 7) as multimethods::Predicate<[i64]>,
                Arc::new(|a: &[i64]| a[0] == 13),
            ])),
            |_: &[i64]| "unlucky",
        )
        .unwrap();
    registry
        .add_rule(
            "classify",
            Matcher::predicate(not(|a: &[i64]| a[0] % 2 != 0)),
            |_: &[i64]| "even",
        )
        .unwrap();

    assert_eq!(registry.invoke("classify", &[13]), Ok("unlucky"));
    assert_eq!(registry.invoke("classify", &[4]), Ok("even"));
    assert!(registry.invoke("classify", &[5]).is_err());
}

#[test]
fn test_resolved_handler_matches_invoke() {
    let mut registry = classify_registry();
    registry
        .add_rule("classify", Matcher::Default, |_: &[i64]| "fallback")
        .unwrap();

    let handler = registry.resolve("classify", &[9]).unwrap();
    assert_eq!(handler.call(&[9]), "fallback");
}

#[test]
fn test_traced_handler_is_transparent() {
    let counter = CountingHandler::new("traced");
    let mut registry = classify_registry();
    registry
        .add_rule("classify", Matcher::Default, TracingHandler::new(counter.clone(), "fallback"))
        .unwrap();

    assert_eq!(registry.invoke("classify", &[1, 2]), Ok("traced"));
    assert_eq!(counter.count(), 1);
}
