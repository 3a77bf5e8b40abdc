/// Adds several rules to one operation.
///
/// Each rule is written as `key <expr> => <handler>`,
/// `when <predicate> => <handler>` or `default => <handler>`, and rules are
/// appended in the order they are written, so later rules take precedence.
///
/// The registry expression must have an `add_rule(name, matcher, handler)`
/// method, which both [`Registry`](crate::Registry) and
/// [`SharedRegistry`](crate::SharedRegistry) provide. Inside a
/// [`define_local_operation`](crate::Registry::define_local_operation) body,
/// pass `*scope`.
///
/// The macro evaluates to `Result<(), RegistrationError>` and stops at the
/// first rule that fails to register.
///
/// # Example
/// ```rust,ignore
/// registry.define_operation("greet", OperationConfig::keyed(|a: &[&'static str]| a[0]));
/// defmethods!(registry, "greet";
///     key "en" => |a: &[&'static str]| format!("hello {}", a[1]),
///     key "fr" => |a: &[&'static str]| format!("bonjour {}", a[1]),
///     default => |a: &[&'static str]| format!("hi {}", a[1]),
/// )?;
/// ```
#[macro_export]
macro_rules! defmethods {
    ($registry:expr, $name:expr; $($rules:tt)+) => {
        (|| -> ::core::result::Result<(), $crate::RegistrationError> {
            $crate::__defmethods_rules!(($registry, $name) $($rules)+);
            ::core::result::Result::Ok(())
        })()
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __defmethods_rules {
    (($registry:expr, $name:expr)) => {};
    (($registry:expr, $name:expr) key $key:expr => $handler:expr $(, $($rest:tt)*)?) => {
        $registry.add_rule($name, $crate::Matcher::key($key), $handler)?;
        $crate::__defmethods_rules!(($registry, $name) $($($rest)*)?);
    };
    (($registry:expr, $name:expr) when $predicate:expr => $handler:expr $(, $($rest:tt)*)?) => {
        $registry.add_rule($name, $crate::Matcher::predicate($predicate), $handler)?;
        $crate::__defmethods_rules!(($registry, $name) $($($rest)*)?);
    };
    (($registry:expr, $name:expr) default => $handler:expr $(, $($rest:tt)*)?) => {
        $registry.add_rule($name, $crate::Matcher::Default, $handler)?;
        $crate::__defmethods_rules!(($registry, $name) $($($rest)*)?);
    };
}
