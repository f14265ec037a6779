//! Declaration-time validation.
//!
//! Catches declaration mistakes when a group is defined, before any token
//! is ever bound: a required argument declared after an optional one,
//! duplicate names in a merged declaration chain, and invocation bindings
//! that reference options the group never declares.

use thiserror::Error;

use crate::ArgumentSpec;

/// Errors detected while a group's declarations are assembled.
///
/// These surface at group construction and never at run time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationError {
    /// A required argument was declared after an argument with a default.
    #[error(
        "cannot declare \"{required}\" as a required argument after the optional argument \"{optional}\""
    )]
    Ordering {
        /// The offending required argument.
        required: String,
        /// The earlier optional argument it would follow.
        optional: String,
    },
    /// Two arguments in the merged declaration chain share a name.
    #[error("duplicate argument declaration: {0}")]
    DuplicateArgument(String),
    /// An invocation binding references an option the group never declares.
    #[error("invocation is bound to undeclared option: {0}")]
    UnknownInvocationOption(String),
    /// A boolean invocation binding targets a non-boolean option, or a
    /// keyed binding targets a boolean one.
    #[error("invocation binding for \"{option}\" does not match the option's declared type")]
    InvocationTypeMismatch {
        /// The option the binding was declared for.
        option: String,
    },
}

/// Checks that `next` may be appended to the effective argument list
/// `existing`.
///
/// The effective list spans the whole ancestor chain: once any argument
/// with a default appears, every later argument must also carry one, no
/// matter how many optional arguments intervene.
///
/// # Examples
///
/// ```
/// use taskforce_core::{check_argument_order, ArgumentSpec, DeclarationError, Value, ValueType};
///
/// let declared = vec![
///     ArgumentSpec::required("first", ValueType::Numeric),
///     ArgumentSpec::optional("second", ValueType::Numeric, Value::Int(2)),
/// ];
///
/// let foo = ArgumentSpec::required("foo", ValueType::String);
/// assert_eq!(
///     check_argument_order(&declared, &foo),
///     Err(DeclarationError::Ordering {
///         required: "foo".into(),
///         optional: "second".into(),
///     })
/// );
/// ```
pub fn check_argument_order(
    existing: &[ArgumentSpec],
    next: &ArgumentSpec,
) -> Result<(), DeclarationError> {
    if existing.iter().any(|arg| arg.name == next.name) {
        return Err(DeclarationError::DuplicateArgument(next.name.clone()));
    }
    if next.is_required() {
        if let Some(optional) = existing.iter().find(|arg| !arg.is_required()) {
            return Err(DeclarationError::Ordering {
                required: next.name.clone(),
                optional: optional.name.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{Value, ValueType};

    use super::*;

    #[test]
    fn test_required_after_required_is_fine() {
        let declared = vec![ArgumentSpec::required("first", ValueType::String)];
        let next = ArgumentSpec::required("second", ValueType::String);
        assert!(check_argument_order(&declared, &next).is_ok());
    }

    #[test]
    fn test_required_after_optional_is_rejected() {
        let declared = vec![ArgumentSpec::optional(
            "second",
            ValueType::Numeric,
            Value::Int(2),
        )];
        let next = ArgumentSpec::required("foo", ValueType::String);
        assert_eq!(
            check_argument_order(&declared, &next),
            Err(DeclarationError::Ordering {
                required: "foo".into(),
                optional: "second".into(),
            })
        );
    }

    #[test]
    fn test_ordering_violation_found_across_intervening_optionals() {
        let declared = vec![
            ArgumentSpec::required("a", ValueType::String),
            ArgumentSpec::optional("b", ValueType::String, Value::from("b")),
            ArgumentSpec::optional("c", ValueType::String, Value::from("c")),
        ];
        let next = ArgumentSpec::required("d", ValueType::String);
        assert!(matches!(
            check_argument_order(&declared, &next),
            Err(DeclarationError::Ordering { .. })
        ));
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let declared = vec![ArgumentSpec::required("first", ValueType::String)];
        let next = ArgumentSpec::required("first", ValueType::String);
        assert_eq!(
            check_argument_order(&declared, &next),
            Err(DeclarationError::DuplicateArgument("first".into()))
        );
    }

    #[test]
    fn test_optional_after_optional_is_fine() {
        let declared = vec![ArgumentSpec::optional(
            "a",
            ValueType::String,
            Value::from("a"),
        )];
        let next = ArgumentSpec::optional("b", ValueType::String, Value::from("b"));
        assert!(check_argument_order(&declared, &next).is_ok());
    }
}
