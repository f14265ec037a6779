//! Token-to-value binding.
//!
//! A single left-to-right scan over a flat token sequence. Option tokens
//! (`--name`, `--name=value`, `--no-name` for booleans, registered short
//! aliases) are resolved against the declared options; every other token
//! fills the next unfilled positional argument, and surplus positional
//! tokens collect into the residual `extra` sequence. Option and
//! positional tokens interleave freely.

use std::collections::BTreeMap;

use tracing::debug;

use taskforce_core::{ArgumentSpec, CoercionError, OptionSpec, Value};

use crate::error::ParseError;

/// Values bound for one invocation.
///
/// Lifetime is a single pipeline run; bound values are never shared
/// across invocations.
#[derive(Debug, Clone, Default)]
pub struct BoundValues {
    /// Argument name to coerced value.
    pub arguments: BTreeMap<String, Value>,
    /// Option name to coerced value. Options with no binding and no
    /// default are absent.
    pub options: BTreeMap<String, Value>,
    /// Positional tokens left over after all declared arguments filled,
    /// in token order.
    pub extra: Vec<String>,
}

/// Outcome of a binding scan.
#[derive(Debug, Clone)]
pub enum Binding {
    /// The scan produced a full value set.
    Values(BoundValues),
    /// A `-h`/`--help` token short-circuited the scan.
    HelpRequested,
}

struct OptionToken<'a> {
    spec: &'a OptionSpec,
    negated: bool,
    inline: Option<String>,
}

fn classify<'a>(
    options: &'a [OptionSpec],
    token: &str,
) -> Result<Option<OptionToken<'a>>, ParseError> {
    let (head, inline) = match token.split_once('=') {
        Some((head, value)) => (head, Some(value.to_string())),
        None => (token, None),
    };

    if let Some(name) = head.strip_prefix("--") {
        if let Some(spec) = options.iter().find(|opt| opt.switch() == head) {
            return Ok(Some(OptionToken {
                spec,
                negated: false,
                inline,
            }));
        }
        if let Some(bare) = name.strip_prefix("no-") {
            let negated = options
                .iter()
                .find(|opt| opt.is_boolean() && opt.switch() == format!("--{bare}"));
            if let Some(spec) = negated {
                return Ok(Some(OptionToken {
                    spec,
                    negated: true,
                    inline,
                }));
            }
        }
        return Err(ParseError::UnknownOption(name.to_string()));
    }

    if head.len() > 1 && head.starts_with('-') {
        if let Some(spec) = options.iter().find(|opt| opt.has_alias(head)) {
            return Ok(Some(OptionToken {
                spec,
                negated: false,
                inline,
            }));
        }
        // An unregistered short token is an ordinary positional token.
    }

    Ok(None)
}

/// Binds a flat token sequence against effective declarations.
///
/// Repeated bindings of one logical option, through any mix of long form
/// and aliases, are last-write-wins in token order.
pub fn bind(
    arguments: &[ArgumentSpec],
    options: &[OptionSpec],
    tokens: &[String],
) -> Result<Binding, ParseError> {
    let mut bound = BoundValues::default();
    let mut next_argument = 0;
    let mut index = 0;

    while index < tokens.len() {
        let token = &tokens[index];
        if token == "-h" || token == "--help" {
            debug!("help requested, stopping the scan");
            return Ok(Binding::HelpRequested);
        }

        match classify(options, token)? {
            Some(OptionToken {
                spec,
                negated: true,
                inline,
            }) => {
                if let Some(value) = inline {
                    return Err(ParseError::Coercion {
                        subject: spec.name.clone(),
                        source: CoercionError {
                            value,
                            expected: "no value after a negated switch".to_string(),
                        },
                    });
                }
                bound.options.insert(spec.name.clone(), Value::Bool(false));
            }
            Some(OptionToken {
                spec,
                negated: false,
                inline,
            }) if spec.is_boolean() => {
                let value = match inline {
                    None => Value::Bool(true),
                    Some(raw) => coerce_option(spec, &raw)?,
                };
                bound.options.insert(spec.name.clone(), value);
            }
            Some(OptionToken { spec, inline, .. }) => {
                let raw = match inline {
                    Some(raw) => raw,
                    None => {
                        index += 1;
                        tokens
                            .get(index)
                            .cloned()
                            .ok_or_else(|| ParseError::MissingValue(spec.name.clone()))?
                    }
                };
                let value = coerce_option(spec, &raw)?;
                bound.options.insert(spec.name.clone(), value);
            }
            None => {
                if let Some(arg) = arguments.get(next_argument) {
                    let value = arg.value_type.coerce(token).map_err(|source| {
                        ParseError::Coercion {
                            subject: arg.name.clone(),
                            source,
                        }
                    })?;
                    bound.arguments.insert(arg.name.clone(), value);
                    next_argument += 1;
                } else {
                    bound.extra.push(token.clone());
                }
            }
        }
        index += 1;
    }

    for arg in &arguments[next_argument..] {
        match &arg.default {
            Some(default) => {
                bound.arguments.insert(arg.name.clone(), default.clone());
            }
            None => return Err(ParseError::MissingArgument(arg.name.clone())),
        }
    }
    fill_option_defaults(options, &mut bound)?;

    debug!(
        arguments = bound.arguments.len(),
        options = bound.options.len(),
        extra = bound.extra.len(),
        "binding complete"
    );
    Ok(Binding::Values(bound))
}

/// Builds a value set from pre-shared option values, with no tokens.
///
/// Used by cross-group invocation: no positional tokens are forwarded, so
/// every argument must carry a default, and option defaults fill in
/// around the seeded values.
pub fn bind_seeded(
    arguments: &[ArgumentSpec],
    options: &[OptionSpec],
    seed: BTreeMap<String, Value>,
) -> Result<BoundValues, ParseError> {
    let mut bound = BoundValues {
        options: seed,
        ..Default::default()
    };
    for arg in arguments {
        match &arg.default {
            Some(default) => {
                bound.arguments.insert(arg.name.clone(), default.clone());
            }
            None => return Err(ParseError::MissingArgument(arg.name.clone())),
        }
    }
    fill_option_defaults(options, &mut bound)?;
    Ok(bound)
}

fn coerce_option(spec: &OptionSpec, raw: &str) -> Result<Value, ParseError> {
    spec.value_type
        .coerce(raw)
        .map_err(|source| ParseError::Coercion {
            subject: spec.name.clone(),
            source,
        })
}

fn fill_option_defaults(
    options: &[OptionSpec],
    bound: &mut BoundValues,
) -> Result<(), ParseError> {
    for opt in options {
        if bound.options.contains_key(&opt.name) {
            continue;
        }
        if opt.required {
            return Err(ParseError::MissingOption(opt.name.clone()));
        }
        if let Some(default) = &opt.default {
            bound.options.insert(opt.name.clone(), default.clone());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use taskforce_core::ValueType;

    use super::*;

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn counter_declarations() -> (Vec<ArgumentSpec>, Vec<OptionSpec>) {
        let arguments = vec![
            ArgumentSpec::required("first", ValueType::Numeric),
            ArgumentSpec::optional("second", ValueType::Numeric, Value::Int(2)),
        ];
        let options = vec![
            OptionSpec::new("third", ValueType::Numeric)
                .with_default(Value::Int(3))
                .with_alias("-t"),
        ];
        (arguments, options)
    }

    fn bound(arguments: &[ArgumentSpec], options: &[OptionSpec], toks: &[&str]) -> BoundValues {
        match bind(arguments, options, &tokens(toks)).unwrap() {
            Binding::Values(values) => values,
            Binding::HelpRequested => panic!("unexpected help request"),
        }
    }

    #[test]
    fn test_binds_positionals_and_option() {
        let (args, opts) = counter_declarations();
        let values = bound(&args, &opts, &["1", "2", "--third", "3"]);
        assert_eq!(values.arguments["first"], Value::Int(1));
        assert_eq!(values.arguments["second"], Value::Int(2));
        assert_eq!(values.options["third"], Value::Int(3));
    }

    #[test]
    fn test_argument_default_fills_unbound_slot() {
        let (args, opts) = counter_declarations();
        let values = bound(&args, &opts, &["1", "--third", "3"]);
        assert_eq!(values.arguments["second"], Value::Int(2));
    }

    #[test]
    fn test_option_defaults_apply_when_absent() {
        let (args, opts) = counter_declarations();
        let values = bound(&args, &opts, &["1"]);
        assert_eq!(values.options["third"], Value::Int(3));
    }

    #[test]
    fn test_missing_required_argument_fails() {
        let (args, opts) = counter_declarations();
        let err = bind(&args, &opts, &tokens(&[])).unwrap_err();
        assert_eq!(err, ParseError::MissingArgument("first".into()));
    }

    #[test]
    fn test_boolean_switch_and_negation() {
        let args = vec![ArgumentSpec::required("name", ValueType::String)];
        let opts = vec![OptionSpec::boolean("loud")];

        let values = bound(&args, &opts, &["jose", "--loud"]);
        assert_eq!(values.options["loud"], Value::Bool(true));

        let values = bound(&args, &opts, &["jose", "--no-loud"]);
        assert_eq!(values.options["loud"], Value::Bool(false));

        let values = bound(&args, &opts, &["jose"]);
        assert!(values.options.get("loud").is_none());
    }

    #[test]
    fn test_boolean_before_positional_interleaves() {
        let args = vec![ArgumentSpec::required("name", ValueType::String)];
        let opts = vec![OptionSpec::boolean("loud")];
        let values = bound(&args, &opts, &["--loud", "jose"]);
        assert_eq!(values.arguments["name"], Value::Str("jose".into()));
        assert_eq!(values.options["loud"], Value::Bool(true));
    }

    #[test]
    fn test_surplus_positionals_become_extra() {
        let args = vec![ArgumentSpec::required("name", ValueType::String)];
        let values = bound(&args, &[], &["jose", "one", "two"]);
        assert_eq!(values.arguments["name"], Value::Str("jose".into()));
        assert_eq!(values.extra, vec!["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn test_unknown_long_option_fails() {
        let err = bind(&[], &[], &tokens(&["--unknown"])).unwrap_err();
        assert_eq!(err, ParseError::UnknownOption("unknown".into()));
    }

    #[test]
    fn test_unregistered_short_token_is_positional() {
        let args = vec![ArgumentSpec::required("name", ValueType::String)];
        let values = bound(&args, &[], &["-x"]);
        assert_eq!(values.arguments["name"], Value::Str("-x".into()));
    }

    #[test]
    fn test_alias_and_inline_value_forms() {
        let (args, opts) = counter_declarations();
        let values = bound(&args, &opts, &["1", "-t", "5"]);
        assert_eq!(values.options["third"], Value::Int(5));

        let values = bound(&args, &opts, &["1", "--third=7"]);
        assert_eq!(values.options["third"], Value::Int(7));

        let values = bound(&args, &opts, &["1", "-t=9"]);
        assert_eq!(values.options["third"], Value::Int(9));
    }

    #[test]
    fn test_last_write_wins_across_forms() {
        let (args, opts) = counter_declarations();
        let values = bound(&args, &opts, &["1", "--third", "5", "-t", "8"]);
        assert_eq!(values.options["third"], Value::Int(8));
    }

    #[test]
    fn test_help_token_short_circuits() {
        let (args, opts) = counter_declarations();
        assert!(matches!(
            bind(&args, &opts, &tokens(&["-h"])).unwrap(),
            Binding::HelpRequested
        ));
        assert!(matches!(
            bind(&args, &opts, &tokens(&["1", "--help"])).unwrap(),
            Binding::HelpRequested
        ));
    }

    #[test]
    fn test_coercion_failure_names_the_subject() {
        let (args, opts) = counter_declarations();
        let err = bind(&args, &opts, &tokens(&["1", "--third", "many"])).unwrap_err();
        assert!(matches!(
            err,
            ParseError::Coercion { ref subject, .. } if subject == "third"
        ));
    }

    #[test]
    fn test_option_missing_trailing_value_fails() {
        let (args, opts) = counter_declarations();
        let err = bind(&args, &opts, &tokens(&["1", "--third"])).unwrap_err();
        assert_eq!(err, ParseError::MissingValue("third".into()));
    }

    #[test]
    fn test_required_option_must_be_bound() {
        let opts = vec![OptionSpec::new("name", ValueType::String).require()];
        let err = bind(&[], &opts, &tokens(&[])).unwrap_err();
        assert_eq!(err, ParseError::MissingOption("name".into()));
    }

    #[test]
    fn test_non_boolean_consumes_following_token_verbatim() {
        let opts = vec![OptionSpec::new("output", ValueType::String)];
        let values = bound(&[], &opts, &["--output", "--weird"]);
        assert_eq!(values.options["output"], Value::Str("--weird".into()));
    }

    #[test]
    fn test_array_argument_consumes_a_single_token() {
        let args = vec![ArgumentSpec::required("names", ValueType::Array)];
        let values = bound(&args, &[], &["a,b"]);
        assert_eq!(
            values.arguments["names"],
            Value::Seq(vec!["a".into(), "b".into()])
        );
    }

    #[test]
    fn test_choice_option_validates_membership() {
        let opts = vec![OptionSpec::new(
            "format",
            ValueType::Choice(vec!["json".into(), "text".into()]),
        )];
        let values = bound(&[], &opts, &["--format", "json"]);
        assert_eq!(values.options["format"], Value::Str("json".into()));

        let err = bind(&[], &opts, &tokens(&["--format", "xml"])).unwrap_err();
        assert!(matches!(
            err,
            ParseError::Coercion { ref subject, .. } if subject == "format"
        ));
    }

    #[test]
    fn test_seeded_bind_fills_defaults_and_checks_arguments() {
        let (args, opts) = counter_declarations();
        let err = bind_seeded(&args, &opts, BTreeMap::new()).unwrap_err();
        assert_eq!(err, ParseError::MissingArgument("first".into()));

        let args = vec![ArgumentSpec::optional(
            "first",
            ValueType::Numeric,
            Value::Int(1),
        )];
        let mut seed = BTreeMap::new();
        seed.insert("third".to_string(), Value::Int(9));
        let values = bind_seeded(&args, &opts, seed).unwrap();
        assert_eq!(values.arguments["first"], Value::Int(1));
        assert_eq!(values.options["third"], Value::Int(9));
    }
}
