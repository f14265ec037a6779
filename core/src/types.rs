//! Declaration type definitions for task groups.
//!
//! This module defines the data model a group declares itself with:
//! typed positional arguments ([`ArgumentSpec`]), named options
//! ([`OptionSpec`]), reusable option fragments ([`OptionSet`]), and the
//! value model ([`ValueType`], [`Value`]) that raw command-line tokens are
//! coerced into.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Value type accepted by an argument or option.
///
/// Drives coercion of raw tokens during binding via
/// [`coerce`](ValueType::coerce).
///
/// # Examples
///
/// ```
/// use taskforce_core::{Value, ValueType};
///
/// assert_eq!(ValueType::Numeric.coerce("3").unwrap(), Value::Int(3));
/// assert_eq!(ValueType::Numeric.coerce("0.5").unwrap(), Value::Float(0.5));
/// assert!(ValueType::Numeric.coerce("three").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Free-form string.
    String,
    /// Integer when the token has no decimal point, float otherwise.
    Numeric,
    /// Boolean switch.
    Bool,
    /// One of a fixed set of allowed strings.
    Choice(Vec<String>),
    /// Comma-separated list of strings. Arguments only.
    Array,
}

impl ValueType {
    /// Coerces a raw token into a [`Value`] of this type.
    ///
    /// # Examples
    ///
    /// ```
    /// use taskforce_core::{Value, ValueType};
    ///
    /// let format = ValueType::Choice(vec!["json".into(), "yaml".into()]);
    /// assert_eq!(format.coerce("json").unwrap(), Value::Str("json".into()));
    /// assert!(format.coerce("toml").is_err());
    ///
    /// let list = ValueType::Array.coerce("a,b,c").unwrap();
    /// assert_eq!(list, Value::Seq(vec!["a".into(), "b".into(), "c".into()]));
    /// ```
    pub fn coerce(&self, raw: &str) -> Result<Value, CoercionError> {
        match self {
            ValueType::String => Ok(Value::Str(raw.to_string())),
            ValueType::Numeric => {
                let parsed = if raw.contains('.') {
                    raw.parse::<f64>().ok().map(Value::Float)
                } else {
                    raw.parse::<i64>().ok().map(Value::Int)
                };
                parsed.ok_or_else(|| CoercionError::new(raw, "a numeric value"))
            }
            ValueType::Bool => match raw.to_ascii_lowercase().as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(CoercionError::new(raw, "true or false")),
            },
            ValueType::Choice(allowed) => {
                if allowed.iter().any(|choice| choice == raw) {
                    Ok(Value::Str(raw.to_string()))
                } else {
                    Err(CoercionError::new(
                        raw,
                        format!("one of: {}", allowed.join(", ")),
                    ))
                }
            }
            ValueType::Array => Ok(Value::Seq(
                raw.split(',')
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(String::from)
                    .collect(),
            )),
        }
    }

    /// Returns `true` for the boolean type.
    pub fn is_bool(&self) -> bool {
        matches!(self, ValueType::Bool)
    }
}

/// A raw token could not be converted to its declared type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected}, got \"{value}\"")]
pub struct CoercionError {
    /// The offending raw token.
    pub value: String,
    /// Human-readable description of what was expected.
    pub expected: String,
}

impl CoercionError {
    fn new(value: &str, expected: impl Into<String>) -> Self {
        Self {
            value: value.to_string(),
            expected: expected.into(),
        }
    }
}

/// A bound value produced by coercion or supplied as a default.
///
/// Absence of a value is modeled by absence from the bound map, never by a
/// sentinel variant.
///
/// # Examples
///
/// ```
/// use taskforce_core::Value;
///
/// let v = Value::from("jose");
/// assert_eq!(v.as_str(), Some("jose"));
/// assert_eq!(v.as_bool(), None);
///
/// let json = serde_json::to_string(&Value::Int(3)).unwrap();
/// assert_eq!(json, "3");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Float.
    Float(f64),
    /// String.
    Str(String),
    /// Sequence of strings.
    Seq(Vec<String>),
}

impl Value {
    /// Returns the string content, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean content, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer content, if this is an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns a float view of numeric content.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Returns the sequence content, if this is a sequence.
    pub fn as_seq(&self) -> Option<&[String]> {
        match self {
            Value::Seq(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::Seq(items)
    }
}

/// Declaration of a typed positional argument.
///
/// An argument with no default is required; its ordinal position is its
/// insertion order in the declaring group.
///
/// # Examples
///
/// ```
/// use taskforce_core::{ArgumentSpec, Value, ValueType};
///
/// let first = ArgumentSpec::required("first", ValueType::Numeric);
/// assert!(first.is_required());
/// assert_eq!(first.banner(), "FIRST");
///
/// let second = ArgumentSpec::optional("second", ValueType::Numeric, Value::Int(2));
/// assert!(!second.is_required());
/// assert_eq!(second.banner(), "[SECOND]");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentSpec {
    /// Argument name, unique within a group's merged declarations.
    pub name: String,
    /// Type raw tokens are coerced to.
    pub value_type: ValueType,
    /// Default value; `None` makes the argument required.
    pub default: Option<Value>,
    /// Description for help rendering.
    pub description: Option<String>,
}

impl ArgumentSpec {
    /// Declares a required argument (no default).
    pub fn required(name: &str, value_type: ValueType) -> Self {
        Self {
            name: name.to_string(),
            value_type,
            default: None,
            description: None,
        }
    }

    /// Declares an optional argument with a default value.
    pub fn optional(name: &str, value_type: ValueType, default: Value) -> Self {
        Self {
            name: name.to_string(),
            value_type,
            default: Some(default),
            description: None,
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Required is derived: an argument without a default is required.
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }

    /// Usage banner: `NAME` when required, `[NAME]` otherwise.
    pub fn banner(&self) -> String {
        let upper = self.name.to_uppercase();
        if self.is_required() {
            upper
        } else {
            format!("[{upper}]")
        }
    }
}

/// Declaration of a named option.
///
/// Options bind from `--name`, `--name=value`, registered short aliases,
/// and, for booleans, the negated `--no-name` form.
///
/// # Examples
///
/// ```
/// use taskforce_core::{OptionSpec, Value, ValueType};
///
/// let third = OptionSpec::new("third", ValueType::Numeric)
///     .with_default(Value::Int(3))
///     .with_alias("-t");
/// assert_eq!(third.switch(), "--third");
/// assert_eq!(third.usage(), "[--third=THIRD]");
///
/// let loud = OptionSpec::boolean("loud");
/// assert_eq!(loud.negated_switch(), "--no-loud");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Option name, unique within a group's merged declarations.
    pub name: String,
    /// Type raw tokens are coerced to. [`ValueType::Array`] is not
    /// supported for options.
    pub value_type: ValueType,
    /// Default when the option is absent from the token stream.
    pub default: Option<Value>,
    /// Short alias forms, e.g. `-t`.
    pub aliases: Vec<String>,
    /// Description for help rendering.
    pub description: Option<String>,
    /// Whether the option must be bound from the token stream.
    pub required: bool,
    /// Whether the option is forwarded to invoked groups under the
    /// declared-only sharing policy.
    pub shared: bool,
}

impl OptionSpec {
    /// Declares an option of the given type.
    pub fn new(name: &str, value_type: ValueType) -> Self {
        Self {
            name: name.to_string(),
            value_type,
            default: None,
            aliases: Vec::new(),
            description: None,
            required: false,
            shared: true,
        }
    }

    /// Declares a boolean option.
    pub fn boolean(name: &str) -> Self {
        Self::new(name, ValueType::Bool)
    }

    /// Adds a default value.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Registers a short alias, e.g. `-t`.
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Marks the option as required.
    pub fn require(mut self) -> Self {
        self.required = true;
        self
    }

    /// Excludes the option from declared-only forwarding.
    pub fn unshared(mut self) -> Self {
        self.shared = false;
        self
    }

    /// Returns `true` for boolean options.
    pub fn is_boolean(&self) -> bool {
        self.value_type.is_bool()
    }

    /// Long switch form, underscores dasherized: `--my-option`.
    pub fn switch(&self) -> String {
        format!("--{}", self.name.replace('_', "-"))
    }

    /// Negated long form for booleans: `--no-my-option`.
    pub fn negated_switch(&self) -> String {
        format!("--no-{}", self.name.replace('_', "-"))
    }

    /// Checks whether a token names a registered alias.
    pub fn has_alias(&self, token: &str) -> bool {
        self.aliases.iter().any(|alias| alias == token)
    }

    /// Usage form: `--name` or `--name=NAME`, bracketed unless required.
    pub fn usage(&self) -> String {
        let banner = if self.is_boolean() {
            self.switch()
        } else {
            format!("{}={}", self.switch(), self.name.to_uppercase())
        };
        if self.required {
            banner
        } else {
            format!("[{banner}]")
        }
    }
}

/// Named, reusable fragment of option declarations.
///
/// Fragments are applied to a group by explicit composition at declaration
/// time, giving several groups one definition of common options.
///
/// # Examples
///
/// ```
/// use taskforce_core::{OptionSet, OptionSpec, ValueType};
///
/// let output = OptionSet::new("output")
///     .with_option(OptionSpec::boolean("quiet"))
///     .with_option(OptionSpec::new("format", ValueType::String));
/// assert_eq!(output.options.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct OptionSet {
    /// Fragment name, for diagnostics only.
    pub name: String,
    /// Options declared by this fragment, in order.
    pub options: Vec<OptionSpec>,
}

impl OptionSet {
    /// Creates an empty fragment with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            options: Vec::new(),
        }
    }

    /// Appends an option to the fragment.
    pub fn with_option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }
}
