//! Read-only descriptor surface for external help rendering.
//!
//! Descriptors are a serializable projection of a group's effective
//! declarations. Help renderers consume them; padding, color, and layout
//! stay on the renderer side.

use serde::{Deserialize, Serialize};

use crate::{ArgumentSpec, OptionSpec, Value, ValueType};

/// Projection of one positional argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentDescriptor {
    pub name: String,
    /// Usage banner: `NAME` when required, `[NAME]` otherwise.
    pub banner: String,
    pub value_type: ValueType,
    pub required: bool,
    pub default: Option<Value>,
    pub description: Option<String>,
}

impl From<&ArgumentSpec> for ArgumentDescriptor {
    fn from(spec: &ArgumentSpec) -> Self {
        Self {
            name: spec.name.clone(),
            banner: spec.banner(),
            value_type: spec.value_type.clone(),
            required: spec.is_required(),
            default: spec.default.clone(),
            description: spec.description.clone(),
        }
    }
}

/// Projection of one named option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionDescriptor {
    pub name: String,
    /// Long switch form, e.g. `--third`.
    pub switch: String,
    /// Negated form for booleans, e.g. `--no-loud`.
    pub negated: Option<String>,
    pub aliases: Vec<String>,
    /// Usage form, e.g. `[--third=THIRD]`.
    pub usage: String,
    pub value_type: ValueType,
    pub default: Option<Value>,
    pub required: bool,
    pub description: Option<String>,
}

impl From<&OptionSpec> for OptionDescriptor {
    fn from(spec: &OptionSpec) -> Self {
        Self {
            name: spec.name.clone(),
            switch: spec.switch(),
            negated: spec.is_boolean().then(|| spec.negated_switch()),
            aliases: spec.aliases.clone(),
            usage: spec.usage(),
            value_type: spec.value_type.clone(),
            default: spec.default.clone(),
            required: spec.required,
            description: spec.description.clone(),
        }
    }
}

/// Projection of a whole group: label, description, usage line, and the
/// effective argument and option declarations.
///
/// # Examples
///
/// ```
/// use taskforce_core::{ArgumentSpec, GroupDescriptor, OptionSpec, Value, ValueType};
///
/// let args = vec![
///     ArgumentSpec::required("first", ValueType::Numeric),
///     ArgumentSpec::optional("second", ValueType::Numeric, Value::Int(2)),
/// ];
/// let opts = vec![OptionSpec::new("third", ValueType::Numeric).with_default(Value::Int(3))];
///
/// let descriptor = GroupDescriptor::new("counter", None, &args, &opts);
/// assert_eq!(descriptor.usage, "counter FIRST [SECOND]");
/// assert_eq!(descriptor.options[0].usage, "[--third=THIRD]");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDescriptor {
    /// The group's identifying label.
    pub label: String,
    pub description: Option<String>,
    /// Label followed by argument banners, e.g. `counter FIRST [SECOND]`.
    pub usage: String,
    pub arguments: Vec<ArgumentDescriptor>,
    pub options: Vec<OptionDescriptor>,
}

impl GroupDescriptor {
    /// Builds the descriptor from effective declarations.
    pub fn new(
        label: &str,
        description: Option<String>,
        arguments: &[ArgumentSpec],
        options: &[OptionSpec],
    ) -> Self {
        let mut usage = label.to_string();
        for arg in arguments {
            usage.push(' ');
            usage.push_str(&arg.banner());
        }
        Self {
            label: label.to_string(),
            description,
            usage,
            arguments: arguments.iter().map(ArgumentDescriptor::from).collect(),
            options: options.iter().map(OptionDescriptor::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GroupDescriptor {
        let args = vec![
            ArgumentSpec::required("name", ValueType::String).with_description("who to greet"),
        ];
        let opts = vec![
            OptionSpec::boolean("loud").with_description("shout the greeting"),
            OptionSpec::new("times", ValueType::Numeric)
                .with_default(Value::Int(1))
                .with_alias("-n"),
        ];
        GroupDescriptor::new("greet", Some("Greets someone".into()), &args, &opts)
    }

    #[test]
    fn test_usage_concatenates_banners() {
        assert_eq!(sample().usage, "greet NAME");
    }

    #[test]
    fn test_boolean_option_exposes_negated_switch() {
        let descriptor = sample();
        assert_eq!(descriptor.options[0].negated.as_deref(), Some("--no-loud"));
        assert_eq!(descriptor.options[1].negated, None);
    }

    #[test]
    fn test_descriptor_round_trips_through_json() {
        let descriptor = sample();
        let json = serde_json::to_string(&descriptor).unwrap();
        let back: GroupDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, descriptor);
    }
}
