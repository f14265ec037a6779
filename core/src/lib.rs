//! Core declaration model for task groups.
//!
//! This crate defines the foundational types a task group declares itself
//! with:
//!
//! - [`ArgumentSpec`] — a typed positional argument with an optional
//!   default (no default makes it required).
//! - [`OptionSpec`] — a named option with aliases, defaults, and a negated
//!   `--no-<name>` form for booleans.
//! - [`OptionSet`] — a named, reusable fragment of option declarations.
//! - [`Value`] / [`ValueType`] — the coercion model raw tokens flow
//!   through during binding.
//! - [`GroupDescriptor`] — a serializable, read-only projection of a
//!   group's declarations for external help rendering.
//!
//! Declaration-time validation ([`check_argument_order`]) enforces the
//! ordering invariant that no required argument may follow an optional
//! one, across a whole inheritance chain.
//!
//! The runtime (binding, task execution, cross-group invocation) lives in
//! the `taskforce-engine` crate; this crate is pure data and rules.
//!
//! # Example
//!
//! ```
//! use taskforce_core::*;
//!
//! let first = ArgumentSpec::required("first", ValueType::Numeric);
//! let second = ArgumentSpec::optional("second", ValueType::Numeric, Value::Int(2));
//! assert!(check_argument_order(&[first.clone()], &second).is_ok());
//!
//! let third = OptionSpec::new("third", ValueType::Numeric)
//!     .with_default(Value::Int(3))
//!     .with_alias("-t");
//!
//! let descriptor = GroupDescriptor::new("counter", None, &[first, second], &[third]);
//! assert_eq!(descriptor.usage, "counter FIRST [SECOND]");
//! ```

mod descriptor;
mod types;
mod validate;

pub use descriptor::{ArgumentDescriptor, GroupDescriptor, OptionDescriptor};
pub use types::{ArgumentSpec, CoercionError, OptionSet, OptionSpec, Value, ValueType};
pub use validate::{DeclarationError, check_argument_order};
