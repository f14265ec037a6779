//! Declarative task groups: binding, pipelines, and cross-group
//! invocation.
//!
//! A [`Group`] declares typed positional arguments, named options, and an
//! ordered list of tasks. Running a group binds a flat token sequence to
//! coerced values, executes every task in resolution order, and collects
//! one return value per task:
//!
//! ```
//! use taskforce_core::{ArgumentSpec, OptionSpec, Value, ValueType};
//! use taskforce_engine::{Group, RunContext};
//!
//! let counter = Group::builder("counter")
//!     .argument(ArgumentSpec::required("first", ValueType::Numeric))
//!     .argument(ArgumentSpec::optional("second", ValueType::Numeric, Value::Int(2)))
//!     .option(OptionSpec::new("third", ValueType::Numeric).with_default(Value::Int(3)))
//!     .task("one", |t| Ok(t.arg("first").unwrap().clone()))
//!     .task("two", |t| Ok(t.arg("second").unwrap().clone()))
//!     .task("three", |t| Ok(t.option("third").unwrap().clone()))
//!     .build()
//!     .unwrap();
//!
//! let mut ctx = RunContext::new();
//! let results = counter.start(["1", "2", "--third", "3"], &mut ctx).unwrap();
//! assert_eq!(results, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
//! ```
//!
//! Groups compose: [`Group::builder_from`] starts from a parent group's
//! declarations, appending arguments, merging options by name, and
//! running inherited tasks first. A task body can invoke another group
//! through its [`TaskContext`], sharing options by name; each target runs
//! at most once per [`RunContext`].
//!
//! Collaborators (status reporting, help rendering) are traits on the
//! context — see [`StatusReporter`] and [`HelpRenderer`]. The crate is
//! single-threaded and synchronous: a run, including any nested
//! invocations, completes before control returns.

mod binder;
mod context;
mod error;
mod group;
mod invoke;
mod pipeline;

pub use binder::{Binding, BoundValues, bind, bind_seeded};
pub use context::{HelpRenderer, NullHelpRenderer, RunContext, SharePolicy, StatusReporter, TracingReporter};
pub use error::{ParseError, RunError, TaskError};
pub use group::{Group, GroupBuilder, InvokeTarget, Task, TaskBody};
pub use pipeline::{Pipeline, PipelineState, TaskContext};
