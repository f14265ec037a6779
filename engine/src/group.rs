//! Task groups and their declaration registries.
//!
//! A [`Group`] is the runnable unit: a label, a merged set of argument and
//! option declarations, an ordered list of tasks, and any declaration-time
//! invocation bindings. Groups compose: a builder created with
//! [`Group::builder_from`] starts from a parent group's effective
//! declarations, and [`GroupBuilder::build`] resolves the merge once, so a
//! built group carries its fully effective views and never walks an
//! ancestor chain at run time.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use taskforce_core::{
    ArgumentSpec, DeclarationError, GroupDescriptor, OptionSet, OptionSpec, Value,
    check_argument_order,
};

use crate::context::RunContext;
use crate::error::{RunError, TaskError};
use crate::pipeline::{Pipeline, TaskContext};

/// Callable handle executed for one task slot.
pub type TaskBody = Arc<dyn Fn(&mut TaskContext<'_>) -> Result<Value, TaskError> + Send + Sync>;

/// An ordered, named unit of executable behavior attached to a group.
#[derive(Clone)]
pub struct Task {
    /// Task name; redeclaring a name replaces the earlier slot in place.
    pub name: String,
    body: TaskBody,
}

impl Task {
    /// Creates a task from a name and body closure.
    pub fn new(
        name: &str,
        body: impl Fn(&mut TaskContext<'_>) -> Result<Value, TaskError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.to_string(),
            body: Arc::new(body),
        }
    }

    pub(crate) fn call(&self, ctx: &mut TaskContext<'_>) -> Result<Value, TaskError> {
        (self.body)(ctx)
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Declaration-time association between an option and invocation targets.
#[derive(Debug, Clone)]
pub enum InvokeTarget {
    /// Invoke the target when the boolean option binds `true`.
    WhenTrue(Arc<Group>),
    /// Invoke the target selected by the option's bound string value.
    ByKey(BTreeMap<String, Arc<Group>>),
}

/// A declared task group: label, effective declarations, ordered tasks,
/// and invocation bindings.
///
/// # Examples
///
/// ```
/// use taskforce_core::{ArgumentSpec, OptionSpec, Value, ValueType};
/// use taskforce_engine::{Group, RunContext};
///
/// let greet = Group::builder("greet")
///     .description("Greets someone by name")
///     .argument(ArgumentSpec::required("name", ValueType::String))
///     .option(OptionSpec::boolean("loud"))
///     .task("hi", |t| {
///         let name = t.arg("name").and_then(|v| v.as_str()).unwrap_or_default();
///         let loud = t.option("loud").and_then(|v| v.as_bool()).unwrap_or(false);
///         let name = if loud { name.to_uppercase() } else { name.to_string() };
///         Ok(Value::from(format!("Hi {name}")))
///     })
///     .build()
///     .unwrap();
///
/// let mut ctx = RunContext::new();
/// let out = greet.start(["--loud", "jose"], &mut ctx).unwrap();
/// assert_eq!(out, vec![Value::from("Hi JOSE")]);
/// ```
#[derive(Debug)]
pub struct Group {
    label: String,
    description: Option<String>,
    arguments: Vec<ArgumentSpec>,
    options: Vec<OptionSpec>,
    tasks: Vec<Task>,
    invocations: BTreeMap<String, InvokeTarget>,
}

impl Group {
    /// Starts a builder for a new root group.
    pub fn builder(label: &str) -> GroupBuilder {
        GroupBuilder {
            label: label.to_string(),
            description: None,
            parent: None,
            arguments: Vec::new(),
            options: Vec::new(),
            tasks: Vec::new(),
            invocations: Vec::new(),
        }
    }

    /// Starts a builder that composes on top of `parent`'s declarations.
    ///
    /// Parent arguments come first positionally, parent options are merged
    /// by name with the child winning, and parent tasks run before
    /// child-added tasks; a redeclared task name keeps the parent's slot.
    pub fn builder_from(label: &str, parent: &Arc<Group>) -> GroupBuilder {
        let mut builder = Group::builder(label);
        builder.parent = Some(Arc::clone(parent));
        builder
    }

    /// The group's identifying label, used in status events and dedup.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The group's description, inherited from the nearest ancestor when
    /// the group declares none of its own.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Fully merged argument list, ancestors first.
    pub fn effective_arguments(&self) -> &[ArgumentSpec] {
        &self.arguments
    }

    /// Fully merged option list, ancestor order first, child wins by name.
    pub fn effective_options(&self) -> &[OptionSpec] {
        &self.options
    }

    /// Fully merged task list in resolution order.
    pub fn effective_tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub(crate) fn invocation(&self, option: &str) -> Option<&InvokeTarget> {
        self.invocations.get(option)
    }

    /// Read-only projection of the declarations for help rendering.
    pub fn descriptor(&self) -> GroupDescriptor {
        GroupDescriptor::new(
            &self.label,
            self.description.clone(),
            &self.arguments,
            &self.options,
        )
    }

    /// Binds `tokens` and runs every task in resolution order, collecting
    /// one return value per task.
    ///
    /// Convenience over [`Pipeline`]; each call is one top-level run
    /// against the given context.
    pub fn start<I, S>(&self, tokens: I, ctx: &mut RunContext) -> Result<Vec<Value>, RunError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        Pipeline::new(self).run(&tokens, ctx)
    }
}

/// Chainable builder assembling a group's declarations.
///
/// Declarations are replayed against the parent's effective views by
/// [`build`](GroupBuilder::build), which surfaces the first declaration
/// error; nothing is validated lazily at run time.
pub struct GroupBuilder {
    label: String,
    description: Option<String>,
    parent: Option<Arc<Group>>,
    arguments: Vec<ArgumentSpec>,
    options: Vec<OptionSpec>,
    tasks: Vec<Task>,
    invocations: Vec<(String, InvokeTarget)>,
}

impl GroupBuilder {
    /// Sets the free-text description.
    pub fn description(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    /// Declares a positional argument, appended after any parent arguments.
    pub fn argument(mut self, spec: ArgumentSpec) -> Self {
        self.arguments.push(spec);
        self
    }

    /// Declares a named option, overriding a parent option of the same name.
    pub fn option(mut self, spec: OptionSpec) -> Self {
        self.options.push(spec);
        self
    }

    /// Applies every option of a reusable fragment, in fragment order.
    pub fn option_set(mut self, set: &OptionSet) -> Self {
        self.options.extend(set.options.iter().cloned());
        self
    }

    /// Declares a task. A name already declared (here or by the parent)
    /// is replaced in place, keeping its slot in the execution order.
    pub fn task(
        mut self,
        name: &str,
        body: impl Fn(&mut TaskContext<'_>) -> Result<Value, TaskError> + Send + Sync + 'static,
    ) -> Self {
        self.tasks.push(Task::new(name, body));
        self
    }

    /// Statically associates a boolean option with a target group: when
    /// the option binds `true`, `invoke_from_option` runs the target.
    pub fn invoke_when(mut self, option: &str, target: Arc<Group>) -> Self {
        self.invocations
            .push((option.to_string(), InvokeTarget::WhenTrue(target)));
        self
    }

    /// Associates a string-typed option with a key-to-group mapping: the
    /// option's bound value selects the target at run time.
    pub fn invoke_map<'a, I>(mut self, option: &str, entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Arc<Group>)>,
    {
        let map = entries
            .into_iter()
            .map(|(key, group)| (key.to_string(), group))
            .collect();
        self.invocations
            .push((option.to_string(), InvokeTarget::ByKey(map)));
        self
    }

    /// Resolves the merge with the parent and validates every declaration.
    pub fn build(self) -> Result<Arc<Group>, DeclarationError> {
        let mut arguments = self
            .parent
            .as_ref()
            .map(|p| p.arguments.clone())
            .unwrap_or_default();
        for arg in self.arguments {
            check_argument_order(&arguments, &arg)?;
            arguments.push(arg);
        }

        let mut options = self
            .parent
            .as_ref()
            .map(|p| p.options.clone())
            .unwrap_or_default();
        for opt in self.options {
            match options.iter_mut().find(|existing| existing.name == opt.name) {
                Some(slot) => *slot = opt,
                None => options.push(opt),
            }
        }

        let mut tasks = self
            .parent
            .as_ref()
            .map(|p| p.tasks.clone())
            .unwrap_or_default();
        for task in self.tasks {
            match tasks.iter_mut().find(|existing| existing.name == task.name) {
                Some(slot) => *slot = task,
                None => tasks.push(task),
            }
        }

        let mut invocations = self
            .parent
            .as_ref()
            .map(|p| p.invocations.clone())
            .unwrap_or_default();
        for (option, target) in self.invocations {
            let Some(spec) = options.iter().find(|o| o.name == option) else {
                return Err(DeclarationError::UnknownInvocationOption(option));
            };
            let kind_matches = match &target {
                InvokeTarget::WhenTrue(_) => spec.is_boolean(),
                InvokeTarget::ByKey(_) => !spec.is_boolean(),
            };
            if !kind_matches {
                return Err(DeclarationError::InvocationTypeMismatch { option });
            }
            invocations.insert(option, target);
        }

        let description = self
            .description
            .or_else(|| self.parent.as_ref().and_then(|p| p.description.clone()));

        Ok(Arc::new(Group {
            label: self.label,
            description,
            arguments,
            options,
            tasks,
            invocations,
        }))
    }
}
