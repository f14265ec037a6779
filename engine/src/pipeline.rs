//! The invocation pipeline.
//!
//! One pipeline drives one run of one group:
//! `Unstarted → Binding → Running → Completed`, with `Failed` reached
//! from `Binding` or `Running` on an unrecovered error. Both end states
//! are terminal. Tasks execute strictly in resolution order, each
//! reading bound values from its [`TaskContext`] and contributing one
//! value to the ordered result sequence.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use taskforce_core::Value;

use crate::binder::{Binding, BoundValues, bind, bind_seeded};
use crate::context::RunContext;
use crate::error::{RunError, TaskError};
use crate::group::Group;
use crate::invoke;

/// Progress states of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Unstarted,
    Binding,
    Running,
    Completed,
    Failed,
}

/// Drives one group through binding and task execution.
///
/// # Examples
///
/// ```
/// use taskforce_engine::{Group, Pipeline, PipelineState, RunContext};
///
/// let group = Group::builder("empty").build().unwrap();
/// let mut pipeline = Pipeline::new(&group);
/// assert_eq!(pipeline.state(), PipelineState::Unstarted);
///
/// let mut ctx = RunContext::new();
/// let results = pipeline.run(&[], &mut ctx).unwrap();
/// assert!(results.is_empty());
/// assert_eq!(pipeline.state(), PipelineState::Completed);
/// ```
pub struct Pipeline<'g> {
    group: &'g Group,
    state: PipelineState,
}

impl<'g> Pipeline<'g> {
    /// Creates an unstarted pipeline for `group`.
    pub fn new(group: &'g Group) -> Self {
        Self {
            group,
            state: PipelineState::Unstarted,
        }
    }

    /// Current state of this pipeline.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Binds `tokens` and executes every task, returning one value per
    /// task in execution order.
    ///
    /// A bound help request is delegated to the context's help renderer
    /// and completes the pipeline with no task results. Binding errors
    /// and task errors fail the pipeline; the task's original error is
    /// surfaced unchanged.
    pub fn run(&mut self, tokens: &[String], ctx: &mut RunContext) -> Result<Vec<Value>, RunError> {
        self.state = PipelineState::Binding;
        debug!(group = %self.group.label(), tokens = tokens.len(), "binding");
        let values = match bind(
            self.group.effective_arguments(),
            self.group.effective_options(),
            tokens,
        ) {
            Ok(Binding::HelpRequested) => {
                ctx.help().render(&self.group.descriptor());
                self.state = PipelineState::Completed;
                return Ok(Vec::new());
            }
            Ok(Binding::Values(values)) => values,
            Err(err) => {
                self.state = PipelineState::Failed;
                return Err(err.into());
            }
        };
        self.execute(values, ctx)
    }

    /// Runs with a pre-shared option set instead of tokens. Used by the
    /// invocation bridge; no positional tokens are forwarded.
    pub(crate) fn run_with_options(
        &mut self,
        options: BTreeMap<String, Value>,
        ctx: &mut RunContext,
    ) -> Result<Vec<Value>, RunError> {
        self.state = PipelineState::Binding;
        let values = match bind_seeded(
            self.group.effective_arguments(),
            self.group.effective_options(),
            options,
        ) {
            Ok(values) => values,
            Err(err) => {
                self.state = PipelineState::Failed;
                return Err(err.into());
            }
        };
        self.execute(values, ctx)
    }

    fn execute(&mut self, values: BoundValues, ctx: &mut RunContext) -> Result<Vec<Value>, RunError> {
        self.state = PipelineState::Running;
        let tasks = self.group.effective_tasks();
        let mut results = Vec::with_capacity(tasks.len());
        for task in tasks {
            debug!(group = %self.group.label(), task = %task.name, "running task");
            let mut task_ctx = TaskContext {
                group: self.group,
                values: &values,
                ctx: &mut *ctx,
            };
            match task.call(&mut task_ctx) {
                Ok(value) => results.push(value),
                Err(err) => {
                    self.state = PipelineState::Failed;
                    return Err(RunError::Task(err));
                }
            }
        }
        self.state = PipelineState::Completed;
        Ok(results)
    }
}

/// Instance state handed to each task body.
///
/// Tasks read their bound arguments and options from here and reach the
/// invocation bridge through [`invoke`](TaskContext::invoke) and
/// [`invoke_from_option`](TaskContext::invoke_from_option).
pub struct TaskContext<'run> {
    group: &'run Group,
    values: &'run BoundValues,
    ctx: &'run mut RunContext,
}

impl TaskContext<'_> {
    /// Bound value of a positional argument.
    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.values.arguments.get(name)
    }

    /// Bound value of an option; absent options without defaults return
    /// `None`.
    pub fn option(&self, name: &str) -> Option<&Value> {
        self.values.options.get(name)
    }

    /// Residual positional tokens beyond the declared arguments.
    pub fn extra(&self) -> &[String] {
        &self.values.extra
    }

    /// The full bound value set.
    pub fn values(&self) -> &BoundValues {
        self.values
    }

    /// Invokes another group's pipeline, sharing applicable options.
    ///
    /// Returns `Ok(None)` when the target was already invoked in this
    /// run. Errors from the nested pipeline propagate unchanged.
    pub fn invoke(&mut self, target: &Arc<Group>) -> Result<Option<Vec<Value>>, TaskError> {
        self.invoke_with(target, BTreeMap::new())
    }

    /// Like [`invoke`](TaskContext::invoke), overlaying explicit option
    /// values on top of the shared set.
    pub fn invoke_with(
        &mut self,
        target: &Arc<Group>,
        extra_options: BTreeMap<String, Value>,
    ) -> Result<Option<Vec<Value>>, TaskError> {
        invoke::invoke(target, extra_options, self.group, self.values, self.ctx)
    }

    /// Invokes the group selected by the bound value of `option`.
    ///
    /// Absent or `false` values skip silently; an unregistered key is
    /// reported as not found and skipped.
    pub fn invoke_from_option(&mut self, option: &str) -> Result<Option<Vec<Value>>, TaskError> {
        invoke::invoke_from_option(self.group, option, self.values, self.ctx)
    }
}

#[cfg(test)]
mod tests {
    use taskforce_core::{ArgumentSpec, ValueType};

    use super::*;

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn counter() -> Arc<Group> {
        Group::builder("counter")
            .argument(ArgumentSpec::required("first", ValueType::Numeric))
            .task("one", |t| Ok(t.arg("first").unwrap().clone()))
            .task("two", |_| Ok(Value::Int(2)))
            .build()
            .unwrap()
    }

    #[test]
    fn test_successful_run_ends_completed_with_one_value_per_task() {
        let group = counter();
        let mut pipeline = Pipeline::new(&group);
        let mut ctx = RunContext::new();
        let results = pipeline.run(&tokens(&["7"]), &mut ctx).unwrap();
        assert_eq!(results, vec![Value::Int(7), Value::Int(2)]);
        assert_eq!(pipeline.state(), PipelineState::Completed);
    }

    #[test]
    fn test_binding_error_fails_before_any_task() {
        let group = counter();
        let mut pipeline = Pipeline::new(&group);
        let mut ctx = RunContext::new();
        let err = pipeline.run(&tokens(&[]), &mut ctx).unwrap_err();
        assert!(matches!(err, RunError::Parse(_)));
        assert_eq!(pipeline.state(), PipelineState::Failed);
    }

    #[test]
    fn test_task_error_aborts_remaining_tasks() {
        let group = Group::builder("broken")
            .task("one", |_| Ok(Value::Int(1)))
            .task("two", |_| Err(TaskError::msg("boom")))
            .task("three", |_| panic!("must not run"))
            .build()
            .unwrap();
        let mut pipeline = Pipeline::new(&group);
        let mut ctx = RunContext::new();
        let err = pipeline.run(&[], &mut ctx).unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert_eq!(pipeline.state(), PipelineState::Failed);
    }

    #[test]
    fn test_help_request_completes_without_results() {
        let group = counter();
        let mut pipeline = Pipeline::new(&group);
        let mut ctx = RunContext::new();
        let results = pipeline.run(&tokens(&["-h"]), &mut ctx).unwrap();
        assert!(results.is_empty());
        assert_eq!(pipeline.state(), PipelineState::Completed);
    }

    #[test]
    fn test_group_with_zero_tasks_completes_empty() {
        let group = Group::builder("empty").build().unwrap();
        let mut pipeline = Pipeline::new(&group);
        let mut ctx = RunContext::new();
        let results = pipeline.run(&[], &mut ctx).unwrap();
        assert!(results.is_empty());
        assert_eq!(pipeline.state(), PipelineState::Completed);
    }
}
