//! Per-run context and collaborator contracts.
//!
//! One [`RunContext`] exists per top-level run. It carries the status
//! reporter and help renderer the host wires in, the option-sharing
//! policy, and the invocation record used to suppress duplicate
//! invocations. Concurrent top-level runs each build their own context;
//! nothing here is shared between runs.

use std::collections::HashSet;

use tracing::info;

use taskforce_core::GroupDescriptor;

/// Which caller options are forwarded to an invoked group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SharePolicy {
    /// Forward every bound caller option the target also declares.
    #[default]
    FullNameMatch,
    /// Forward only options the caller declared as shared.
    DeclaredOnly,
}

/// Receives invocation lifecycle events for user-visible progress.
pub trait StatusReporter {
    /// A target group is about to run.
    fn invoke_started(&self, label: &str);
    /// A target group's pipeline completed.
    fn invoke_finished(&self, label: &str);
    /// A keyed invocation found no group for the bound key.
    fn invoke_not_found(&self, label: &str);
}

/// Renders a group descriptor when `-h`/`--help` is bound.
pub trait HelpRenderer {
    fn render(&self, descriptor: &GroupDescriptor);
}

/// Default reporter: forwards events to `tracing`.
#[derive(Debug, Default)]
pub struct TracingReporter;

impl StatusReporter for TracingReporter {
    fn invoke_started(&self, label: &str) {
        info!(group = %label, "invoke");
    }

    fn invoke_finished(&self, label: &str) {
        info!(group = %label, "finished");
    }

    fn invoke_not_found(&self, label: &str) {
        info!(group = %label, "not found");
    }
}

/// Default help renderer: discards the request.
#[derive(Debug, Default)]
pub struct NullHelpRenderer;

impl HelpRenderer for NullHelpRenderer {
    fn render(&self, _descriptor: &GroupDescriptor) {}
}

/// State scoped to one top-level run.
pub struct RunContext {
    reporter: Box<dyn StatusReporter>,
    help: Box<dyn HelpRenderer>,
    policy: SharePolicy,
    invoked: HashSet<String>,
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RunContext {
    /// Builds a context with the tracing reporter, no help rendering, and
    /// full-name-match option sharing.
    pub fn new() -> Self {
        Self {
            reporter: Box::new(TracingReporter),
            help: Box::new(NullHelpRenderer),
            policy: SharePolicy::default(),
            invoked: HashSet::new(),
        }
    }

    /// Replaces the status reporter.
    pub fn with_reporter(mut self, reporter: Box<dyn StatusReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Replaces the help renderer.
    pub fn with_help_renderer(mut self, help: Box<dyn HelpRenderer>) -> Self {
        self.help = help;
        self
    }

    /// Selects the option-sharing policy for invocations.
    pub fn with_share_policy(mut self, policy: SharePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Whether a group label was already invoked in this run.
    pub fn was_invoked(&self, label: &str) -> bool {
        self.invoked.contains(label)
    }

    pub(crate) fn reporter(&self) -> &dyn StatusReporter {
        self.reporter.as_ref()
    }

    pub(crate) fn help(&self) -> &dyn HelpRenderer {
        self.help.as_ref()
    }

    pub(crate) fn policy(&self) -> SharePolicy {
        self.policy
    }

    /// Records an invocation; returns `false` when the label was already
    /// invoked in this run.
    pub(crate) fn mark_invoked(&mut self, label: &str) -> bool {
        self.invoked.insert(label.to_string())
    }
}
