//! Cross-group invocation.
//!
//! A running task may trigger another group's pipeline, directly or
//! selected by an option value. The caller's bound options are shared
//! with the target by name intersection (subject to the context's
//! sharing policy), no positional tokens are forwarded, and each target
//! runs at most once per top-level run. Errors from the nested pipeline
//! propagate unchanged; only an unregistered selection key is a
//! reportable, non-fatal condition.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info};

use taskforce_core::Value;

use crate::binder::BoundValues;
use crate::context::{RunContext, SharePolicy};
use crate::error::TaskError;
use crate::group::{Group, InvokeTarget};
use crate::pipeline::Pipeline;

pub(crate) fn invoke(
    target: &Arc<Group>,
    extra_options: BTreeMap<String, Value>,
    caller: &Group,
    values: &BoundValues,
    ctx: &mut RunContext,
) -> Result<Option<Vec<Value>>, TaskError> {
    if !ctx.mark_invoked(target.label()) {
        debug!(group = %target.label(), "already invoked in this run");
        return Ok(None);
    }

    let mut shared = shared_options(caller, values, target, ctx.policy());
    shared.extend(extra_options);

    ctx.reporter().invoke_started(target.label());
    let results = Pipeline::new(target)
        .run_with_options(shared, ctx)
        .map_err(TaskError::from)?;
    ctx.reporter().invoke_finished(target.label());
    Ok(Some(results))
}

pub(crate) fn invoke_from_option(
    caller: &Group,
    option: &str,
    values: &BoundValues,
    ctx: &mut RunContext,
) -> Result<Option<Vec<Value>>, TaskError> {
    let Some(binding) = caller.invocation(option) else {
        return Err(TaskError::msg(format!(
            "no invocation is bound to option \"{option}\""
        )));
    };
    let Some(value) = values.options.get(option) else {
        debug!(option = %option, "option unbound, skipping invocation");
        return Ok(None);
    };

    match binding {
        InvokeTarget::WhenTrue(target) => match value.as_bool() {
            Some(true) => invoke(target, BTreeMap::new(), caller, values, ctx),
            _ => {
                debug!(option = %option, "option is false, skipping invocation");
                Ok(None)
            }
        },
        InvokeTarget::ByKey(targets) => {
            let Some(key) = value.as_str() else {
                return Ok(None);
            };
            match targets.get(key) {
                Some(target) => invoke(target, BTreeMap::new(), caller, values, ctx),
                None => {
                    info!(key = %key, option = %option, "no group registered for key");
                    ctx.reporter().invoke_not_found(key);
                    Ok(None)
                }
            }
        }
    }
}

fn shared_options(
    caller: &Group,
    values: &BoundValues,
    target: &Group,
    policy: SharePolicy,
) -> BTreeMap<String, Value> {
    let mut shared = BTreeMap::new();
    for spec in target.effective_options() {
        let Some(value) = values.options.get(&spec.name) else {
            continue;
        };
        let eligible = match policy {
            SharePolicy::FullNameMatch => true,
            SharePolicy::DeclaredOnly => caller
                .effective_options()
                .iter()
                .find(|opt| opt.name == spec.name)
                .is_some_and(|opt| opt.shared),
        };
        if eligible {
            shared.insert(spec.name.clone(), value.clone());
        }
    }
    shared
}
