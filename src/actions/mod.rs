//! Rule actions applied to each task transition.
//!
//! An action inspects the transition (new task plus optional previous
//! version), may mutate the task, and may request commands against the
//! tracker. Execution of those commands is deferred to the commit stage;
//! an action itself only reads through the gateway.

pub mod autotag;
pub mod dep_counts;
pub mod reverse_dependency;

pub use autotag::Autotag;
pub use dep_counts::MarkForDependencies;
pub use reverse_dependency::ReverseDependency;

use crate::core::command::Directive;
use crate::core::task::Task;
use crate::gateway::TaskGateway;
use crate::{tlog_debug, Result};

/// What one action produced: commands to run before the commit, the
/// (possibly mutated) task, and commands to run after.
pub struct ActionOutcome {
    pub pre: Vec<Directive>,
    pub task: Task,
    pub post: Vec<Directive>,
}

impl ActionOutcome {
    /// Just the task, no commands.
    pub fn task_only(task: Task) -> Self {
        Self {
            pre: Vec::new(),
            task,
            post: Vec::new(),
        }
    }

    /// A mutated task with post-commands only.
    pub fn with_post(task: Task, post: Vec<Directive>) -> Self {
        Self {
            pre: Vec::new(),
            task,
            post,
        }
    }
}

/// One self-contained rule over a task transition.
pub trait Action {
    /// Stable name, used for logging and the `disabled_actions` config.
    fn name(&self) -> &'static str;

    /// Whether the action applies to this transition. Pure; must not
    /// mutate anything.
    fn applies(&self, _task: &Task, _old: Option<&Task>) -> bool {
        true
    }

    /// Apply the action. Must return the task even when nothing changed.
    fn run(
        &self,
        task: Task,
        old: Option<&Task>,
        gateway: &dyn TaskGateway,
    ) -> Result<ActionOutcome>;
}

/// The built-in pipeline, in execution order.
pub fn default_actions() -> Vec<Box<dyn Action>> {
    vec![
        Box::new(ReverseDependency),
        Box::new(Autotag),
        Box::new(MarkForDependencies),
    ]
}

/// The built-in pipeline minus the actions named in `disabled`.
pub fn enabled_actions(disabled: &[String]) -> Vec<Box<dyn Action>> {
    default_actions()
        .into_iter()
        .filter(|action| !disabled.iter().any(|name| name == action.name()))
        .collect()
}

/// Run the ordered action list over one transition.
///
/// Each applicable action sees the task as mutated by its predecessors.
/// Pre- and post-command lists concatenate in action order. Skipped
/// actions contribute nothing.
pub fn perform_all(
    mut task: Task,
    old: Option<&Task>,
    actions: &[Box<dyn Action>],
    gateway: &dyn TaskGateway,
) -> Result<(Vec<Directive>, Task, Vec<Directive>)> {
    let mut pres = Vec::new();
    let mut posts = Vec::new();

    for action in actions {
        if !action.applies(&task, old) {
            tlog_debug!("action {}: skipped", action.name());
            continue;
        }
        tlog_debug!("action {}: running", action.name());
        let outcome = action.run(task, old, gateway)?;
        task = outcome.task;
        pres.extend(outcome.pre);
        posts.extend(outcome.post);
    }

    Ok((pres, task, posts))
}
