//! Reverse dependency registration.
//!
//! A task can declare "I am a dependency *for* some other task" through
//! the `for` attribute instead of the usual direction. The attribute is
//! consumed here and turned into a deferred modification of the target.

use crate::actions::{Action, ActionOutcome};
use crate::core::command::{Directive, FieldAssign, ModCommand, Selector};
use crate::core::task::Task;
use crate::gateway::TaskGateway;
use crate::Result;

pub struct ReverseDependency;

impl Action for ReverseDependency {
    fn name(&self) -> &'static str {
        "reverse-dependency"
    }

    fn applies(&self, task: &Task, _old: Option<&Task>) -> bool {
        task.reverse_for.is_some()
    }

    fn run(
        &self,
        mut task: Task,
        _old: Option<&Task>,
        _gateway: &dyn TaskGateway,
    ) -> Result<ActionOutcome> {
        let Some(dest) = task.reverse_for.take() else {
            return Ok(ActionOutcome::task_only(task));
        };

        // A numeric target is a working id; anything else matches on
        // description.
        let selector = if !dest.is_empty() && dest.chars().all(|c| c.is_ascii_digit()) {
            Selector::Id(dest)
        } else {
            Selector::Description(dest)
        };

        let message = format!("Added as dependency for \"{}\"", selector);
        let command = ModCommand::modify(
            selector,
            vec![FieldAssign::new("depends", &task.uuid.to_string())?],
        );
        Ok(ActionOutcome::with_post(
            task,
            vec![Directive::new(message, command)],
        ))
    }
}
