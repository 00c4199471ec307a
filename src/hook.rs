//! Hook entry: parse the transition, run the pipeline, commit the task.
//!
//! Exactly one JSON task line goes to `out` on success; directive
//! messages go to `err_out`. A missing task is a silent success, per the
//! tracker's hook contract. Nothing is printed until the whole pipeline
//! has completed, so a failing action leaves no visible task mutation.

use std::io::Write;

use crate::actions::{perform_all, Action};
use crate::core::command::Directive;
use crate::core::task::Task;
use crate::gateway::TaskGateway;
use crate::{tlog, tlog_debug, Result};

/// Process one transition end-to-end.
///
/// `new_line` is the task being committed; `old_line` its previous
/// version, if any. Both are raw JSON lines as handed over by the
/// tracker.
pub fn run_hook(
    new_line: Option<&str>,
    old_line: Option<&str>,
    actions: &[Box<dyn Action>],
    gateway: &dyn TaskGateway,
    out: &mut impl Write,
    err_out: &mut impl Write,
) -> Result<()> {
    let Some(new_line) = new_line.filter(|line| !line.trim().is_empty()) else {
        tlog_debug!("no task on input, nothing to do");
        return Ok(());
    };

    let task = Task::from_json_line(new_line)?;
    let old = old_line
        .filter(|line| !line.trim().is_empty())
        .map(Task::from_json_line)
        .transpose()?;
    tlog!(
        "processing task {} ({})",
        task.uuid,
        if old.is_some() { "modify" } else { "add" }
    );

    let (pres, task, posts) = perform_all(task, old.as_ref(), actions, gateway)?;

    execute(&pres, gateway, err_out)?;
    writeln!(out, "{}", task.to_json_line()?)?;
    tlog_debug!("committed task {}", task.uuid);
    execute(&posts, gateway, err_out)?;
    Ok(())
}

/// Run a directive list in order: execute each command, then print its
/// message. Empty messages stay silent.
fn execute(
    directives: &[Directive],
    gateway: &dyn TaskGateway,
    err_out: &mut impl Write,
) -> Result<()> {
    for directive in directives {
        if let Some(cmd) = &directive.command {
            gateway.run(cmd)?;
        }
        if !directive.message.is_empty() {
            writeln!(err_out, "{}", directive.message)?;
        }
    }
    Ok(())
}
