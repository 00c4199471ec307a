//! Transitive dependency-count propagation.
//!
//! Every task carries a `depCount` attribute holding the size of its
//! full transitive dependency list, zero-padded so counts sort as text.
//! This action recomputes the closure over the whole store whenever the
//! current transition touched its dependencies (or the counter is
//! missing), then reconciles: only tasks whose stored counter disagrees
//! with the fresh value get a modification command.
//!
//! The pending transition's own dependency list overlays the stored one,
//! so reconciliation runs against the edit that is about to be
//! committed, not the stale store copy.

use std::collections::{BTreeSet, HashMap};

use serde_json::Value;
use uuid::Uuid;

use crate::actions::{Action, ActionOutcome};
use crate::core::command::{Directive, FieldAssign, ModCommand, Selector};
use crate::core::graph::transitive_dependencies;
use crate::core::task::Task;
use crate::gateway::{export_direct, TaskGateway};
use crate::{tlog_debug, Error, Result};

/// Tracker attribute holding the stored counter.
pub const DEP_COUNT_FIELD: &str = "depCount";
/// Tracker attribute holding the direct dependency list.
pub const DEPENDS_FIELD: &str = "depends";

pub struct MarkForDependencies;

impl Action for MarkForDependencies {
    fn name(&self) -> &'static str {
        "mark-for-dependencies"
    }

    fn applies(&self, task: &Task, old: Option<&Task>) -> bool {
        task.depends_differ(old) || !task.has_dep_count()
    }

    fn run(
        &self,
        mut task: Task,
        _old: Option<&Task>,
        gateway: &dyn TaskGateway,
    ) -> Result<ActionOutcome> {
        // The pending edit wins over whatever the store still holds.
        let mut edges = fetch_depends(gateway)?;
        edges.insert(task.uuid, task.depends.clone());

        let closure = transitive_dependencies(&edges)?;
        let counters = export_direct(gateway, DEP_COUNT_FIELD)?;

        // Width comes from the counters as stored before this run, so it
        // lags by one run when the true maximum grows.
        let width = counter_width(counters.values());

        let uuids: BTreeSet<Uuid> = closure.keys().chain(counters.keys()).copied().collect();
        let mut updates: HashMap<Uuid, usize> = HashMap::new();
        for uuid in uuids {
            let computed = closure.get(&uuid).map_or(0, Vec::len);
            let stored = counters.get(&uuid).and_then(parse_counter);
            if stored != Some(computed) {
                updates.insert(uuid, computed);
            }
        }
        tlog_debug!(
            "dependency counts: {} of {} tasks stale (width {})",
            updates.len(),
            closure.len(),
            width
        );

        let own = updates.get(&task.uuid).copied().unwrap_or(0);
        task.dep_count = Some(pad(own, width));

        let mut post = Vec::new();
        let mut stale: Vec<(&Uuid, &usize)> = updates
            .iter()
            .filter(|(uuid, _)| **uuid != task.uuid)
            .collect();
        stale.sort();
        for (uuid, count) in stale {
            post.push(Directive::silent(ModCommand::modify(
                Selector::Id(uuid.to_string()),
                vec![FieldAssign::new(DEP_COUNT_FIELD, &pad(*count, width))?],
            )));
        }
        if !post.is_empty() {
            post.push(Directive::message_only("Updated dependency counts"));
        }

        Ok(ActionOutcome::with_post(task, post))
    }
}

/// Direct dependency lists for every task in the store.
fn fetch_depends(gateway: &dyn TaskGateway) -> Result<HashMap<Uuid, Vec<Uuid>>> {
    export_direct(gateway, DEPENDS_FIELD)?
        .into_iter()
        .map(|(uuid, value)| Ok((uuid, parse_depends(&value)?)))
        .collect()
}

/// Parse a `depends` export value: absent, a uuid array, or the legacy
/// comma-joined string form.
fn parse_depends(value: &Value) -> Result<Vec<Uuid>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(raw) => Ok(Uuid::parse_str(raw)?),
                other => Err(Error::Gateway(format!(
                    "unexpected dependency entry: {}",
                    other
                ))),
            })
            .collect(),
        Value::String(joined) => joined
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| Ok(Uuid::parse_str(part)?))
            .collect(),
        other => Err(Error::Gateway(format!("unexpected depends value: {}", other))),
    }
}

/// Lenient counter parse: missing, empty, or unparseable counts as "no
/// stored counter" and therefore as needing an update.
fn parse_counter(value: &Value) -> Option<usize> {
    match value {
        Value::String(raw) => {
            let raw = raw.trim();
            if raw.is_empty() {
                return None;
            }
            raw.parse::<usize>()
                .ok()
                .or_else(|| raw.parse::<f64>().ok().map(|f| f as usize))
        }
        Value::Number(n) => n.as_u64().map(|n| n as usize),
        _ => None,
    }
}

/// Decimal digit count of the largest stored counter.
fn counter_width<'a>(counters: impl Iterator<Item = &'a Value>) -> usize {
    let max = counters
        .map(|value| parse_counter(value).unwrap_or(0))
        .max()
        .unwrap_or(0);
    max.to_string().len()
}

fn pad(count: usize, width: usize) -> String {
    format!("{:0width$}", count)
}
