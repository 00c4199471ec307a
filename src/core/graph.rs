//! Transitive dependency closure over the direct-dependency edge map.
//!
//! The traversal uses an explicit work-stack rather than recursion, and
//! it deliberately performs no deduplication: a task reachable along two
//! paths appears twice in the output list. Callers only ever consume the
//! list's length, and the stored counters were produced with the same
//! multiset semantics.
//!
//! The dependency graph is assumed acyclic (the tracker rejects circular
//! dependencies at entry). A step budget turns a cyclic input into a
//! detectable error instead of a hang.

use std::collections::HashMap;

use uuid::Uuid;

use crate::{Error, Result};

/// Upper bound on work-stack pops for one closure computation. Orders of
/// magnitude above any realistic store; only a cycle gets near it.
pub const TRAVERSAL_STEP_LIMIT: usize = 1_000_000;

/// Compute the full transitive dependency list for every task.
///
/// `edges` maps each task to its direct dependencies. The result maps
/// each task to all tasks reachable by following edges, with
/// multiplicities preserved.
pub fn transitive_dependencies(
    edges: &HashMap<Uuid, Vec<Uuid>>,
) -> Result<HashMap<Uuid, Vec<Uuid>>> {
    transitive_dependencies_bounded(edges, TRAVERSAL_STEP_LIMIT)
}

/// Same as [`transitive_dependencies`] with an explicit step budget.
///
/// # Errors
/// Returns [`Error::CycleSuspected`] once the budget is exhausted.
pub fn transitive_dependencies_bounded(
    edges: &HashMap<Uuid, Vec<Uuid>>,
    limit: usize,
) -> Result<HashMap<Uuid, Vec<Uuid>>> {
    let mut closure = HashMap::with_capacity(edges.len());
    let mut steps = 0usize;

    for (&uuid, direct) in edges {
        let mut reachable = Vec::new();
        let mut stack: Vec<Uuid> = direct.clone();
        while let Some(dep) = stack.pop() {
            steps += 1;
            if steps > limit {
                return Err(Error::CycleSuspected { steps: limit });
            }
            reachable.push(dep);
            if let Some(next) = edges.get(&dep) {
                stack.extend(next.iter().copied());
            }
        }
        closure.insert(uuid, reachable);
    }

    Ok(closure)
}
