//! Automatic tag derivation from task descriptions and existing tags.
//!
//! Three rule families, all case-insensitive:
//! - self-tagging keywords: a bare word in the description becomes a tag
//!   of the same name;
//! - description patterns: a regex match adds a curated tag set;
//! - tag implications: one tag already present adds another.
//!
//! The result is the union of existing and derived tags with duplicates
//! removed; the pipeline sorts it so output is stable across runs.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::actions::{Action, ActionOutcome};
use crate::core::task::Task;
use crate::gateway::TaskGateway;
use crate::Result;

/// Keywords that map to themselves as a singleton tag.
const SELF_TAGGING: &[&str] = &[
    "buy",
    "learn",
    "move",
    "design",
    "server",
    "scraplang",
    "langcode",
    "game",
    "taskwarrior",
];

/// Description patterns mapping to curated tag sets.
const PATTERN_TAGS: &[(&str, &[&str])] = &[
    (
        r"(vault|bit)warden",
        &["vaultwarden", "password", "self.hosting"],
    ),
    (r"backup", &["backup", "security"]),
    (r"(prog|code)\w*", &["prog"]),
    (r"obsi(dian)?", &["obsi", "note"]),
];

/// A tag already present implying another tag.
const TAG_IMPLICATIONS: &[(&str, &[&str])] = &[("private", &["priv"])];

struct PatternRule {
    pattern: Regex,
    tags: &'static [&'static str],
}

/// The full rule table, compiled once. Patterns are fixed literals, so
/// compilation cannot fail at runtime.
static RULES: LazyLock<Vec<PatternRule>> = LazyLock::new(|| {
    PATTERN_TAGS
        .iter()
        .map(|&(pattern, tags)| (pattern, tags))
        .chain(
            SELF_TAGGING
                .iter()
                .map(|word| (*word, std::slice::from_ref(word))),
        )
        .map(|(pattern, tags)| PatternRule {
            pattern: RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .unwrap(),
            tags,
        })
        .collect()
});

pub struct Autotag;

impl Action for Autotag {
    fn name(&self) -> &'static str {
        "autotag"
    }

    fn run(
        &self,
        mut task: Task,
        _old: Option<&Task>,
        _gateway: &dyn TaskGateway,
    ) -> Result<ActionOutcome> {
        let mut tags: BTreeSet<String> = task.tags.iter().cloned().collect();

        for &(present, implied) in TAG_IMPLICATIONS {
            if task.tags.iter().any(|t| t == present) {
                tags.extend(implied.iter().map(|t| t.to_string()));
            }
        }

        for rule in RULES.iter() {
            if rule.pattern.is_match(&task.description) {
                tags.extend(rule.tags.iter().map(|t| t.to_string()));
            }
        }

        task.tags = tags.into_iter().collect();
        Ok(ActionOutcome::task_only(task))
    }
}
