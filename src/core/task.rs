//! Task data model for the hook pipeline.
//!
//! A task is one record of the external tracker's store. The fields the
//! pipeline works with are typed; everything else the tracker emits is
//! carried verbatim in an extension map so the committed line never loses
//! data the actions did not touch.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::Result;

/// One task record, as exchanged with the tracker as a JSON line.
///
/// The uuid is assigned by the tracker and is never rewritten by an
/// action. Unknown fields round-trip through `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier assigned by the tracker.
    pub uuid: Uuid,
    /// Human-readable description; the autotag rules match against this.
    #[serde(default)]
    pub description: String,
    /// Tag set. Order is not significant.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Direct dependencies, as uuids of the depended-on tasks.
    #[serde(
        default,
        deserialize_with = "deserialize_depends",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub depends: Vec<Uuid>,
    /// Zero-padded count of all transitive dependencies, maintained by the
    /// reconciler. Stored as a string attribute on the tracker side.
    #[serde(
        default,
        rename = "depCount",
        skip_serializing_if = "Option::is_none"
    )]
    pub dep_count: Option<String>,
    /// Reverse-dependency attribute: "this task is a dependency for X".
    /// Consumed by the pipeline, never committed.
    #[serde(default, rename = "for", skip_serializing_if = "Option::is_none")]
    pub reverse_for: Option<String>,
    /// Every other field the tracker emitted, untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// Parse one task from a JSON line as emitted by the tracker.
    pub fn from_json_line(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line)?)
    }

    /// Serialize the task back to a single JSON line.
    pub fn to_json_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Whether the dependency list changed across the transition.
    ///
    /// With no prior version, a non-empty dependency list counts as a
    /// change (the task arrived with dependencies already set).
    pub fn depends_differ(&self, old: Option<&Task>) -> bool {
        match old {
            Some(old) => self.depends != old.depends,
            None => !self.depends.is_empty(),
        }
    }

    /// Whether the dependency counter is present and non-empty.
    pub fn has_dep_count(&self) -> bool {
        self.dep_count.as_deref().is_some_and(|c| !c.is_empty())
    }
}

/// Accept `depends` either as a uuid array or as the legacy
/// comma-separated string form some tracker versions export.
fn deserialize_depends<'de, D>(deserializer: D) -> std::result::Result<Vec<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<Uuid>),
        Joined(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(Vec::new()),
        Some(Raw::List(uuids)) => Ok(uuids),
        Some(Raw::Joined(joined)) => joined
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| Uuid::parse_str(part).map_err(serde::de::Error::custom))
            .collect(),
    }
}
