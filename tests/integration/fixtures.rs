//! Test fixtures for integration tests.
//!
//! Provides an in-memory task store implementing the gateway contract,
//! plus helpers for building task JSON lines and running the full hook.

use std::cell::RefCell;
use std::collections::HashMap;

use serde_json::{Map, Value};
use uuid::Uuid;

use tend::actions::default_actions;
use tend::core::command::ModCommand;
use tend::gateway::TaskGateway;
use tend::hook::run_hook;
use tend::Result;

pub fn uuid(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

/// In-memory task store: serves exports from fixed rows and records
/// every command the pipeline executes.
#[derive(Default)]
pub struct StoreFake {
    rows: Vec<Map<String, Value>>,
    /// Rendered argument lists of executed commands, in order.
    pub ran: RefCell<Vec<Vec<String>>>,
}

impl StoreFake {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stored task with the given dependencies and counter.
    pub fn with_task(mut self, id: u128, depends: &[u128], dep_count: Option<&str>) -> Self {
        let mut row = Map::new();
        row.insert("uuid".to_string(), Value::String(uuid(id).to_string()));
        if !depends.is_empty() {
            row.insert(
                "depends".to_string(),
                Value::Array(
                    depends
                        .iter()
                        .map(|d| Value::String(uuid(*d).to_string()))
                        .collect(),
                ),
            );
        }
        if let Some(count) = dep_count {
            row.insert("depCount".to_string(), Value::String(count.to_string()));
        }
        self.rows.push(row);
        self
    }
}

impl TaskGateway for StoreFake {
    fn export_fields(&self, fields: &[&str]) -> Result<HashMap<Uuid, Map<String, Value>>> {
        let mut by_uuid = HashMap::new();
        for row in &self.rows {
            let id = match row.get("uuid") {
                Some(Value::String(raw)) => Uuid::parse_str(raw)?,
                _ => continue,
            };
            let mut selected = Map::new();
            for &field in fields {
                selected.insert(
                    field.to_string(),
                    row.get(field).cloned().unwrap_or(Value::Null),
                );
            }
            by_uuid.insert(id, selected);
        }
        Ok(by_uuid)
    }

    fn run(&self, cmd: &ModCommand) -> Result<()> {
        self.ran.borrow_mut().push(cmd.to_args());
        Ok(())
    }
}

/// A task JSON line with just a uuid and description.
pub fn task_line(id: u128, description: &str) -> String {
    format!(
        r#"{{"uuid":"{}","description":"{}"}}"#,
        uuid(id),
        description
    )
}

/// A task JSON line with extra raw fields appended.
pub fn task_line_with(id: u128, description: &str, extra: &str) -> String {
    format!(
        r#"{{"uuid":"{}","description":"{}",{}}}"#,
        uuid(id),
        description,
        extra
    )
}

/// Run the default pipeline over one transition, returning captured
/// stdout and stderr.
pub fn run(
    new_line: Option<&str>,
    old_line: Option<&str>,
    gateway: &StoreFake,
) -> (String, String) {
    let mut out = Vec::new();
    let mut err_out = Vec::new();
    run_hook(
        new_line,
        old_line,
        &default_actions(),
        gateway,
        &mut out,
        &mut err_out,
    )
    .expect("hook run failed");
    (
        String::from_utf8(out).expect("stdout not utf-8"),
        String::from_utf8(err_out).expect("stderr not utf-8"),
    )
}
