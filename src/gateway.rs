//! Task store gateway: reads and writes against the external tracker CLI.
//!
//! The core never talks to the tracker directly; it goes through the
//! [`TaskGateway`] trait so the pipeline can run against an in-memory
//! fake in tests. [`TaskCli`] is the production implementation, shelling
//! out to the tracker binary once per call.

use std::collections::HashMap;
use std::process::{Command, Stdio};

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::core::command::ModCommand;
use crate::{tlog_debug, tlog_warn, Error, Result};

/// Boundary operations the pipeline needs from the task store.
pub trait TaskGateway {
    /// Fetch the requested fields for every task in the store, keyed by
    /// uuid. The uuid itself is removed from each per-task mapping; a
    /// requested field a task does not carry appears as `Null`.
    fn export_fields(&self, fields: &[&str]) -> Result<HashMap<Uuid, Map<String, Value>>>;

    /// Execute one modification command. Child output is discarded; only
    /// the side effect on the store matters.
    fn run(&self, cmd: &ModCommand) -> Result<()>;
}

/// Flatten a single-field export to the bare field value per task.
pub fn export_direct(gateway: &dyn TaskGateway, field: &str) -> Result<HashMap<Uuid, Value>> {
    Ok(gateway
        .export_fields(&[field])?
        .into_iter()
        .map(|(uuid, mut fields)| (uuid, fields.remove(field).unwrap_or(Value::Null)))
        .collect())
}

/// Gateway backed by the tracker's command-line interface.
pub struct TaskCli {
    bin: String,
}

impl TaskCli {
    pub fn new(bin: &str) -> Self {
        Self {
            bin: bin.to_string(),
        }
    }
}

impl TaskGateway for TaskCli {
    fn export_fields(&self, fields: &[&str]) -> Result<HashMap<Uuid, Map<String, Value>>> {
        tlog_debug!("TaskCli::export_fields fields={:?}", fields);
        let output = Command::new(&self.bin).arg("export").output()?;
        if !output.status.success() {
            let err = format!(
                "{} export failed: {}",
                self.bin,
                String::from_utf8_lossy(&output.stderr)
            );
            tlog_warn!("{}", err);
            return Err(Error::Gateway(err));
        }

        let rows: Vec<Map<String, Value>> = serde_json::from_slice(&output.stdout)?;
        tlog_debug!("export returned {} tasks", rows.len());

        let mut by_uuid = HashMap::with_capacity(rows.len());
        for mut row in rows {
            let uuid = match row.remove("uuid") {
                Some(Value::String(raw)) => Uuid::parse_str(&raw)?,
                other => {
                    return Err(Error::Gateway(format!(
                        "export row without usable uuid: {:?}",
                        other
                    )))
                }
            };
            let mut selected = Map::new();
            for &field in fields {
                selected.insert(
                    field.to_string(),
                    row.remove(field).unwrap_or(Value::Null),
                );
            }
            by_uuid.insert(uuid, selected);
        }
        Ok(by_uuid)
    }

    fn run(&self, cmd: &ModCommand) -> Result<()> {
        let args = cmd.to_args();
        tlog_debug!("TaskCli::run {} {}", self.bin, args.join(" "));
        let output = Command::new(&self.bin)
            .args(&args)
            .stdout(Stdio::null())
            .output()?;
        if !output.status.success() {
            let err = format!(
                "{} {} failed: {}",
                self.bin,
                args.join(" "),
                String::from_utf8_lossy(&output.stderr)
            );
            tlog_warn!("{}", err);
            return Err(Error::Gateway(err));
        }
        Ok(())
    }
}
