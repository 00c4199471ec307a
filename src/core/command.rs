//! Modification commands issued against the tracker.
//!
//! Commands are built as tagged structures and validated when the field
//! assignments are constructed, so a malformed attribute name aborts the
//! run before any command has been executed. The gateway renders them to
//! CLI argument tokens only at the process boundary.

use std::fmt;

use crate::{Error, Result};

/// Symbols the tracker reserves inside attribute names; an assignment
/// whose name contains one would be misparsed as a field path.
const DISALLOWED_NAME_SYMBOLS: &[char] = &['_', '-', '.', ':'];

/// Target of a modification command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// A literal task reference: numeric working id or uuid.
    Id(String),
    /// A description-contains filter.
    Description(String),
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Id(id) => write!(f, "{}", id),
            Selector::Description(text) => write!(f, "description~\"{}\"", text),
        }
    }
}

/// One `name:value` attribute assignment.
///
/// The name is validated at construction; values are free-form (uuids,
/// for instance, legitimately contain `-`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAssign {
    name: String,
    value: String,
}

impl FieldAssign {
    pub fn new(name: &str, value: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(Error::Validation("Empty attribute name".to_string()));
        }
        if name
            .chars()
            .any(|c| c.is_whitespace() || DISALLOWED_NAME_SYMBOLS.contains(&c))
        {
            return Err(Error::Validation(format!(
                "Unallowed symbol in attribute: {}",
                name
            )));
        }
        Ok(Self {
            name: name.to_string(),
            value: value.to_string(),
        })
    }

    pub fn render(&self) -> String {
        format!("{}:{}", self.name, self.value)
    }
}

/// One modification command: `<selector> modify <assignments>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModCommand {
    pub selector: Selector,
    pub assigns: Vec<FieldAssign>,
}

impl ModCommand {
    pub fn modify(selector: Selector, assigns: Vec<FieldAssign>) -> Self {
        Self { selector, assigns }
    }

    /// Render to CLI argument tokens, without the binary name.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![self.selector.to_string(), "modify".to_string()];
        args.extend(self.assigns.iter().map(FieldAssign::render));
        args
    }
}

/// A human-readable message paired with an optional command.
///
/// An empty message means no log line; an absent command means the
/// directive is message-only and triggers no gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub message: String,
    pub command: Option<ModCommand>,
}

impl Directive {
    /// A command accompanied by a log line.
    pub fn new(message: impl Into<String>, command: ModCommand) -> Self {
        Self {
            message: message.into(),
            command: Some(command),
        }
    }

    /// A command executed without a log line.
    pub fn silent(command: ModCommand) -> Self {
        Self {
            message: String::new(),
            command: Some(command),
        }
    }

    /// A log line with no command behind it.
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            command: None,
        }
    }
}
