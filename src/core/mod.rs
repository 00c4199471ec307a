//! Core domain models for the hook pipeline.
//!
//! This module contains the fundamental data structures used throughout
//! the pipeline: tasks, tracker commands, and the dependency closure.

pub mod command;
pub mod graph;
pub mod task;

pub use command::{Directive, FieldAssign, ModCommand, Selector};
pub use task::Task;
