pub mod actions;
pub mod config;
pub mod core;
pub mod error;
pub mod gateway;
pub mod hook;
pub mod log;

pub use crate::core::task::Task;
pub use crate::error::{Error, Result};
