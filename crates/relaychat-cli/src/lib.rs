//! relaychat-cli library root.
//!
//! Exposes the config and argument layers so integration tests can
//! exercise them without a terminal.

pub mod args;
pub mod config;
pub mod repl;
