//! Command-line interface.
//!
//! - [`args`]: clap derive definitions
//! - [`commands`]: handlers and dispatch

pub mod args;
pub mod commands;
