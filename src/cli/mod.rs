//! CLI module for roundtable - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for code review, code
//! generation, planning, and the demo workflows.

pub mod commands;

pub use commands::Cli;
