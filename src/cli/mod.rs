//! CLI module for macroloop - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for scenario runs and for
//! inspecting activities and configuration.

pub mod commands;

pub use commands::Cli;
