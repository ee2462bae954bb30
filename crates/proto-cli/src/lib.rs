//! Command-line host for the prototype studio.
//!
//! The binary parses [`cli::Cli`], sets up logging and settings, and hands
//! the command to [`commands::run`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod render;
