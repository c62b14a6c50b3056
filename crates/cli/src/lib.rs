//! checkrun CLI
//!
//! Command-line entry points for running the API and UI tracks and
//! inspecting the built-in case sets.

pub mod commands;
pub mod output;
pub mod settings;
