//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the bulle binary.

mod commands;
mod generate;
mod parse;
mod server;

pub use commands::{Cli, Commands, ParseKind, StoryArgs};
pub use generate::{generate_comic, generate_outline};
pub use parse::parse_answer;
pub use server::serve_api;
