//! Process entry point helpers for the GitHub trigger prompt builder.
//!
//! Reads the GitHub Actions environment, runs the pure trigger pipeline from
//! `tau-github-trigger`, and persists the instruction document and tool lists.

pub mod cli_args;
pub mod create_prompt;
pub mod prompt_artifacts;

pub use cli_args::Cli;
pub use create_prompt::{run_create_prompt, CreatePromptReport};
