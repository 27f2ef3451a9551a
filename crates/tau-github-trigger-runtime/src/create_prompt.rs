use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tau_github_trigger::{
    build_trigger_prompt, FetchedContext, RawTriggerContext, TriggerBranches, TriggerInputs,
    TriggerPromptRequest,
};

use crate::cli_args::Cli;
use crate::prompt_artifacts::{
    export_github_env, prompt_path_for_runner_temp, write_prompt_document, ALLOWED_TOOLS_ENV,
    DISALLOWED_TOOLS_ENV,
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Summary of one prompt-preparation run.
pub struct CreatePromptReport {
    pub prompt_path: PathBuf,
    pub event_type: &'static str,
    pub allowed_tools: String,
    pub disallowed_tools: String,
}

fn read_json_file(path: &Path, label: &str) -> Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {label} {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {label} {}", path.display()))
}

fn trigger_inputs_from_cli(cli: &Cli) -> TriggerInputs {
    TriggerInputs {
        trigger_phrase: cli.trigger_phrase.clone(),
        assignee_trigger: cli.assignee_trigger.clone(),
        allowed_tools: cli.allowed_tools.clone(),
        disallowed_tools: cli.disallowed_tools.clone(),
        custom_instructions: cli.custom_instructions.clone(),
        direct_prompt: cli.direct_prompt.clone(),
    }
}

/// Normalizes the trigger, writes the instruction document, and exports the tool lists.
pub fn run_create_prompt(cli: &Cli) -> Result<CreatePromptReport> {
    let payload = read_json_file(&cli.event_path, "event payload")?;
    let raw = RawTriggerContext::from_event_payload(
        &cli.repository,
        &cli.event_name,
        &payload,
        trigger_inputs_from_cli(cli),
    )
    .context("failed to read github trigger context")?;
    let fetched: FetchedContext = serde_json::from_value(read_json_file(
        &cli.fetched_context_path,
        "fetched context",
    )?)
    .with_context(|| {
        format!(
            "fetched context {} has an unexpected shape",
            cli.fetched_context_path.display()
        )
    })?;
    let branches = TriggerBranches {
        default_branch: cli.default_branch.clone(),
        working_branch: cli.claude_branch.clone(),
    };

    let artifacts = build_trigger_prompt(TriggerPromptRequest {
        raw: &raw,
        claude_comment_id: cli.claude_comment_id,
        branches: &branches,
        fetched: &fetched,
        server_url: &cli.server_url,
    })
    .context("failed to prepare instruction document")?;

    let prompt_path = prompt_path_for_runner_temp(&cli.runner_temp);
    write_prompt_document(&prompt_path, &artifacts.document)?;
    export_github_env(
        cli.github_env.as_deref(),
        &[
            (ALLOWED_TOOLS_ENV, artifacts.allowed_tools.as_str()),
            (DISALLOWED_TOOLS_ENV, artifacts.disallowed_tools.as_str()),
        ],
    )?;
    tracing::info!(
        event_type = artifacts.classification.category.as_str(),
        prompt_path = %prompt_path.display(),
        "instruction document written"
    );

    Ok(CreatePromptReport {
        prompt_path,
        event_type: artifacts.classification.category.as_str(),
        allowed_tools: artifacts.allowed_tools,
        disallowed_tools: artifacts.disallowed_tools,
    })
}
