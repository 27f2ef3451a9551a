use crate::fetched_context::FetchedContext;
use crate::instruction_document::{render_instruction_document, InstructionDocumentRequest};
use crate::trigger_capabilities::{build_allowed_tools, build_disallowed_tools};
use crate::trigger_classifier::{classify_trigger, TriggerClassification};
use crate::trigger_context::RawTriggerContext;
use crate::trigger_error::TriggerContextError;
use crate::trigger_normalizer::{normalize_trigger_context, PreparedTrigger, TriggerBranches};

/// Inputs for one end-to-end prompt build.
pub struct TriggerPromptRequest<'a> {
    pub raw: &'a RawTriggerContext,
    pub claude_comment_id: u64,
    pub branches: &'a TriggerBranches,
    pub fetched: &'a FetchedContext,
    pub server_url: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Everything the hosting process persists for the downstream agent run.
pub struct TriggerPromptArtifacts {
    pub prepared: PreparedTrigger,
    pub classification: TriggerClassification,
    pub allowed_tools: String,
    pub disallowed_tools: String,
    pub document: String,
}

pub fn build_trigger_prompt(
    request: TriggerPromptRequest<'_>,
) -> Result<TriggerPromptArtifacts, TriggerContextError> {
    let prepared =
        normalize_trigger_context(request.raw, request.claude_comment_id, request.branches)?;
    let classification = classify_trigger(&prepared.command, &prepared.common.trigger_phrase);
    let allowed_tools = build_allowed_tools(
        prepared.command.event_kind(),
        prepared.common.allowed_tools.as_deref(),
    );
    let disallowed_tools = build_disallowed_tools(prepared.common.disallowed_tools.as_deref());
    let document = render_instruction_document(InstructionDocumentRequest {
        prepared: &prepared,
        classification: &classification,
        fetched: request.fetched,
        server_url: request.server_url,
    });
    Ok(TriggerPromptArtifacts {
        prepared,
        classification,
        allowed_tools,
        disallowed_tools,
        document,
    })
}
