use crate::trigger_context::TriggerEventKind;

pub const BASE_ALLOWED_TOOLS: &[&str] = &[
    "Edit",
    "Glob",
    "Grep",
    "LS",
    "Read",
    "Write",
    "mcp__github_file_ops__commit_files",
    "mcp__github_file_ops__delete_files",
];
pub const DISALLOWED_TOOLS: &[&str] = &["WebSearch", "WebFetch"];

pub const UPDATE_ISSUE_COMMENT_TOOL: &str = "mcp__github__update_issue_comment";
pub const UPDATE_PULL_REQUEST_COMMENT_TOOL: &str = "mcp__github__update_pull_request_comment";

/// Returns the single comment-update tool the agent may use for this event kind.
pub fn comment_update_tool(kind: TriggerEventKind) -> &'static str {
    match kind {
        TriggerEventKind::PullRequestReviewComment => UPDATE_PULL_REQUEST_COMMENT_TOOL,
        _ => UPDATE_ISSUE_COMMENT_TOOL,
    }
}

fn join_with_extra(base: &[&str], extra: Option<&str>) -> String {
    let joined = base.join(",");
    match extra.filter(|value| !value.is_empty()) {
        Some(extra) => format!("{joined},{extra}"),
        None => joined,
    }
}

/// Builds the comma-joined allow list. `extra` is appended verbatim.
pub fn build_allowed_tools(kind: TriggerEventKind, extra: Option<&str>) -> String {
    let mut tools = BASE_ALLOWED_TOOLS.to_vec();
    tools.push(comment_update_tool(kind));
    join_with_extra(&tools, extra)
}

/// Builds the comma-joined deny list. `extra` is appended verbatim.
pub fn build_disallowed_tools(extra: Option<&str>) -> String {
    join_with_extra(DISALLOWED_TOOLS, extra)
}
