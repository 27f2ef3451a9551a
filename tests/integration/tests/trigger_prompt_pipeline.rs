use serde_json::{json, Value};
use tau_github_trigger::{
    build_trigger_prompt, classify_trigger, normalize_trigger_context, FetchedContext,
    RawTriggerContext, TriggerBranches, TriggerContextError, TriggerEventKind, TriggerInputs,
    TriggerPromptArtifacts, TriggerPromptRequest,
};

fn fetched_pull_request() -> FetchedContext {
    serde_json::from_value(json!({
        "subject": {
            "kind": "pull_request",
            "title": "Fix the bug",
            "author": "alice",
            "headRefName": "fix/bug",
            "baseRefName": "main",
            "state": "OPEN",
            "additions": 4,
            "deletions": 2,
            "totalCommits": 1,
            "changedFileCount": 1
        },
        "body": "Fixes the crash",
        "comments": [
            { "author": "bob", "createdAt": "2026-01-01T00:00:00Z", "body": "@claude fix the bug" }
        ],
        "changedFiles": [
            { "path": "src/lib.rs", "changeType": "MODIFIED", "additions": 4, "deletions": 2, "sha": "f00d" }
        ]
    }))
    .expect("fetched pull request")
}

fn fetched_issue() -> FetchedContext {
    serde_json::from_value(json!({
        "subject": { "kind": "issue", "title": "Docs", "author": "alice", "state": "OPEN" }
    }))
    .expect("fetched issue")
}

fn issue_comment_on_pr_payload() -> Value {
    json!({
        "action": "created",
        "issue": {
            "number": 12,
            "user": { "login": "alice" },
            "pull_request": { "url": "https://api.github.com/repos/owner/repo/pulls/12" }
        },
        "comment": { "id": 55, "body": "@claude fix the bug", "user": { "login": "bob" } }
    })
}

fn build(
    event_name: &str,
    payload: &Value,
    inputs: TriggerInputs,
    branches: &TriggerBranches,
    fetched: &FetchedContext,
) -> Result<TriggerPromptArtifacts, TriggerContextError> {
    let raw = RawTriggerContext::from_event_payload("owner/repo", event_name, payload, inputs)?;
    build_trigger_prompt(TriggerPromptRequest {
        raw: &raw,
        claude_comment_id: 1001,
        branches,
        fetched,
        server_url: "https://github.com",
    })
}

#[test]
fn integration_issue_comment_on_pull_request_normalizes_and_classifies() {
    let raw = RawTriggerContext::from_event_payload(
        "owner/repo",
        "issue_comment",
        &issue_comment_on_pr_payload(),
        TriggerInputs::default(),
    )
    .expect("raw");
    let prepared =
        normalize_trigger_context(&raw, 1001, &TriggerBranches::default()).expect("prepared");
    assert_eq!(prepared.command.event_name(), "issue_comment");
    assert!(prepared.command.is_pr());
    assert_eq!(prepared.command.pr_number(), Some(12));
    assert_eq!(prepared.command.comment_id(), Some(55));
    let classification = classify_trigger(&prepared.command, &prepared.common.trigger_phrase);
    assert_eq!(classification.category.as_str(), "GENERAL_COMMENT");
}

#[test]
fn integration_assigned_issue_without_assignee_trigger_fails_validation() {
    let payload = json!({
        "action": "assigned",
        "issue": { "number": 9, "user": { "login": "alice" } }
    });
    let branches = TriggerBranches {
        default_branch: Some("main".to_string()),
        working_branch: Some("claude/issue-9".to_string()),
    };
    let error = build(
        "issues",
        &payload,
        TriggerInputs::default(),
        &branches,
        &fetched_issue(),
    )
    .expect_err("missing assignee trigger");
    assert_eq!(
        error.to_string(),
        "ASSIGNEE_TRIGGER is required for issue assigned event"
    );
}

#[test]
fn integration_review_comment_capabilities_use_pull_request_comment_tool() {
    let payload = json!({
        "action": "created",
        "pull_request": { "number": 12 },
        "comment": { "id": 8, "body": "@claude rename this", "user": { "login": "bob" } }
    });
    let artifacts = build(
        "pull_request_review_comment",
        &payload,
        TriggerInputs::default(),
        &TriggerBranches::default(),
        &fetched_pull_request(),
    )
    .expect("artifacts");
    assert_eq!(
        artifacts.prepared.command.event_kind(),
        TriggerEventKind::PullRequestReviewComment
    );
    let tokens = artifacts.allowed_tools.split(',').collect::<Vec<_>>();
    assert!(tokens.contains(&"mcp__github__update_pull_request_comment"));
    assert!(!tokens.contains(&"mcp__github__update_issue_comment"));
}

#[test]
fn integration_branch_guidance_depends_on_working_branch() {
    let payload = issue_comment_on_pr_payload();
    let without_branch = build(
        "issue_comment",
        &payload,
        TriggerInputs::default(),
        &TriggerBranches::default(),
        &fetched_pull_request(),
    )
    .expect("artifacts");
    assert!(without_branch
        .document
        .contains("Push directly using mcp__github_file_ops__commit_files to the existing branch"));
    assert!(!without_branch.document.contains("[Create a PR]"));

    let branches = TriggerBranches {
        default_branch: Some("main".to_string()),
        working_branch: Some("claude/fix-1".to_string()),
    };
    let with_branch = build(
        "issue_comment",
        &payload,
        TriggerInputs::default(),
        &branches,
        &fetched_pull_request(),
    )
    .expect("artifacts");
    assert!(with_branch
        .document
        .contains("https://github.com/owner/repo/compare/main...claude/fix-1?quick_pull=1"));
    assert!(!with_branch.document.contains("main...claude%2Ffix-1"));
    assert!(with_branch
        .document
        .contains("You are already on the correct branch (claude/fix-1)"));
}

#[test]
fn integration_issue_documents_keep_pr_section_markers_with_placeholders() {
    let payload = json!({
        "action": "opened",
        "issue": { "number": 4, "user": { "login": "alice" } }
    });
    let branches = TriggerBranches {
        default_branch: Some("main".to_string()),
        working_branch: Some("claude/issue-4".to_string()),
    };
    let inputs = TriggerInputs {
        disallowed_tools: Some("Bash".to_string()),
        custom_instructions: Some("Prefer small commits".to_string()),
        ..TriggerInputs::default()
    };
    let artifacts =
        build("issues", &payload, inputs, &branches, &fetched_issue()).expect("artifacts");
    let document = &artifacts.document;
    assert!(document.contains(
        "<review_comments>\nNot applicable: this trigger is for an issue, not a pull request\n</review_comments>"
    ));
    assert!(document.contains(
        "<changed_files>\nNot applicable: this trigger is for an issue, not a pull request\n</changed_files>"
    ));
    assert!(document.contains("<event_type>ISSUE_CREATED</event_type>"));
    assert!(document.ends_with("CUSTOM INSTRUCTIONS:\nPrefer small commits"));
    assert_eq!(artifacts.disallowed_tools, "WebSearch,WebFetch,Bash");
}
