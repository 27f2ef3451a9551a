#![no_main]

use libfuzzer_sys::fuzz_target;
use tau_github_trigger::{
    normalize_trigger_context, RawTriggerContext, TriggerBranches, TriggerInputs,
};

const EVENT_NAMES: &[&str] = &[
    "issue_comment",
    "issues",
    "pull_request",
    "pull_request_review",
    "pull_request_review_comment",
];

fuzz_target!(|data: &[u8]| {
    let Some((selector, rest)) = data.split_first() else {
        return;
    };
    let Ok(payload) = serde_json::from_slice::<serde_json::Value>(rest) else {
        return;
    };
    let event_name = EVENT_NAMES[*selector as usize % EVENT_NAMES.len()];
    let inputs = TriggerInputs {
        assignee_trigger: Some("fuzz-bot".to_string()),
        ..TriggerInputs::default()
    };
    let Ok(raw) = RawTriggerContext::from_event_payload("owner/repo", event_name, &payload, inputs)
    else {
        return;
    };
    let branches = TriggerBranches {
        default_branch: Some("main".to_string()),
        working_branch: Some("claude/fuzz".to_string()),
    };
    if let Ok(prepared) = normalize_trigger_context(&raw, 1, &branches) {
        let command = &prepared.command;
        assert_ne!(command.pr_number().is_some(), command.issue_number().is_some());
        assert_eq!(command.is_pr(), raw.is_pr);
        assert_eq!(command.event_name(), event_name);
    }
});
