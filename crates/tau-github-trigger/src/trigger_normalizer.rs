//! Validation of raw GitHub triggers into a [`NormalizedCommand`].
//!
//! Each command variant carries its required fields as plain values, so a
//! constructed command is always complete. Optional values stay `None` unless
//! the source value was non-empty.

use crate::trigger_context::{
    RawTriggerContext, TriggerEventKind, TriggerPayload, DEFAULT_TRIGGER_PHRASE,
};
use crate::trigger_error::TriggerContextError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Branch names resolved by the hosting process before normalization.
pub struct TriggerBranches {
    pub default_branch: Option<String>,
    pub working_branch: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Fields shared by every command variant.
pub struct CommonFields {
    pub repository: String,
    pub claude_comment_id: u64,
    pub trigger_phrase: String,
    pub trigger_username: Option<String>,
    pub custom_instructions: Option<String>,
    pub allowed_tools: Option<String>,
    pub disallowed_tools: Option<String>,
    pub direct_prompt: Option<String>,
    pub working_branch: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Validated trigger command, one variant per event kind and flavor.
pub enum NormalizedCommand {
    PullRequestReviewComment {
        pr_number: u64,
        comment_body: String,
        comment_id: Option<u64>,
        working_branch: Option<String>,
        default_branch: Option<String>,
    },
    PullRequestReview {
        pr_number: u64,
        comment_body: String,
        working_branch: Option<String>,
        default_branch: Option<String>,
    },
    PullRequestComment {
        comment_id: u64,
        comment_body: String,
        pr_number: u64,
        working_branch: Option<String>,
        default_branch: Option<String>,
    },
    IssueComment {
        comment_id: u64,
        comment_body: String,
        issue_number: u64,
        working_branch: String,
        default_branch: String,
    },
    IssueAssigned {
        issue_number: u64,
        default_branch: String,
        working_branch: String,
        assignee_trigger: String,
    },
    IssueOpened {
        issue_number: u64,
        default_branch: String,
        working_branch: String,
    },
    PullRequest {
        pr_number: u64,
        action: Option<String>,
        working_branch: Option<String>,
        default_branch: Option<String>,
    },
}

impl NormalizedCommand {
    pub fn event_kind(&self) -> TriggerEventKind {
        match self {
            Self::PullRequestReviewComment { .. } => TriggerEventKind::PullRequestReviewComment,
            Self::PullRequestReview { .. } => TriggerEventKind::PullRequestReview,
            Self::PullRequestComment { .. } | Self::IssueComment { .. } => {
                TriggerEventKind::IssueComment
            }
            Self::IssueAssigned { .. } | Self::IssueOpened { .. } => TriggerEventKind::Issues,
            Self::PullRequest { .. } => TriggerEventKind::PullRequest,
        }
    }

    pub fn event_name(&self) -> &'static str {
        self.event_kind().as_str()
    }

    pub fn event_action(&self) -> Option<&str> {
        match self {
            Self::IssueAssigned { .. } => Some("assigned"),
            Self::IssueOpened { .. } => Some("opened"),
            Self::PullRequest { action, .. } => action.as_deref(),
            _ => None,
        }
    }

    pub fn is_pr(&self) -> bool {
        self.pr_number().is_some()
    }

    pub fn pr_number(&self) -> Option<u64> {
        match self {
            Self::PullRequestReviewComment { pr_number, .. }
            | Self::PullRequestReview { pr_number, .. }
            | Self::PullRequestComment { pr_number, .. }
            | Self::PullRequest { pr_number, .. } => Some(*pr_number),
            _ => None,
        }
    }

    pub fn issue_number(&self) -> Option<u64> {
        match self {
            Self::IssueComment { issue_number, .. }
            | Self::IssueAssigned { issue_number, .. }
            | Self::IssueOpened { issue_number, .. } => Some(*issue_number),
            _ => None,
        }
    }

    pub fn comment_id(&self) -> Option<u64> {
        match self {
            Self::PullRequestReviewComment { comment_id, .. } => *comment_id,
            Self::PullRequestComment { comment_id, .. } | Self::IssueComment { comment_id, .. } => {
                Some(*comment_id)
            }
            _ => None,
        }
    }

    /// Body of the triggering comment or review; `None` for issue and PR lifecycle events.
    pub fn comment_body(&self) -> Option<&str> {
        match self {
            Self::PullRequestReviewComment { comment_body, .. }
            | Self::PullRequestReview { comment_body, .. }
            | Self::PullRequestComment { comment_body, .. }
            | Self::IssueComment { comment_body, .. } => Some(comment_body.as_str()),
            _ => None,
        }
    }

    pub fn working_branch(&self) -> Option<&str> {
        match self {
            Self::PullRequestReviewComment { working_branch, .. }
            | Self::PullRequestReview { working_branch, .. }
            | Self::PullRequestComment { working_branch, .. }
            | Self::PullRequest { working_branch, .. } => working_branch.as_deref(),
            Self::IssueComment { working_branch, .. }
            | Self::IssueAssigned { working_branch, .. }
            | Self::IssueOpened { working_branch, .. } => Some(working_branch.as_str()),
        }
    }

    pub fn default_branch(&self) -> Option<&str> {
        match self {
            Self::PullRequestReviewComment { default_branch, .. }
            | Self::PullRequestReview { default_branch, .. }
            | Self::PullRequestComment { default_branch, .. }
            | Self::PullRequest { default_branch, .. } => default_branch.as_deref(),
            Self::IssueComment { default_branch, .. }
            | Self::IssueAssigned { default_branch, .. }
            | Self::IssueOpened { default_branch, .. } => Some(default_branch.as_str()),
        }
    }

    pub fn assignee_trigger(&self) -> Option<&str> {
        match self {
            Self::IssueAssigned {
                assignee_trigger, ..
            } => Some(assignee_trigger.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Normalizer output: the command paired with its common fields.
pub struct PreparedTrigger {
    pub common: CommonFields,
    pub command: NormalizedCommand,
}

#[derive(Debug, Default)]
struct PayloadFields {
    trigger_username: Option<String>,
    comment_id: Option<u64>,
    comment_body: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|value| !value.is_empty()).map(str::to_string)
}

fn require<T>(
    value: Option<T>,
    field: &'static str,
    event: &'static str,
) -> Result<T, TriggerContextError> {
    value.ok_or_else(|| TriggerContextError::missing(field, event))
}

fn extract_payload_fields(payload: &TriggerPayload) -> PayloadFields {
    match payload {
        TriggerPayload::IssueComment { comment }
        | TriggerPayload::PullRequestReviewComment { comment } => PayloadFields {
            trigger_username: non_empty(Some(comment.author_login.as_str())),
            comment_id: Some(comment.id),
            comment_body: non_empty(comment.body.as_deref()),
        },
        TriggerPayload::PullRequestReview { review } => PayloadFields {
            trigger_username: non_empty(Some(review.author_login.as_str())),
            comment_id: None,
            comment_body: Some(review.body.clone().unwrap_or_default()),
        },
        TriggerPayload::Issues { issue_author } => PayloadFields {
            trigger_username: non_empty(Some(issue_author.as_str())),
            ..PayloadFields::default()
        },
        TriggerPayload::PullRequest => PayloadFields::default(),
    }
}

/// Validates a raw trigger and reshapes it into a [`PreparedTrigger`].
pub fn normalize_trigger_context(
    raw: &RawTriggerContext,
    claude_comment_id: u64,
    branches: &TriggerBranches,
) -> Result<PreparedTrigger, TriggerContextError> {
    let inputs = &raw.inputs;
    let pr_number = raw.is_pr.then_some(raw.entity_number);
    let issue_number = (!raw.is_pr).then_some(raw.entity_number);
    let PayloadFields {
        trigger_username,
        comment_id,
        comment_body,
    } = extract_payload_fields(&raw.payload);
    let working_branch = non_empty(branches.working_branch.as_deref());
    let default_branch = non_empty(branches.default_branch.as_deref());

    let command = match TriggerEventKind::parse(&raw.event_name)? {
        TriggerEventKind::PullRequestReviewComment => {
            const EVENT: &str = "pull_request_review_comment event";
            NormalizedCommand::PullRequestReviewComment {
                pr_number: require(pr_number, "PR_NUMBER", EVENT)?,
                comment_body: require(comment_body, "COMMENT_BODY", EVENT)?,
                comment_id,
                working_branch: working_branch.clone(),
                default_branch,
            }
        }
        TriggerEventKind::PullRequestReview => {
            const EVENT: &str = "pull_request_review event";
            NormalizedCommand::PullRequestReview {
                pr_number: require(pr_number, "PR_NUMBER", EVENT)?,
                comment_body: require(comment_body, "COMMENT_BODY", EVENT)?,
                working_branch: working_branch.clone(),
                default_branch,
            }
        }
        TriggerEventKind::IssueComment => {
            const EVENT: &str = "issue_comment event";
            let comment_id = require(comment_id, "COMMENT_ID", EVENT)?;
            let comment_body = require(comment_body, "COMMENT_BODY", EVENT)?;
            if raw.is_pr {
                NormalizedCommand::PullRequestComment {
                    comment_id,
                    comment_body,
                    pr_number: require(pr_number, "PR_NUMBER", "issue_comment event for PRs")?,
                    working_branch: working_branch.clone(),
                    default_branch,
                }
            } else {
                NormalizedCommand::IssueComment {
                    comment_id,
                    comment_body,
                    working_branch: require(working_branch.clone(), "CLAUDE_BRANCH", EVENT)?,
                    default_branch: require(default_branch, "BASE_BRANCH", EVENT)?,
                    issue_number: require(
                        issue_number,
                        "ISSUE_NUMBER",
                        "issue_comment event for issues",
                    )?,
                }
            }
        }
        TriggerEventKind::Issues => {
            const EVENT: &str = "issues event";
            let action = require(
                non_empty(raw.event_action.as_deref()),
                "GITHUB_EVENT_ACTION",
                EVENT,
            )?;
            let issue_number = require(issue_number, "ISSUE_NUMBER", EVENT)?;
            match action.as_str() {
                "assigned" => {
                    let assignee_trigger = require(
                        non_empty(inputs.assignee_trigger.as_deref()),
                        "ASSIGNEE_TRIGGER",
                        "issue assigned event",
                    )?;
                    NormalizedCommand::IssueAssigned {
                        issue_number,
                        default_branch: require(default_branch, "BASE_BRANCH", EVENT)?,
                        working_branch: require(working_branch.clone(), "CLAUDE_BRANCH", EVENT)?,
                        assignee_trigger,
                    }
                }
                "opened" => NormalizedCommand::IssueOpened {
                    issue_number,
                    default_branch: require(default_branch, "BASE_BRANCH", EVENT)?,
                    working_branch: require(working_branch.clone(), "CLAUDE_BRANCH", EVENT)?,
                },
                other => {
                    return Err(TriggerContextError::UnsupportedIssueAction(
                        other.to_string(),
                    ))
                }
            }
        }
        TriggerEventKind::PullRequest => NormalizedCommand::PullRequest {
            pr_number: require(pr_number, "PR_NUMBER", "pull_request event")?,
            action: non_empty(raw.event_action.as_deref()),
            working_branch: working_branch.clone(),
            default_branch,
        },
    };

    let common = CommonFields {
        repository: raw.repository.clone(),
        claude_comment_id,
        trigger_phrase: non_empty(inputs.trigger_phrase.as_deref())
            .unwrap_or_else(|| DEFAULT_TRIGGER_PHRASE.to_string()),
        trigger_username,
        custom_instructions: non_empty(inputs.custom_instructions.as_deref()),
        allowed_tools: non_empty(inputs.allowed_tools.as_deref()),
        disallowed_tools: non_empty(inputs.disallowed_tools.as_deref()),
        direct_prompt: non_empty(inputs.direct_prompt.as_deref()),
        working_branch,
    };

    tracing::debug!(
        event_name = command.event_name(),
        event_action = command.event_action().unwrap_or("none"),
        is_pr = command.is_pr(),
        repository = %common.repository,
        "normalized github trigger"
    );

    Ok(PreparedTrigger { common, command })
}
