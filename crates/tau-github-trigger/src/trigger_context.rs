use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::trigger_error::TriggerContextError;

pub const DEFAULT_TRIGGER_PHRASE: &str = "@claude";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Enumerates GitHub webhook event names that can carry a trigger.
pub enum TriggerEventKind {
    PullRequestReviewComment,
    PullRequestReview,
    IssueComment,
    Issues,
    PullRequest,
}

impl TriggerEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PullRequestReviewComment => "pull_request_review_comment",
            Self::PullRequestReview => "pull_request_review",
            Self::IssueComment => "issue_comment",
            Self::Issues => "issues",
            Self::PullRequest => "pull_request",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, TriggerContextError> {
        match raw {
            "pull_request_review_comment" => Ok(Self::PullRequestReviewComment),
            "pull_request_review" => Ok(Self::PullRequestReview),
            "issue_comment" => Ok(Self::IssueComment),
            "issues" => Ok(Self::Issues),
            "pull_request" => Ok(Self::PullRequest),
            other => Err(TriggerContextError::UnsupportedEventType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// User-supplied action inputs. Empty strings are treated as absent downstream.
pub struct TriggerInputs {
    #[serde(default)]
    pub trigger_phrase: Option<String>,
    #[serde(default)]
    pub assignee_trigger: Option<String>,
    #[serde(default)]
    pub allowed_tools: Option<String>,
    #[serde(default)]
    pub disallowed_tools: Option<String>,
    #[serde(default)]
    pub custom_instructions: Option<String>,
    #[serde(default)]
    pub direct_prompt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Comment fields shared by issue comments and inline review comments.
pub struct TriggerComment {
    pub id: u64,
    pub body: Option<String>,
    pub author_login: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Review fields. Reviews have no comment id of their own.
pub struct TriggerReview {
    pub body: Option<String>,
    pub author_login: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Event-specific payload slice the normalizer reads from.
pub enum TriggerPayload {
    IssueComment { comment: TriggerComment },
    PullRequestReview { review: TriggerReview },
    PullRequestReviewComment { comment: TriggerComment },
    Issues { issue_author: String },
    PullRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Raw trigger as observed by the hosting process, before validation.
pub struct RawTriggerContext {
    pub repository: String,
    pub entity_number: u64,
    pub event_name: String,
    pub event_action: Option<String>,
    pub is_pr: bool,
    pub payload: TriggerPayload,
    pub inputs: TriggerInputs,
}

#[derive(Debug, Deserialize)]
struct WebhookUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct WebhookComment {
    id: u64,
    #[serde(default)]
    body: Option<String>,
    user: WebhookUser,
}

#[derive(Debug, Deserialize)]
struct WebhookIssue {
    number: u64,
    user: WebhookUser,
    #[serde(default)]
    pull_request: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct WebhookPullRequest {
    number: u64,
}

#[derive(Debug, Deserialize)]
struct WebhookReview {
    #[serde(default)]
    body: Option<String>,
    user: WebhookUser,
}

#[derive(Debug, Deserialize)]
struct IssueCommentWebhook {
    issue: WebhookIssue,
    comment: WebhookComment,
}

#[derive(Debug, Deserialize)]
struct IssuesWebhook {
    #[serde(default)]
    action: Option<String>,
    issue: WebhookIssue,
}

#[derive(Debug, Deserialize)]
struct PullRequestWebhook {
    #[serde(default)]
    action: Option<String>,
    pull_request: WebhookPullRequest,
}

#[derive(Debug, Deserialize)]
struct PullRequestReviewWebhook {
    #[serde(default)]
    action: Option<String>,
    pull_request: WebhookPullRequest,
    review: WebhookReview,
}

#[derive(Debug, Deserialize)]
struct PullRequestReviewCommentWebhook {
    #[serde(default)]
    action: Option<String>,
    pull_request: WebhookPullRequest,
    comment: WebhookComment,
}

fn decode_webhook<'a, T: Deserialize<'a>>(
    kind: TriggerEventKind,
    payload: &'a Value,
) -> Result<T, TriggerContextError> {
    T::deserialize(payload).map_err(|error| TriggerContextError::InvalidPayload {
        event: kind.as_str().to_string(),
        message: error.to_string(),
    })
}

impl From<WebhookComment> for TriggerComment {
    fn from(comment: WebhookComment) -> Self {
        Self {
            id: comment.id,
            body: comment.body,
            author_login: comment.user.login,
        }
    }
}

impl RawTriggerContext {
    /// Builds a raw trigger from a GitHub webhook payload (`GITHUB_EVENT_PATH` contents).
    pub fn from_event_payload(
        repository: &str,
        event_name: &str,
        payload: &Value,
        inputs: TriggerInputs,
    ) -> Result<Self, TriggerContextError> {
        let kind = TriggerEventKind::parse(event_name)?;
        let (entity_number, is_pr, event_action, payload) = match kind {
            TriggerEventKind::IssueComment => {
                let webhook: IssueCommentWebhook = decode_webhook(kind, payload)?;
                (
                    webhook.issue.number,
                    webhook.issue.pull_request.is_some(),
                    None,
                    TriggerPayload::IssueComment {
                        comment: webhook.comment.into(),
                    },
                )
            }
            TriggerEventKind::Issues => {
                let webhook: IssuesWebhook = decode_webhook(kind, payload)?;
                (
                    webhook.issue.number,
                    false,
                    webhook.action,
                    TriggerPayload::Issues {
                        issue_author: webhook.issue.user.login,
                    },
                )
            }
            TriggerEventKind::PullRequest => {
                let webhook: PullRequestWebhook = decode_webhook(kind, payload)?;
                (
                    webhook.pull_request.number,
                    true,
                    webhook.action,
                    TriggerPayload::PullRequest,
                )
            }
            TriggerEventKind::PullRequestReview => {
                let webhook: PullRequestReviewWebhook = decode_webhook(kind, payload)?;
                (
                    webhook.pull_request.number,
                    true,
                    webhook.action,
                    TriggerPayload::PullRequestReview {
                        review: TriggerReview {
                            body: webhook.review.body,
                            author_login: webhook.review.user.login,
                        },
                    },
                )
            }
            TriggerEventKind::PullRequestReviewComment => {
                let webhook: PullRequestReviewCommentWebhook = decode_webhook(kind, payload)?;
                (
                    webhook.pull_request.number,
                    true,
                    webhook.action,
                    TriggerPayload::PullRequestReviewComment {
                        comment: webhook.comment.into(),
                    },
                )
            }
        };

        Ok(Self {
            repository: repository.to_string(),
            entity_number,
            event_name: kind.as_str().to_string(),
            event_action,
            is_pr,
            payload,
            inputs,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{
        RawTriggerContext, TriggerEventKind, TriggerInputs, TriggerPayload, TriggerReview,
    };
    use crate::trigger_error::TriggerContextError;

    #[test]
    fn unit_trigger_event_kind_parse_round_trips_known_names() {
        for name in [
            "pull_request_review_comment",
            "pull_request_review",
            "issue_comment",
            "issues",
            "pull_request",
        ] {
            let kind = TriggerEventKind::parse(name).expect("known event");
            assert_eq!(kind.as_str(), name);
        }
    }

    #[test]
    fn unit_trigger_event_kind_parse_rejects_unknown_names() {
        let error = TriggerEventKind::parse("push").expect_err("unsupported");
        assert_eq!(
            error,
            TriggerContextError::UnsupportedEventType("push".to_string())
        );
    }

    #[test]
    fn functional_from_event_payload_detects_pull_request_issue_comments() {
        let payload = json!({
            "action": "created",
            "issue": {
                "number": 12,
                "user": { "login": "alice" },
                "pull_request": { "url": "https://api.github.com/repos/o/r/pulls/12" }
            },
            "comment": {
                "id": 55,
                "body": "@claude fix the bug",
                "user": { "login": "bob" }
            }
        });
        let raw = RawTriggerContext::from_event_payload(
            "owner/repo",
            "issue_comment",
            &payload,
            TriggerInputs::default(),
        )
        .expect("raw context");
        assert!(raw.is_pr);
        assert_eq!(raw.entity_number, 12);
        assert_eq!(raw.event_action, None);
        match raw.payload {
            TriggerPayload::IssueComment { comment } => {
                assert_eq!(comment.id, 55);
                assert_eq!(comment.author_login, "bob");
                assert_eq!(comment.body.as_deref(), Some("@claude fix the bug"));
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn functional_from_event_payload_treats_plain_issue_comments_as_issues() {
        let payload = json!({
            "issue": { "number": 7, "user": { "login": "alice" } },
            "comment": { "id": 1, "body": "hi", "user": { "login": "bob" } }
        });
        let raw = RawTriggerContext::from_event_payload(
            "owner/repo",
            "issue_comment",
            &payload,
            TriggerInputs::default(),
        )
        .expect("raw context");
        assert!(!raw.is_pr);
        assert_eq!(raw.entity_number, 7);
    }

    #[test]
    fn integration_from_event_payload_keeps_missing_review_body_absent() {
        let payload = json!({
            "action": "submitted",
            "pull_request": { "number": 3 },
            "review": { "body": null, "user": { "login": "carol" } }
        });
        let raw = RawTriggerContext::from_event_payload(
            "owner/repo",
            "pull_request_review",
            &payload,
            TriggerInputs::default(),
        )
        .expect("raw context");
        assert_eq!(raw.event_action.as_deref(), Some("submitted"));
        assert_eq!(
            raw.payload,
            TriggerPayload::PullRequestReview {
                review: TriggerReview {
                    body: None,
                    author_login: "carol".to_string(),
                },
            }
        );
    }

    #[test]
    fn regression_from_event_payload_reports_shape_mismatch() {
        let payload = json!({ "issue": { "number": 1 } });
        let error = RawTriggerContext::from_event_payload(
            "owner/repo",
            "issues",
            &payload,
            TriggerInputs::default(),
        )
        .expect_err("missing user");
        assert!(matches!(
            error,
            TriggerContextError::InvalidPayload { ref event, .. } if event == "issues"
        ));
    }

    #[test]
    fn regression_from_event_payload_rejects_issue_comment_without_comment_id() {
        let payload = json!({
            "issue": { "number": 7, "user": { "login": "alice" } },
            "comment": { "body": "@claude help", "user": { "login": "bob" } }
        });
        let error = RawTriggerContext::from_event_payload(
            "owner/repo",
            "issue_comment",
            &payload,
            TriggerInputs::default(),
        )
        .expect_err("missing comment id");
        match error {
            TriggerContextError::InvalidPayload { event, message } => {
                assert_eq!(event, "issue_comment");
                assert!(message.contains("`id`"), "unexpected message: {message}");
            }
            other => panic!("expected invalid payload error, got {other:?}"),
        }
    }
}
