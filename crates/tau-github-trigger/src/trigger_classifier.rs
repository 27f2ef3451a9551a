use crate::trigger_normalizer::NormalizedCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Enumerates the coarse event categories rendered into `<event_type>`.
pub enum TriggerCategory {
    ReviewComment,
    PrReview,
    GeneralComment,
    IssueCreated,
    IssueAssigned,
    PullRequest,
}

impl TriggerCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReviewComment => "REVIEW_COMMENT",
            Self::PrReview => "PR_REVIEW",
            Self::GeneralComment => "GENERAL_COMMENT",
            Self::IssueCreated => "ISSUE_CREATED",
            Self::IssueAssigned => "ISSUE_ASSIGNED",
            Self::PullRequest => "PULL_REQUEST",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerClassification {
    pub category: TriggerCategory,
    pub description: String,
}

pub fn classify_trigger(command: &NormalizedCommand, trigger_phrase: &str) -> TriggerClassification {
    let (category, description) = match command {
        NormalizedCommand::PullRequestReviewComment { .. } => (
            TriggerCategory::ReviewComment,
            format!("PR review comment with '{trigger_phrase}'"),
        ),
        NormalizedCommand::PullRequestReview { .. } => (
            TriggerCategory::PrReview,
            format!("PR review with '{trigger_phrase}'"),
        ),
        NormalizedCommand::PullRequestComment { .. } | NormalizedCommand::IssueComment { .. } => (
            TriggerCategory::GeneralComment,
            format!("issue comment with '{trigger_phrase}'"),
        ),
        NormalizedCommand::IssueOpened { .. } => (
            TriggerCategory::IssueCreated,
            format!("new issue with '{trigger_phrase}' in body"),
        ),
        NormalizedCommand::IssueAssigned {
            assignee_trigger, ..
        } => (
            TriggerCategory::IssueAssigned,
            format!("issue assigned to '{assignee_trigger}'"),
        ),
        NormalizedCommand::PullRequest { action, .. } => (
            TriggerCategory::PullRequest,
            match action {
                Some(action) => format!("pull request {action}"),
                None => "pull request event".to_string(),
            },
        ),
    };
    TriggerClassification {
        category,
        description,
    }
}

#[cfg(test)]
mod tests {
    use super::{classify_trigger, TriggerCategory};
    use crate::trigger_normalizer::NormalizedCommand;

    #[test]
    fn unit_classify_general_comment_interpolates_trigger_phrase() {
        let command = NormalizedCommand::PullRequestComment {
            comment_id: 55,
            comment_body: "@claude fix the bug".to_string(),
            pr_number: 12,
            working_branch: None,
            default_branch: None,
        };
        let classification = classify_trigger(&command, "@claude");
        assert_eq!(classification.category, TriggerCategory::GeneralComment);
        assert_eq!(classification.category.as_str(), "GENERAL_COMMENT");
        assert_eq!(classification.description, "issue comment with '@claude'");
    }

    #[test]
    fn functional_classify_issue_events_by_action() {
        let opened = NormalizedCommand::IssueOpened {
            issue_number: 4,
            default_branch: "main".to_string(),
            working_branch: "claude/issue-4".to_string(),
        };
        let classification = classify_trigger(&opened, "/tau");
        assert_eq!(classification.category.as_str(), "ISSUE_CREATED");
        assert_eq!(classification.description, "new issue with '/tau' in body");

        let assigned = NormalizedCommand::IssueAssigned {
            issue_number: 4,
            default_branch: "main".to_string(),
            working_branch: "claude/issue-4".to_string(),
            assignee_trigger: "claude-bot".to_string(),
        };
        let classification = classify_trigger(&assigned, "/tau");
        assert_eq!(classification.category.as_str(), "ISSUE_ASSIGNED");
        assert_eq!(classification.description, "issue assigned to 'claude-bot'");
    }

    #[test]
    fn integration_classify_review_kinds() {
        let review = NormalizedCommand::PullRequestReview {
            pr_number: 1,
            comment_body: String::new(),
            working_branch: None,
            default_branch: None,
        };
        assert_eq!(classify_trigger(&review, "@claude").category.as_str(), "PR_REVIEW");

        let review_comment = NormalizedCommand::PullRequestReviewComment {
            pr_number: 1,
            comment_body: "@claude nit".to_string(),
            comment_id: None,
            working_branch: None,
            default_branch: None,
        };
        let classification = classify_trigger(&review_comment, "@claude");
        assert_eq!(classification.category.as_str(), "REVIEW_COMMENT");
        assert_eq!(
            classification.description,
            "PR review comment with '@claude'"
        );
    }

    #[test]
    fn regression_classify_pull_request_falls_back_without_action() {
        let mut command = NormalizedCommand::PullRequest {
            pr_number: 9,
            action: Some("synchronize".to_string()),
            working_branch: None,
            default_branch: None,
        };
        assert_eq!(
            classify_trigger(&command, "@claude").description,
            "pull request synchronize"
        );
        if let NormalizedCommand::PullRequest { action, .. } = &mut command {
            *action = None;
        }
        let classification = classify_trigger(&command, "@claude");
        assert_eq!(classification.category, TriggerCategory::PullRequest);
        assert_eq!(classification.description, "pull request event");
    }
}
