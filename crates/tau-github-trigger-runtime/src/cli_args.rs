use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "tau-github-trigger",
    about = "Builds the agent instruction document and tool lists for a GitHub trigger",
    version
)]
/// Flags and environment consumed when preparing one GitHub trigger run.
pub struct Cli {
    #[arg(
        long,
        env = "GITHUB_REPOSITORY",
        help = "Repository full name in owner/name format"
    )]
    pub repository: String,

    #[arg(
        long = "event-name",
        env = "GITHUB_EVENT_NAME",
        help = "GitHub webhook event name that started the workflow"
    )]
    pub event_name: String,

    #[arg(
        long = "event-path",
        env = "GITHUB_EVENT_PATH",
        help = "Path to the webhook payload JSON"
    )]
    pub event_path: PathBuf,

    #[arg(
        long = "fetched-context-path",
        env = "TAU_FETCHED_CONTEXT_PATH",
        help = "Path to the JSON context bag produced by the GitHub data fetcher"
    )]
    pub fetched_context_path: PathBuf,

    #[arg(
        long = "server-url",
        env = "GITHUB_SERVER_URL",
        default_value = "https://github.com",
        help = "GitHub server URL used for pull-request creation links"
    )]
    pub server_url: String,

    #[arg(
        long = "runner-temp",
        env = "RUNNER_TEMP",
        default_value = "/tmp",
        help = "Directory under which claude-prompts/claude-prompt.txt is written"
    )]
    pub runner_temp: PathBuf,

    #[arg(
        long = "github-env",
        env = "GITHUB_ENV",
        help = "Workflow environment file receiving ALLOWED_TOOLS and DISALLOWED_TOOLS; stdout when unset"
    )]
    pub github_env: Option<PathBuf>,

    #[arg(
        long = "claude-comment-id",
        env = "CLAUDE_COMMENT_ID",
        help = "Id of the tracking comment the agent updates"
    )]
    pub claude_comment_id: u64,

    #[arg(
        long = "default-branch",
        env = "DEFAULT_BRANCH",
        help = "Repository default branch"
    )]
    pub default_branch: Option<String>,

    #[arg(
        long = "claude-branch",
        env = "CLAUDE_BRANCH",
        help = "Working branch created for this run, when any"
    )]
    pub claude_branch: Option<String>,

    #[arg(
        long = "trigger-phrase",
        env = "TRIGGER_PHRASE",
        help = "Phrase that triggers the agent (defaults to @claude)"
    )]
    pub trigger_phrase: Option<String>,

    #[arg(
        long = "assignee-trigger",
        env = "ASSIGNEE_TRIGGER",
        help = "Username whose assignment to an issue triggers the agent"
    )]
    pub assignee_trigger: Option<String>,

    #[arg(
        long = "allowed-tools",
        env = "ALLOWED_TOOLS",
        help = "Extra comma-separated tools appended to the allow list verbatim"
    )]
    pub allowed_tools: Option<String>,

    #[arg(
        long = "disallowed-tools",
        env = "DISALLOWED_TOOLS",
        help = "Extra comma-separated tools appended to the deny list verbatim"
    )]
    pub disallowed_tools: Option<String>,

    #[arg(
        long = "custom-instructions",
        env = "CUSTOM_INSTRUCTIONS",
        help = "Instructions appended to the end of the document"
    )]
    pub custom_instructions: Option<String>,

    #[arg(
        long = "direct-prompt",
        env = "DIRECT_PROMPT",
        help = "Instruction passed directly by the workflow instead of a comment"
    )]
    pub direct_prompt: Option<String>,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::Cli;

    #[test]
    fn unit_cli_parses_required_flags_and_defaults() {
        let cli = Cli::try_parse_from([
            "tau-github-trigger",
            "--repository",
            "owner/repo",
            "--event-name",
            "issue_comment",
            "--event-path",
            "/tmp/event.json",
            "--fetched-context-path",
            "/tmp/context.json",
            "--claude-comment-id",
            "42",
        ])
        .expect("cli");
        assert_eq!(cli.repository, "owner/repo");
        assert_eq!(cli.claude_comment_id, 42);
        assert_eq!(cli.server_url, "https://github.com");
        assert_eq!(cli.trigger_phrase, None);
    }

    #[test]
    fn regression_cli_rejects_non_numeric_comment_id() {
        let error = Cli::try_parse_from([
            "tau-github-trigger",
            "--repository",
            "owner/repo",
            "--event-name",
            "issues",
            "--event-path",
            "/tmp/event.json",
            "--fetched-context-path",
            "/tmp/context.json",
            "--claude-comment-id",
            "abc",
        ])
        .expect_err("invalid id");
        assert!(error.to_string().contains("abc"));
    }
}
