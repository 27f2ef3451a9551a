//! Shape of the data fetched from GitHub for one trigger, and its text rendering.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const NO_DESCRIPTION_PLACEHOLDER: &str = "No description provided";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// Enumerates the issue or pull request a trigger refers to.
pub enum TriggerSubject {
    #[serde(rename_all = "camelCase")]
    PullRequest {
        title: String,
        author: String,
        head_ref_name: String,
        base_ref_name: String,
        state: String,
        additions: u64,
        deletions: u64,
        total_commits: u64,
        changed_file_count: u64,
    },
    Issue {
        title: String,
        author: String,
        state: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchedComment {
    pub author: String,
    pub created_at: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Inline comment attached to a review.
pub struct FetchedReviewComment {
    pub path: String,
    #[serde(default)]
    pub line: Option<u64>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchedReview {
    pub author: String,
    pub submitted_at: String,
    pub state: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub comments: Vec<FetchedReviewComment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchedChangedFile {
    pub path: String,
    pub change_type: String,
    pub additions: u64,
    pub deletions: u64,
    pub sha: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Context bag produced by the fetcher; consumed read-only by the document assembler.
pub struct FetchedContext {
    pub subject: TriggerSubject,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub comments: Vec<FetchedComment>,
    #[serde(default)]
    pub reviews: Vec<FetchedReview>,
    #[serde(default)]
    pub changed_files: Vec<FetchedChangedFile>,
    #[serde(default)]
    pub image_url_map: BTreeMap<String, String>,
}

/// Replaces each downloaded image URL with its local path.
pub fn replace_image_urls(text: &str, image_url_map: &BTreeMap<String, String>) -> String {
    image_url_map
        .iter()
        .fold(text.to_string(), |rendered, (original_url, local_path)| {
            rendered.replace(original_url.as_str(), local_path)
        })
}

pub fn format_subject(subject: &TriggerSubject) -> String {
    match subject {
        TriggerSubject::PullRequest {
            title,
            author,
            head_ref_name,
            base_ref_name,
            state,
            additions,
            deletions,
            total_commits,
            changed_file_count,
        } => format!(
            "PR Title: {title}\nPR Author: {author}\nPR Branch: {head_ref_name} -> {base_ref_name}\nPR State: {state}\nPR Additions: {additions}\nPR Deletions: {deletions}\nTotal Commits: {total_commits}\nChanged Files: {changed_file_count} files"
        ),
        TriggerSubject::Issue {
            title,
            author,
            state,
        } => format!("Issue Title: {title}\nIssue Author: {author}\nIssue State: {state}"),
    }
}

pub fn format_body(body: Option<&str>, image_url_map: &BTreeMap<String, String>) -> String {
    match body.filter(|body| !body.is_empty()) {
        Some(body) => replace_image_urls(body, image_url_map),
        None => NO_DESCRIPTION_PLACEHOLDER.to_string(),
    }
}

pub fn format_comments(
    comments: &[FetchedComment],
    image_url_map: &BTreeMap<String, String>,
) -> String {
    comments
        .iter()
        .map(|comment| {
            format!(
                "[{} at {}]: {}",
                comment.author,
                comment.created_at,
                replace_image_urls(&comment.body, image_url_map)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn format_review_comments(
    reviews: &[FetchedReview],
    image_url_map: &BTreeMap<String, String>,
) -> String {
    reviews
        .iter()
        .map(|review| {
            let mut rendered = format!(
                "[Review by {} at {}]: {}",
                review.author, review.submitted_at, review.state
            );
            if let Some(body) = review.body.as_deref().filter(|body| !body.trim().is_empty()) {
                rendered.push('\n');
                rendered.push_str(&replace_image_urls(body, image_url_map));
            }
            for comment in &review.comments {
                let line = comment
                    .line
                    .map(|line| line.to_string())
                    .unwrap_or_else(|| "?".to_string());
                rendered.push_str(&format!(
                    "\n  [Comment on {}:{}]: {}",
                    comment.path,
                    line,
                    replace_image_urls(&comment.body, image_url_map)
                ));
            }
            rendered
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn format_changed_files(files: &[FetchedChangedFile]) -> String {
    files
        .iter()
        .map(|file| {
            format!(
                "- {} ({}) +{}/-{} SHA: {}",
                file.path, file.change_type, file.additions, file.deletions, file.sha
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
