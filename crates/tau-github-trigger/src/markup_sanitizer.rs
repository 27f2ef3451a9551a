use std::sync::OnceLock;

use regex::Regex;

fn html_comment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)<!--.*?-->").expect("html comment pattern compiles"))
}

/// Removes `<!-- ... -->` blocks so hidden markup never reaches the agent.
pub fn strip_html_comments(content: &str) -> String {
    html_comment_pattern().replace_all(content, "").into_owned()
}
