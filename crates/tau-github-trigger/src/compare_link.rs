pub const DEFAULT_GITHUB_SERVER_URL: &str = "https://github.com";

/// Percent-encodes everything outside the RFC 3986 unreserved set; spaces become `%20`.
pub fn percent_encode_component(value: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut encoded = String::with_capacity(value.len());
    for byte in value.as_bytes() {
        let is_unreserved = matches!(
            byte,
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~'
        );
        if is_unreserved {
            encoded.push(*byte as char);
        } else {
            encoded.push('%');
            encoded.push(HEX[(byte >> 4) as usize] as char);
            encoded.push(HEX[(byte & 0x0F) as usize] as char);
        }
    }
    encoded
}

/// Compare path `<server>/<repo>/compare/<base>...<head>`.
///
/// Branch names are interpolated as-is; GitHub resolves `/` in branch names
/// inside the compare range.
pub fn compare_url(
    server_url: &str,
    repository: &str,
    default_branch: &str,
    working_branch: &str,
) -> String {
    format!(
        "{}/{repository}/compare/{default_branch}...{working_branch}",
        server_url.trim_end_matches('/')
    )
}

/// Prefilled pull-request creation link with encoded title and body.
pub fn build_compare_link(
    server_url: &str,
    repository: &str,
    default_branch: &str,
    working_branch: &str,
    title: &str,
    body: &str,
) -> String {
    format!(
        "{}?quick_pull=1&title={}&body={}",
        compare_url(server_url, repository, default_branch, working_branch),
        percent_encode_component(title),
        percent_encode_component(body)
    )
}
