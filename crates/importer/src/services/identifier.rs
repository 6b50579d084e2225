/// Host prefixes recognised in a repository URL.
const GITHUB_PREFIXES: [&str; 2] = ["https://github.com/", "https://www.github.com/"];

/// Turn a GitHub repository URL into its `owner/name` identifier.
///
/// Anything that does not carry one of the known prefixes is returned
/// unchanged; no validation is performed.
pub fn extract_repo_identifier(url: &str) -> String {
    GITHUB_PREFIXES
        .iter()
        .find_map(|prefix| url.strip_prefix(prefix))
        .unwrap_or(url)
        .to_string()
}
