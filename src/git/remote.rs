//! Repository identity and clone URL derivation from remote URIs.

use url::Url;

use crate::error::ContextError;

/// Path segments that end the repository part of a hosted URL.
const ROUTE_MARKERS: &[&str] = &[
    "-",
    "pull",
    "pulls",
    "merge_requests",
    "tree",
    "blob",
    "commit",
];

/// Extracts the `owner/repo` identity from a remote or pull request URI.
///
/// Accepts HTTPS and `ssh://` URLs, scp-like `git@host:owner/repo.git`
/// remotes and pull request pages such as
/// `https://github.com/owner/repo/pull/12`. Nested groups are kept
/// (`group/sub/repo`).
pub fn repo_identity(uri: &str) -> Result<String, ContextError> {
    let invalid = || ContextError::InvalidIdentity(uri.to_string());
    let (_, path) = split_host_path(uri).ok_or_else(invalid)?;

    let mut segments: Vec<&str> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .take_while(|s| !ROUTE_MARKERS.contains(s))
        .collect();
    if let Some(last) = segments.pop() {
        segments.push(last.strip_suffix(".git").unwrap_or(last));
    }
    if segments.len() < 2 || segments.iter().any(|s| s.is_empty()) {
        return Err(invalid());
    }

    Ok(segments.join("/"))
}

/// Builds an HTTPS clone URL for a pull request page.
pub fn clone_url_for(pr_url: &str) -> Result<String, ContextError> {
    let identity = repo_identity(pr_url)?;
    let (host, _) =
        split_host_path(pr_url).ok_or_else(|| ContextError::InvalidIdentity(pr_url.to_string()))?;
    Ok(format!("https://{host}/{identity}.git"))
}

/// Splits a remote URI into host and path.
fn split_host_path(uri: &str) -> Option<(String, String)> {
    let uri = uri.trim();
    if let Ok(url) = Url::parse(uri) {
        if url.scheme() == "file" {
            return None;
        }
        let host = url.host_str()?.to_string();
        return Some((host, url.path().to_string()));
    }

    // scp-like syntax: [user@]host:path
    let (authority, path) = uri.split_once(':')?;
    let host = authority.rsplit('@').next()?;
    if host.is_empty() || host.contains('/') || path.starts_with("//") {
        return None;
    }
    Some((host.to_string(), path.to_string()))
}
