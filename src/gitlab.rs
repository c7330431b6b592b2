//! GitLab project resolution and merge-request link building

use crate::error::{Error, Result};
use reqwest::Client;
use serde::Deserialize;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// GitLab API client using reqwest
pub struct GitLabClient {
    client: Client,
    base_url: String,
    token: String,
}

/// A project record from the group projects API; only the fields we match
/// on are kept.
#[derive(Debug, Deserialize)]
struct Project {
    id: i64,
    path_with_namespace: String,
}

impl GitLabClient {
    /// Create a client for `<scheme>://<host>/api/v4`
    pub fn new(scheme: &str, host: &str, token: &str) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: format!("{scheme}://{host}/api/v4"),
            token: token.to_string(),
        }
    }

    /// Resolve the numeric project id for `full_path` within a group.
    ///
    /// Fetches the group's project list (first page only) and returns the id
    /// of the first record whose `path_with_namespace` equals `full_path`
    /// case-insensitively. Group membership can change between runs, so the
    /// list is fetched fresh every time.
    pub async fn resolve_project_id(&self, group_id: u64, full_path: &str) -> Result<i64> {
        let url = format!("{}/groups/{group_id}/projects", self.base_url);

        let projects: Vec<Project> = self
            .client
            .get(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .send()
            .await
            .map_err(|e| Error::Api(e.to_string()))?
            .error_for_status()
            .map_err(|e| Error::Api(e.to_string()))?
            .json()
            .await
            .map_err(|e| Error::Api(e.to_string()))?;

        let wanted = full_path.to_lowercase();
        let id = projects
            .iter()
            .find(|p| p.path_with_namespace.to_lowercase() == wanted)
            .map(|p| p.id);

        match id {
            Some(id) if id > 0 => Ok(id),
            _ => Err(Error::ProjectNotFound {
                group: group_id,
                path: full_path.to_string(),
            }),
        }
    }
}

/// Build the pre-filled new-merge-request URL for the pushed branch.
///
/// Pure formatter. The literal `[` and `]` in the query parameter names are
/// replaced with `%5B`/`%5D` as a fixed post-processing step; nothing else is
/// escaped. Branch names this tool produces are safe by construction.
pub fn merge_request_url(
    scheme: &str,
    host: &str,
    full_path: &str,
    source_branch: &str,
    target_branch: &str,
    project_id: i64,
) -> String {
    let url = format!(
        "{scheme}://{host}/{full_path}/merge_requests/new\
         ?utf8=✓\
         &merge_request[source_project_id]={project_id}\
         &merge_request[source_branch]={source_branch}\
         &merge_request[target_project_id]={project_id}\
         &merge_request[target_branch]={target_branch}"
    );
    url.replace('[', "%5B").replace(']', "%5D")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_request_url_format() {
        let url = merge_request_url(
            "https",
            "gitlab.example.com",
            "group/project",
            "main-dev-replacer-20240309170531",
            "main",
            7,
        );
        assert_eq!(
            url,
            "https://gitlab.example.com/group/project/merge_requests/new\
             ?utf8=✓\
             &merge_request%5Bsource_project_id%5D=7\
             &merge_request%5Bsource_branch%5D=main-dev-replacer-20240309170531\
             &merge_request%5Btarget_project_id%5D=7\
             &merge_request%5Btarget_branch%5D=main"
        );
    }

    #[test]
    fn test_merge_request_url_is_deterministic() {
        let build = || merge_request_url("https", "gitlab.com", "g/p", "src", "dst", 1);
        assert_eq!(build(), build());
    }

    #[test]
    fn test_merge_request_url_bracket_encoding() {
        let url = merge_request_url("https", "gitlab.com", "g/p", "src", "dst", 1);
        assert_eq!(url.matches("%5B").count(), 4);
        assert_eq!(url.matches("%5D").count(), 4);
        assert!(!url.contains('['));
        assert!(!url.contains(']'));
    }
}
