//! Run request and derived values
//!
//! A [`RunRequest`] is built once from the CLI flags and is read-only for the
//! rest of the run. Everything the pipeline derives from it (repository
//! coordinates, working branch name, commit record) lives here so the
//! derivations stay pure and testable.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use url::Url;

/// Fixed author name used for every commit this tool creates
pub const COMMIT_AUTHOR: &str = "replacer-bot";

/// Branch name marker inserted between the origin branch and the timestamp
const BRANCH_MARKER: &str = "-dev-replacer-";

/// Immutable input for one pipeline run
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Remote repository URL (http or https)
    pub repo_url: String,
    /// Username for basic auth; also becomes the commit author email
    pub username: String,
    /// Password or access token for basic auth
    pub password: String,
    /// Branch the transformation is based on
    pub origin_branch: String,
    /// Tag label substituted into the commit message
    pub tag: String,
    /// Root directory under which run workspaces are created
    pub save_path: PathBuf,
    /// Free-form fragment appended to the templated commit message
    pub commit_message: String,
    /// Local path of the transform tool (download target when a URL is set)
    pub replacer_file: String,
    /// Remote URL of the transform tool; empty means use the local file as-is
    pub replacer_url: String,
    /// Local config file path passed through to the tool
    pub replacer_conf: String,
    /// Remote config URL passed through to the tool
    pub replacer_conf_url: String,
    /// GitLab group id used to resolve the project
    pub group_id: u64,
    /// GitLab personal access token for the projects API
    pub gitlab_token: String,
    /// Revert a previous replace run instead of applying one
    pub revert: bool,
    /// Open the merge-request link in a browser when the run succeeds
    pub open_browser: bool,
}

impl RunRequest {
    /// Validate the request invariants before the pipeline starts.
    ///
    /// The repository URL must parse with a scheme and host, and the origin
    /// branch must be non-empty.
    pub fn validate(&self) -> Result<()> {
        if self.origin_branch.is_empty() {
            return Err(Error::InvalidRequest(
                "origin branch must not be empty".to_string(),
            ));
        }
        RepoInfo::parse(&self.repo_url)?;
        Ok(())
    }

    /// Derive the working branch name for a run started at `now`.
    ///
    /// Shape: `<origin>-dev-replacer-<YYYYMMDDHHMMSS>` (UTC), prefixed with
    /// `revert-` when reverting. Second granularity is the uniqueness
    /// guarantee; two runs in the same second collide.
    pub fn working_branch_at(&self, now: DateTime<Utc>) -> String {
        let stamp = now.format("%Y%m%d%H%M%S");
        let name = format!("{}{BRANCH_MARKER}{stamp}", self.origin_branch);
        if self.revert {
            format!("revert-{name}")
        } else {
            name
        }
    }

    /// Derive the working branch name from the current time
    pub fn working_branch(&self) -> String {
        self.working_branch_at(Utc::now())
    }

    /// Build the commit record for this run
    pub fn commit_record(&self) -> CommitRecord {
        let message = if self.revert {
            format!("chore(revert replace {}): {}", self.tag, self.commit_message)
        } else {
            format!("chore(replace {}): {}", self.tag, self.commit_message)
        };
        CommitRecord {
            author_name: COMMIT_AUTHOR.to_string(),
            author_email: self.username.clone(),
            message,
        }
    }
}

/// Author and message for the single commit a run creates
#[derive(Debug, Clone)]
pub struct CommitRecord {
    /// Author name (always [`COMMIT_AUTHOR`])
    pub author_name: String,
    /// Author email (the run's username)
    pub author_email: String,
    /// Fully templated commit message
    pub message: String,
}

/// Repository coordinates parsed from the remote URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoInfo {
    /// URL scheme, e.g. `https`
    pub scheme: String,
    /// Host, including the port when one is given
    pub host: String,
    /// Path-with-namespace, `.git` suffix and surrounding slashes trimmed
    pub full_path: String,
}

impl RepoInfo {
    /// Parse repository coordinates from a remote URL
    pub fn parse(repo_url: &str) -> Result<Self> {
        let parsed = Url::parse(repo_url).map_err(|e| Error::InvalidRepoUrl {
            url: repo_url.to_string(),
            reason: e.to_string(),
        })?;

        let host = parsed.host_str().ok_or_else(|| Error::InvalidRepoUrl {
            url: repo_url.to_string(),
            reason: "missing host".to_string(),
        })?;
        let host = parsed
            .port()
            .map_or_else(|| host.to_string(), |port| format!("{host}:{port}"));

        let full_path = parsed
            .path()
            .trim_end_matches(".git")
            .trim_matches('/')
            .to_string();

        Ok(Self {
            scheme: parsed.scheme().to_string(),
            host,
            full_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn request(revert: bool) -> RunRequest {
        RunRequest {
            repo_url: "https://gitlab.example.com/group/project.git".to_string(),
            username: "dev@example.com".to_string(),
            password: "secret".to_string(),
            origin_branch: "main".to_string(),
            tag: "v2".to_string(),
            save_path: PathBuf::from("./repo"),
            commit_message: "bump endpoints".to_string(),
            replacer_file: String::new(),
            replacer_url: String::new(),
            replacer_conf: String::new(),
            replacer_conf_url: String::new(),
            group_id: 42,
            gitlab_token: "token".to_string(),
            revert,
            open_browser: false,
        }
    }

    #[test]
    fn test_working_branch_shape() {
        let req = request(false);
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 17, 5, 31).unwrap();
        assert_eq!(req.working_branch_at(now), "main-dev-replacer-20240309170531");
    }

    #[test]
    fn test_working_branch_revert_prefix() {
        let req = request(true);
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 17, 5, 31).unwrap();
        assert_eq!(
            req.working_branch_at(now),
            "revert-main-dev-replacer-20240309170531"
        );
    }

    #[test]
    fn test_working_branch_timestamp_is_14_digits() {
        let req = request(false);
        let branch = req.working_branch();
        let stamp = branch.rsplit('-').next().unwrap();
        assert_eq!(stamp.len(), 14);
        assert!(stamp.chars().all(|c| c.is_ascii_digit()));
        assert!(branch.starts_with("main-dev-replacer-"));
    }

    #[test]
    fn test_commit_message_replace_template() {
        let record = request(false).commit_record();
        assert_eq!(record.message, "chore(replace v2): bump endpoints");
        assert_eq!(record.author_name, "replacer-bot");
        assert_eq!(record.author_email, "dev@example.com");
    }

    #[test]
    fn test_commit_message_revert_template() {
        let record = request(true).commit_record();
        assert_eq!(record.message, "chore(revert replace v2): bump endpoints");
    }

    #[test]
    fn test_parse_repo_info() {
        let info = RepoInfo::parse("https://gitlab.example.com/group/project.git").unwrap();
        assert_eq!(info.scheme, "https");
        assert_eq!(info.host, "gitlab.example.com");
        assert_eq!(info.full_path, "group/project");
    }

    #[test]
    fn test_parse_repo_info_nested_group_and_port() {
        let info = RepoInfo::parse("http://gitlab.local:8080/a/b/c.git").unwrap();
        assert_eq!(info.host, "gitlab.local:8080");
        assert_eq!(info.full_path, "a/b/c");
    }

    #[test]
    fn test_parse_repo_info_without_git_suffix() {
        let info = RepoInfo::parse("https://gitlab.example.com/group/project").unwrap();
        assert_eq!(info.full_path, "group/project");
    }

    #[test]
    fn test_parse_rejects_missing_host() {
        let err = RepoInfo::parse("not a url").unwrap_err();
        assert!(matches!(err, Error::InvalidRepoUrl { .. }));
    }

    #[test]
    fn test_validate_rejects_empty_branch() {
        let mut req = request(false);
        req.origin_branch = String::new();
        assert!(matches!(
            req.validate(),
            Err(Error::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_validate_accepts_good_request() {
        assert!(request(false).validate().is_ok());
    }
}
