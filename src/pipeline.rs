//! The mutation-and-publish pipeline
//!
//! One run walks a fixed sequence: prepare workspace, clone, branch,
//! transform, commit, push, resolve the project id, build the
//! merge-request link. The first failing stage aborts the run; nothing is
//! retried and nothing is rolled back. Whatever a failed run left on disk
//! or on the remote stays there for inspection.

use crate::browser;
use crate::error::Result;
use crate::gitlab::{GitLabClient, merge_request_url};
use crate::repo::{BasicAuth, GitRepo};
use crate::request::{RepoInfo, RunRequest};
use crate::transform::{TransformRequest, run_transform};
use crate::workspace;
use tracing::{info, warn};

/// Execute one full run and return the merge-request link
pub async fn run(request: &RunRequest) -> Result<String> {
    request.validate()?;

    let repo_info = RepoInfo::parse(&request.repo_url)?;
    let working_branch = request.working_branch();
    let auth = BasicAuth {
        username: request.username.clone(),
        password: request.password.clone(),
    };

    let ws = workspace::prepare(&request.save_path, &repo_info.full_path)?;
    info!(workspace = %ws.display(), "workspace ready");

    info!(url = %request.repo_url, branch = %request.origin_branch, "cloning");
    let repo = GitRepo::clone(&request.repo_url, &ws, &request.origin_branch, &auth).await?;

    info!(branch = %working_branch, "creating working branch");
    repo.create_branch(&working_branch).await?;

    let transform = TransformRequest {
        workspace: repo.root(),
        tag: &request.tag,
        conf: &request.replacer_conf,
        conf_url: &request.replacer_conf_url,
        tool: &request.replacer_file,
        tool_url: &request.replacer_url,
        revert: request.revert,
    };
    let tool_output = run_transform(&transform).await?;
    info!(output = %tool_output, "transform tool finished");

    let hash = repo.commit_all(&request.commit_record()).await?;
    info!(commit = %hash, "commit created");

    repo.push(&working_branch).await?;

    info!(url = %request.repo_url, "remote repository");
    info!(path = %ws.display(), "local repository");
    info!(branch = %working_branch, "new branch");

    let gitlab = GitLabClient::new(&repo_info.scheme, &repo_info.host, &request.gitlab_token);
    let project_id = gitlab
        .resolve_project_id(request.group_id, &repo_info.full_path)
        .await?;
    info!(project_id, "resolved project");

    let link = merge_request_url(
        &repo_info.scheme,
        &repo_info.host,
        &repo_info.full_path,
        &working_branch,
        &request.origin_branch,
        project_id,
    );
    info!(
        link = %link,
        "if the browser does not open automatically, visit this link to create the merge request"
    );

    if request.open_browser {
        if let Err(e) = browser::open(&link).await {
            warn!(error = %e, "could not open browser");
        }
    }

    Ok(link)
}
