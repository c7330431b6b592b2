//! Transform tool invocation
//!
//! The transform tool is an opaque executable that mutates files under the
//! workspace in place. We optionally download it first, hand it the
//! workspace and config coordinates as flags, and capture everything it
//! prints. Whether any file actually changed is judged later, at commit time.
//!
//! The invocation has no timeout; a hung tool blocks the run.

use crate::error::{Error, Result};
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info};

/// Inputs for one transform invocation
#[derive(Debug, Clone)]
pub struct TransformRequest<'a> {
    /// Workspace root handed to the tool via `-root`
    pub workspace: &'a Path,
    /// Tag label handed to the tool via `-tag`
    pub tag: &'a str,
    /// Local config path handed to the tool via `-conf`
    pub conf: &'a str,
    /// Remote config URL handed to the tool via `-conf_url`
    pub conf_url: &'a str,
    /// Local path of the tool binary (also the download target)
    pub tool: &'a str,
    /// Remote URL of the tool binary; empty means run the local file as-is
    pub tool_url: &'a str,
    /// Pass `-revert` to undo a previous replace run
    pub revert: bool,
}

/// Fetch the tool if needed, run it against the workspace, and return the
/// combined stdout and stderr.
///
/// A nonzero exit status becomes [`Error::Transform`] carrying the captured
/// output; exit zero is success even when the tool changed nothing.
pub async fn run_transform(req: &TransformRequest<'_>) -> Result<String> {
    if !req.tool_url.is_empty() {
        fetch_tool(req.tool_url, Path::new(req.tool)).await?;
    }

    let args = build_args(req);
    debug!(tool = req.tool, ?args, "invoking transform tool");

    let output = Command::new(req.tool)
        .args(&args)
        .output()
        .await
        .map_err(|e| Error::Transform {
            output: format!("failed to start {}: {e}", req.tool),
        })?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    if output.status.success() {
        Ok(combined)
    } else {
        Err(Error::Transform { output: combined })
    }
}

/// Flag layout expected by the tool: `-root`, `-tag`, `-conf`, `-conf_url`,
/// plus `-revert` when reverting.
fn build_args(req: &TransformRequest<'_>) -> Vec<String> {
    let mut args = vec![
        format!("-root={}", req.workspace.display()),
        format!("-tag={}", req.tag),
        format!("-conf={}", req.conf),
        format!("-conf_url={}", req.conf_url),
    ];
    if req.revert {
        args.push("-revert".to_string());
    }
    args
}

/// Download the tool binary to `dest` and mark it executable
async fn fetch_tool(url: &str, dest: &Path) -> Result<()> {
    let fetch_err = |detail: String| Error::Fetch {
        url: url.to_string(),
        detail,
    };

    info!(url, dest = %dest.display(), "downloading transform tool");

    let response = reqwest::get(url)
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(|e| fetch_err(e.to_string()))?;
    let body = response.bytes().await.map_err(|e| fetch_err(e.to_string()))?;

    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| fetch_err(e.to_string()))?;
        }
    }
    tokio::fs::write(dest, &body)
        .await
        .map_err(|e| fetch_err(e.to_string()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(dest, std::fs::Permissions::from_mode(0o755))
            .await
            .map_err(|e| fetch_err(e.to_string()))?;
    }

    Ok(())
}
