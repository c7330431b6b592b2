//! Best-effort browser launching
//!
//! Opening the merge-request link is a convenience; failure here never
//! changes the outcome of a run, the caller only logs it.

use crate::error::{Error, Result};
use tokio::process::Command;

/// Open `url` in the default browser via the platform opener
pub async fn open(url: &str) -> Result<()> {
    let mut cmd = opener_command(url);
    let status = cmd
        .status()
        .await
        .map_err(|e| Error::Browser(e.to_string()))?;

    if status.success() {
        Ok(())
    } else {
        Err(Error::Browser(format!("opener exited with {status}")))
    }
}

#[cfg(target_os = "macos")]
fn opener_command(url: &str) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(url);
    cmd
}

#[cfg(target_os = "windows")]
fn opener_command(url: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", "", url]);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener_command(url: &str) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(url);
    cmd
}
