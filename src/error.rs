//! Error types for replacer-bot
//!
//! Every pipeline stage has its own error kind so a failed run names the
//! stage that broke. All errors are terminal for the run; nothing is retried.

use thiserror::Error;

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// All errors that can occur during a run
#[derive(Debug, Error)]
pub enum Error {
    /// Run input failed validation before the pipeline started
    #[error("invalid run request: {0}")]
    InvalidRequest(String),

    /// The repository URL could not be parsed or is missing scheme/host
    #[error("invalid repository url {url}: {reason}")]
    InvalidRepoUrl {
        /// The URL as supplied
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// The workspace root or the unique run directory could not be created
    #[error("workspace setup failed under {root}: {detail}")]
    Workspace {
        /// The configured save-path root
        root: String,
        /// Underlying failure
        detail: String,
    },

    /// Cloning the origin branch failed
    #[error("clone of {url} failed: {detail}")]
    Clone {
        /// Repository URL (without credentials)
        url: String,
        /// Combined git diagnostics
        detail: String,
    },

    /// Creating or switching to the working branch failed
    #[error("checkout of branch {branch} failed: {detail}")]
    Checkout {
        /// The working branch name
        branch: String,
        /// Combined git diagnostics
        detail: String,
    },

    /// Downloading the transform tool failed
    #[error("fetching {url} failed: {detail}")]
    Fetch {
        /// The remote tool URL
        url: String,
        /// Underlying failure
        detail: String,
    },

    /// The transform tool exited nonzero (or could not be started)
    #[error("transform tool failed: {output}")]
    Transform {
        /// Combined stdout and stderr captured from the tool
        output: String,
    },

    /// Committing the staged changes failed, including the empty-diff case
    #[error("commit failed: {0}")]
    Commit(String),

    /// Pushing the working branch to the remote failed
    #[error("push of branch {branch} failed: {detail}")]
    Push {
        /// The working branch name
        branch: String,
        /// Combined git diagnostics
        detail: String,
    },

    /// The GitLab API call failed (transport, non-2xx status, or bad JSON)
    #[error("gitlab api error: {0}")]
    Api(String),

    /// No project in the group matched the repository path
    #[error("no project matching {path} in group {group}")]
    ProjectNotFound {
        /// The GitLab group id that was searched
        group: u64,
        /// The repository path-with-namespace we looked for
        path: String,
    },

    /// The browser could not be opened; the run itself is unaffected
    #[error("failed to open browser: {0}")]
    Browser(String),
}
