//! replacer-bot CLI
//!
//! `run` executes the full mutation-and-publish pipeline; `invoke` runs only
//! the transform tool against an existing workspace.

use clap::{Args, Parser, Subcommand};
use replacer_bot::error::Result;
use replacer_bot::pipeline;
use replacer_bot::request::RunRequest;
use replacer_bot::transform::{TransformRequest, run_transform};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "replacer-bot")]
#[command(about = "Clone, transform, push, and open a GitLab merge request")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: clone, transform, commit, push, link
    Run(RunArgs),

    /// Run only the transform tool against a workspace
    Invoke(InvokeArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Git repository URL
    #[arg(long)]
    repo_url: String,

    /// GitLab username
    #[arg(long)]
    username: String,

    /// GitLab password or access token
    #[arg(long)]
    password: String,

    /// Origin branch the transformation is based on
    #[arg(long)]
    branch: String,

    /// Tag name substituted into the commit message
    #[arg(long, default_value = "")]
    tag: String,

    /// Workspace save directory
    #[arg(long, default_value = "./repo")]
    work_dir: PathBuf,

    /// Commit message fragment
    #[arg(long, default_value = "")]
    commit_message: String,

    /// Local path of the replacer tool
    #[arg(long, default_value = "")]
    replacer_file: String,

    /// Remote URL of the replacer tool
    #[arg(long, default_value = "")]
    replacer_url: String,

    /// Local config file of the replacer tool
    #[arg(long, default_value = "")]
    replacer_conf: String,

    /// Remote config URL of the replacer tool
    #[arg(long, default_value = "")]
    replacer_conf_url: String,

    /// GitLab group id, see /api/v4/groups
    #[arg(long)]
    gitlab_group_id: u64,

    /// GitLab personal access token
    #[arg(long)]
    gitlab_token: String,

    /// Revert the replace operation
    #[arg(long)]
    revert: bool,

    /// Do not open the merge-request link in a browser
    #[arg(long)]
    no_browser: bool,
}

#[derive(Args)]
struct InvokeArgs {
    /// Root workspace the tool mutates
    #[arg(long, default_value = "./")]
    root: PathBuf,

    /// Tag name
    #[arg(long, default_value = "")]
    tag: String,

    /// Local path of the replacer tool
    #[arg(long, default_value = "")]
    replacer_file: String,

    /// Remote URL of the replacer tool
    #[arg(long, default_value = "")]
    replacer_url: String,

    /// Local config file of the replacer tool
    #[arg(long, default_value = "")]
    replacer_conf: String,

    /// Remote config URL of the replacer tool
    #[arg(long, default_value = "")]
    replacer_conf_url: String,

    /// Revert the replace operations
    #[arg(long)]
    revert: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Commands::Run(args) => run_pipeline(args).await,
        Commands::Invoke(args) => invoke_tool(&args).await,
    };

    if let Err(e) = outcome {
        error!(error = %e, "run failed");
        std::process::exit(1);
    }
}

async fn run_pipeline(args: RunArgs) -> Result<()> {
    let request = RunRequest {
        repo_url: args.repo_url,
        username: args.username,
        password: args.password,
        origin_branch: args.branch,
        tag: args.tag,
        save_path: args.work_dir,
        commit_message: args.commit_message,
        replacer_file: args.replacer_file,
        replacer_url: args.replacer_url,
        replacer_conf: args.replacer_conf,
        replacer_conf_url: args.replacer_conf_url,
        group_id: args.gitlab_group_id,
        gitlab_token: args.gitlab_token,
        revert: args.revert,
        open_browser: !args.no_browser,
    };

    pipeline::run(&request).await?;
    Ok(())
}

async fn invoke_tool(args: &InvokeArgs) -> Result<()> {
    let request = TransformRequest {
        workspace: &args.root,
        tag: &args.tag,
        conf: &args.replacer_conf,
        conf_url: &args.replacer_conf_url,
        tool: &args.replacer_file,
        tool_url: &args.replacer_url,
        revert: args.revert,
    };

    let output = run_transform(&request).await?;
    info!(output = %output, "transform tool finished");
    Ok(())
}
