mod output;
mod workspace;

use anyhow::Context;
use clap::Parser;
use filer_core::config::{ActionInputs, RunConfig};
use filer_core::context::{TemplateContext, WorkflowInfo};
use filer_core::emit::Outputs;
use filer_core::github::{GitHubClient, DEFAULT_API_URL};
use filer_core::store::Store;
use filer_core::{action, io, FilerError};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "filer",
    about = "Create, update or report an issue rendered from a front-matter template",
    version
)]
struct Cli {
    /// Template path, relative to the workspace
    #[arg(long, env = "INPUT_FILENAME")]
    filename: Option<String>,

    /// Comma-separated assignees; replaces the template's list
    #[arg(long, env = "INPUT_ASSIGNEES")]
    assignees: Option<String>,

    /// Milestone number; replaces the template's value
    #[arg(long, env = "INPUT_MILESTONE")]
    milestone: Option<String>,

    /// Which issues to search for a match: open, closed or all
    #[arg(long, env = "INPUT_SEARCH_EXISTING")]
    search_existing: Option<String>,

    /// true updates a matching issue, false only reports it
    #[arg(long, env = "INPUT_UPDATE_EXISTING")]
    update_existing: Option<String>,

    /// API token (falls back to GITHUB_TOKEN)
    #[arg(long, env = "INPUT_GITHUB-TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Target repository as owner/repo
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repo: Option<String>,

    /// Directory the template path is resolved against (default: cwd)
    #[arg(long, env = "GITHUB_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// REST API root [default: https://api.github.com]
    #[arg(long, env = "GITHUB_API_URL")]
    api_url: Option<String>,

    /// Event payload exposed to templates as `payload`
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: Option<PathBuf>,

    /// File the step outputs are appended to
    #[arg(long, env = "GITHUB_OUTPUT")]
    output_file: Option<PathBuf>,

    /// Print outputs as JSON
    #[arg(long, short = 'j')]
    json: bool,
}

impl Cli {
    fn inputs(&self) -> ActionInputs {
        ActionInputs {
            filename: self.filename.clone(),
            assignees: self.assignees.clone(),
            milestone: self.milestone.clone(),
            search_existing: self.search_existing.clone(),
            update_existing: self.update_existing.clone(),
            repository: self.repo.clone(),
        }
    }

    fn token(&self) -> Option<String> {
        self.token
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| std::env::var("GITHUB_TOKEN").ok())
            .filter(|t| !t.is_empty())
    }

    fn api_url(&self) -> &str {
        self.api_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_API_URL)
    }

    fn output_file(&self) -> Option<&Path> {
        self.output_file
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

fn execute(cli: &Cli, cfg: &RunConfig) -> anyhow::Result<Outputs> {
    let env: BTreeMap<String, String> = std::env::vars().collect();
    let event_path = cli.event_path.as_deref().filter(|p| !p.as_os_str().is_empty());
    let workflow = WorkflowInfo::from_env(&env).with_payload(io::read_event_payload(event_path));
    let ctx = TemplateContext::new(env, chrono::Utc::now(), cfg.repo.clone(), workflow);

    let client = GitHubClient::new(cli.api_url(), cli.token(), cfg.repo.clone())?;
    let root = workspace::resolve_workspace(cli.workspace.as_deref());
    let outputs = action::run(cfg, &root, &ctx, Store::from_client(&client))?;

    if let Some(path) = cli.output_file() {
        io::write_outputs(path, &outputs)
            .with_context(|| format!("failed to write outputs to {}", path.display()))?;
    }
    if cli.json {
        output::print_json(&outputs)?;
    } else if cli.output_file().is_none() {
        output::print_pairs(&outputs);
    }
    Ok(outputs)
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(false)
        .init();

    // Inputs are validated before anything touches the filesystem or network.
    let result = cli
        .inputs()
        .validate()
        .map_err(anyhow::Error::from)
        .and_then(|cfg| execute(&cli, &cfg));

    if let Err(e) = result {
        if let Some(err) = e.downcast_ref::<FilerError>() {
            for line in err.diagnostics() {
                tracing::error!("{line}");
            }
        }
        output::print_failure(&output::failure_message(&e));
        std::process::exit(1);
    }
}
