//! Top-level pipeline run: stage, parse, then execute.

use crate::cli::args::Cli;
use crate::config::{load_config, FailurePolicy, PipelineConfig};
use crate::pipeline::{parse, Engine, InterruptFlag, OperationRegistry, Plan};
use crate::subprocess::SubprocessManager;
use crate::workspace::WorkspaceStager;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Execute one invocation of the tool.
pub async fn execute(cli: Cli, interrupt: InterruptFlag) -> Result<()> {
    let root = resolve_root(cli.root.as_deref())?;
    let mut config = load_config(&root, cli.config.as_deref()).await?;
    apply_overrides(&mut config, &cli)?;
    debug!(
        "Configuration: root={}, workspace={}, failure_policy={}",
        config.root.display(),
        config.workspace_root().display(),
        config.failure_policy
    );

    let workspace = WorkspaceStager::from_config(&config).stage()?;

    let registry = OperationRegistry::new();
    let plan = parse(cli.tokens.iter().cloned(), &registry, &workspace)?;

    if cli.dry_run {
        print_plan(&plan, cli.json)?;
        return Ok(());
    }

    let runner = SubprocessManager::production().runner();
    let mut engine = Engine::new(config, runner, tokio::io::stdout()).with_interrupt(interrupt);
    let report = engine.execute(&plan).await?;

    info!(
        "Finished: {} action(s) attempted, {} failed, {} skipped",
        report.attempted(),
        report.failure_count(),
        report.skipped_count()
    );

    match report.abort_error() {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

fn resolve_root(root: Option<&Path>) -> Result<PathBuf> {
    let root = match root {
        Some(root) => root.to_path_buf(),
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };
    std::fs::canonicalize(&root)
        .with_context(|| format!("Cannot access project root {}", root.display()))
}

/// Command-line flags win over the file and the environment.
fn apply_overrides(config: &mut PipelineConfig, cli: &Cli) -> Result<()> {
    if let Some(workspace) = &cli.workspace {
        config.workspace = if workspace.is_absolute() {
            workspace.clone()
        } else {
            std::env::current_dir()
                .context("Cannot determine current directory")?
                .join(workspace)
        };
    }
    if cli.fail_fast {
        config.failure_policy = FailurePolicy::Abort;
    }
    Ok(())
}

fn print_plan(plan: &Plan, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(plan)?);
        return Ok(());
    }

    println!("Workspace: {}", plan.workspace().display());
    for (index, action) in plan.actions.iter().enumerate() {
        println!("{:>3}. {}", index + 1, action);
    }
    Ok(())
}
