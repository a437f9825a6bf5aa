use super::{FailurePolicy, PipelineConfig, StageDir, Tool, ToolCommand};
use crate::error::{PipelineError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// On-disk layout of `atto.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    workspace: Option<PathBuf>,
    failure_policy: Option<FailurePolicy>,
    #[serde(rename = "stage")]
    stages: Option<Vec<StageDir>>,
    #[serde(default)]
    tools: BTreeMap<String, ToolCommand>,
}

/// Build a config from TOML text, layered over the defaults.
pub fn parse_config(root: &Path, content: &str) -> Result<PipelineConfig> {
    let file: ConfigFile =
        toml::from_str(content).map_err(|e| PipelineError::Config(e.to_string()))?;

    let mut config = PipelineConfig::new(root);

    if let Some(workspace) = file.workspace {
        config.workspace = workspace;
    }
    if let Some(policy) = file.failure_policy {
        config.failure_policy = policy;
    }
    if let Some(stages) = file.stages {
        config.stages = stages;
    }
    for (name, command) in file.tools {
        let tool = Tool::from_name(&name)
            .ok_or_else(|| PipelineError::Config(format!("unknown tool `{name}`")))?;
        config.tools.insert(tool, command);
    }

    Ok(config)
}

/// Load configuration for `root`.
///
/// An explicit path must exist. Otherwise `<root>/atto.toml` is used when
/// present, and built-in defaults when not. `ATTO_*` environment overrides
/// are applied last.
pub async fn load_config(root: &Path, explicit: Option<&Path>) -> Result<PipelineConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let candidate = PipelineConfig::default_file(root);
            candidate.exists().then_some(candidate)
        }
    };

    let mut config = match path {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            let content = fs::read_to_string(&path).await.map_err(|e| {
                PipelineError::Config(format!("cannot read {}: {}", path.display(), e))
            })?;
            parse_config(root, &content)?
        }
        None => {
            debug!("No configuration file, using defaults");
            PipelineConfig::new(root)
        }
    };

    config.merge_env_vars().map_err(PipelineError::Config)?;

    Ok(config)
}
