use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub mod loader;
pub mod tools;


pub use loader::{load_config, parse_config};
pub use tools::{Tool, ToolCommand};

/// Name of the optional configuration file looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "atto.toml";

/// What the engine does when a collaborator exits nonzero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Record the failure and keep running later actions.
    #[default]
    Continue,
    /// Stop at the first failure.
    Abort,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "continue" => Ok(FailurePolicy::Continue),
            "abort" | "fail-fast" => Ok(FailurePolicy::Abort),
            other => Err(format!("unknown failure policy `{other}`")),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Continue => f.write_str("continue"),
            FailurePolicy::Abort => f.write_str("abort"),
        }
    }
}

/// A source directory copied into the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDir {
    pub source: PathBuf,
    pub dest: PathBuf,
}

impl StageDir {
    pub fn new(source: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
        }
    }
}

fn default_stages() -> Vec<StageDir> {
    vec![
        StageDir::new("libc", "libc"),
        StageDir::new("libc/incl", "incl"),
        StageDir::new("test", "test"),
        StageDir::new("circ", "circ"),
    ]
}

fn default_workspace() -> PathBuf {
    PathBuf::from("target").join("workspace")
}

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Project root: staged sources and tool scripts are relative to it.
    pub root: PathBuf,
    /// Workspace directory, relative to `root` unless absolute.
    pub workspace: PathBuf,
    pub failure_policy: FailurePolicy,
    pub stages: Vec<StageDir>,
    pub tools: BTreeMap<Tool, ToolCommand>,
}

impl PipelineConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            workspace: default_workspace(),
            failure_policy: FailurePolicy::default(),
            stages: default_stages(),
            tools: Tool::ALL
                .into_iter()
                .map(|tool| (tool, tool.default_command()))
                .collect(),
        }
    }

    pub fn with_workspace(mut self, workspace: impl Into<PathBuf>) -> Self {
        self.workspace = workspace.into();
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_stages(mut self, stages: Vec<StageDir>) -> Self {
        self.stages = stages;
        self
    }

    pub fn with_tool(mut self, tool: Tool, command: ToolCommand) -> Self {
        self.tools.insert(tool, command);
        self
    }

    /// Absolute-or-root-relative path of the workspace directory.
    pub fn workspace_root(&self) -> PathBuf {
        self.root.join(&self.workspace)
    }

    pub fn tool_command(&self, tool: Tool) -> ToolCommand {
        self.tools
            .get(&tool)
            .cloned()
            .unwrap_or_else(|| tool.default_command())
    }

    /// Apply `ATTO_*` overrides through `lookup`.
    pub fn merge_env<F>(&mut self, lookup: F) -> Result<(), String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(workspace) = lookup("ATTO_WORKSPACE") {
            self.workspace = PathBuf::from(workspace);
        }

        if let Some(policy) = lookup("ATTO_FAILURE_POLICY") {
            self.failure_policy = policy.parse()?;
        }

        for tool in Tool::ALL {
            if let Some(line) = lookup(&tool.env_var()) {
                let command = ToolCommand::parse(&line)
                    .map_err(|e| format!("{}: {}", tool.env_var(), e))?;
                self.tools.insert(tool, command);
            }
        }

        Ok(())
    }

    pub fn merge_env_vars(&mut self) -> Result<(), String> {
        self.merge_env(|key| std::env::var(key).ok())
    }

    /// Default config file location for a project root.
    pub fn default_file(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE_NAME)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new(".")
    }
}
