use super::operation::Operation;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// A deferred operation with its filenames already resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    pub operation: Operation,
    pub inputs: Vec<PathBuf>,
    pub outputs: Vec<PathBuf>,
}

impl Action {
    pub fn new(operation: Operation, inputs: Vec<PathBuf>, outputs: Vec<PathBuf>) -> Self {
        Self {
            operation,
            inputs,
            outputs,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.operation)?;
        for input in &self.inputs {
            write!(f, " {}", input.display())?;
        }
        if !self.outputs.is_empty() {
            write!(f, " ->")?;
            for output in &self.outputs {
                write!(f, " {}", output.display())?;
            }
        }
        Ok(())
    }
}

/// Ordered actions produced by a successful parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub workspace: PathBuf,
    pub actions: Vec<Action>,
}

impl Plan {
    pub fn new(workspace: impl Into<PathBuf>, actions: Vec<Action>) -> Self {
        Self {
            workspace: workspace.into(),
            actions,
        }
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
