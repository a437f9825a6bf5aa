use crate::error::{PipelineError, Result};
use std::path::PathBuf;

/// Pending pipeline data, most recently pushed entry last.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FilenameStack {
    entries: Vec<PathBuf>,
}

impl FilenameStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: PathBuf) {
        self.entries.push(path);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top(&self) -> Option<&PathBuf> {
        self.entries.last()
    }

    /// Pop the top `count` entries for `operation`, returned in push order.
    pub fn take(&mut self, operation: &str, count: usize) -> Result<Vec<PathBuf>> {
        let split = self
            .entries
            .len()
            .checked_sub(count)
            .ok_or_else(|| PipelineError::MissingArgument {
                operation: operation.to_string(),
            })?;
        Ok(self.entries.split_off(split))
    }

    /// Pop every entry; at least one must be pending.
    pub fn drain(&mut self, operation: &str) -> Result<Vec<PathBuf>> {
        if self.entries.is_empty() {
            return Err(PipelineError::MissingArgument {
                operation: operation.to_string(),
            });
        }
        Ok(std::mem::take(&mut self.entries))
    }

    /// Push a copy of the top entry.
    pub fn dup(&mut self, operation: &str) -> Result<()> {
        let top = self
            .top()
            .cloned()
            .ok_or_else(|| PipelineError::MissingArgument {
                operation: operation.to_string(),
            })?;
        self.entries.push(top);
        Ok(())
    }

    pub fn into_vec(self) -> Vec<PathBuf> {
        self.entries
    }
}
