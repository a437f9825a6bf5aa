//! Disposable workspace rebuilt at the start of every run.
//!
//! The target directory is removed wholesale and then repopulated from the
//! configured source directories, so no artifact of a previous run survives.

use crate::config::{PipelineConfig, StageDir};
use crate::error::{PipelineError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// The staged directory tree owned by one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a literal filename token against the workspace root.
    pub fn resolve(&self, token: &str) -> PathBuf {
        self.root.join(token)
    }
}

pub struct WorkspaceStager {
    project_root: PathBuf,
    target: PathBuf,
    stages: Vec<StageDir>,
}

impl WorkspaceStager {
    pub fn new(project_root: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            target: target.into(),
            stages: Vec::new(),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(&config.root, config.workspace_root()).with_stages(config.stages.clone())
    }

    pub fn with_stages(mut self, stages: Vec<StageDir>) -> Self {
        self.stages = stages;
        self
    }

    /// Reset the target directory and copy every stage into it.
    pub fn stage(&self) -> Result<Workspace> {
        self.guard_target()?;
        self.reset()?;

        for stage in &self.stages {
            let source = self.project_root.join(&stage.source);
            let dest = self.target.join(&stage.dest);
            debug!("Staging {} -> {}", source.display(), dest.display());
            copy_tree(&source, &dest)?;
        }

        info!(
            "Staged {} director{} into {}",
            self.stages.len(),
            if self.stages.len() == 1 { "y" } else { "ies" },
            self.target.display()
        );

        Ok(Workspace::new(&self.target))
    }

    /// Refuse targets whose reset would delete project files, or whose copy
    /// would recurse into itself.
    fn guard_target(&self) -> Result<()> {
        let target = canonical(&self.target);
        let root = canonical(&self.project_root);

        if root.starts_with(&target) {
            return Err(PipelineError::Config(format!(
                "workspace {} contains the project root",
                self.target.display()
            )));
        }

        for stage in &self.stages {
            let source = canonical(&self.project_root.join(&stage.source));
            if source.starts_with(&target) || target.starts_with(&source) {
                return Err(PipelineError::Config(format!(
                    "workspace {} overlaps staged directory {}",
                    self.target.display(),
                    source.display()
                )));
            }
        }
        Ok(())
    }

    fn reset(&self) -> Result<()> {
        match fs::symlink_metadata(&self.target) {
            Ok(meta) if meta.is_dir() => {
                fs::remove_dir_all(&self.target)
                    .map_err(|e| PipelineError::workspace(&self.target, e))?;
            }
            Ok(_) => {
                fs::remove_file(&self.target)
                    .map_err(|e| PipelineError::workspace(&self.target, e))?;
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(PipelineError::workspace(&self.target, e)),
        }

        fs::create_dir_all(&self.target).map_err(|e| PipelineError::workspace(&self.target, e))
    }
}

/// Canonical form of `path`, resolving the longest existing prefix when the
/// path itself does not exist yet.
fn canonical(path: &Path) -> PathBuf {
    if let Ok(resolved) = path.canonicalize() {
        return resolved;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => canonical(parent).join(name),
        _ => path.to_path_buf(),
    }
}

fn copy_tree(source: &Path, dest: &Path) -> Result<()> {
    if !source.is_dir() {
        return Err(PipelineError::workspace(
            source,
            std::io::Error::new(std::io::ErrorKind::NotFound, "source directory not found"),
        ));
    }

    for entry in WalkDir::new(source).follow_links(true) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(source).to_path_buf();
            PipelineError::workspace(path, e.into())
        })?;

        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| {
                PipelineError::workspace(
                    entry.path(),
                    std::io::Error::new(std::io::ErrorKind::InvalidInput, e),
                )
            })?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| PipelineError::workspace(&target, e))?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| PipelineError::workspace(parent, e))?;
            }
            fs::copy(entry.path(), &target).map_err(|e| PipelineError::workspace(entry.path(), e))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("libc/incl")).unwrap();
        fs::write(root.join("libc/stdio.c"), "int putchar(int c);").unwrap();
        fs::write(root.join("libc/incl/stdio.h"), "#pragma once").unwrap();
        fs::create_dir_all(root.join("test/musts")).unwrap();
        fs::write(root.join("test/musts/fib.c"), "int main() {}").unwrap();
        dir
    }

    fn stages() -> Vec<StageDir> {
        vec![
            StageDir::new("libc", "libc"),
            StageDir::new("libc/incl", "incl"),
            StageDir::new("test", "test"),
        ]
    }

    fn listing(root: &Path) -> Vec<(PathBuf, Vec<u8>)> {
        let mut entries: Vec<_> = WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                (
                    e.path().strip_prefix(root).unwrap().to_path_buf(),
                    fs::read(e.path()).unwrap(),
                )
            })
            .collect();
        entries.sort();
        entries
    }

    #[test]
    fn test_stage_copies_every_source() {
        let project = project();
        let target = project.path().join("target/ws");

        let workspace = WorkspaceStager::new(project.path(), &target)
            .with_stages(stages())
            .stage()
            .unwrap();

        assert_eq!(workspace.root(), target);
        assert!(target.join("libc/stdio.c").is_file());
        assert!(target.join("libc/incl/stdio.h").is_file());
        assert!(target.join("incl/stdio.h").is_file());
        assert!(target.join("test/musts/fib.c").is_file());
    }

    #[test]
    fn test_stage_removes_stale_files() {
        let project = project();
        let target = project.path().join("target/ws");
        fs::create_dir_all(target.join("old")).unwrap();
        fs::write(target.join("old/a.hex.mem"), [0u8; 4]).unwrap();
        fs::write(target.join("leftover.asm"), "nop").unwrap();

        WorkspaceStager::new(project.path(), &target)
            .with_stages(stages())
            .stage()
            .unwrap();

        assert!(!target.join("old").exists());
        assert!(!target.join("leftover.asm").exists());
    }

    #[test]
    fn test_staging_twice_gives_identical_layout() {
        let project = project();
        let target = project.path().join("target/ws");
        let stager = WorkspaceStager::new(project.path(), &target).with_stages(stages());

        stager.stage().unwrap();
        let first = listing(&target);

        // Artifacts from a run in between must not survive the next reset
        fs::write(target.join("test/musts/fib.c.asm"), "hlt").unwrap();

        stager.stage().unwrap();
        let second = listing(&target);

        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_source_is_fatal() {
        let project = project();
        let target = project.path().join("target/ws");

        let err = WorkspaceStager::new(project.path(), &target)
            .with_stages(vec![StageDir::new("does-not-exist", "x")])
            .stage()
            .unwrap_err();

        match err {
            PipelineError::Workspace { path, .. } => {
                assert!(path.ends_with("does-not-exist"));
            }
            other => panic!("Expected workspace error, got {other:?}"),
        }
    }

    #[test]
    fn test_refuses_to_wipe_project_root() {
        let project = project();

        let err = WorkspaceStager::new(project.path(), project.path())
            .with_stages(stages())
            .stage()
            .unwrap_err();

        assert!(matches!(err, PipelineError::Config(_)));
        assert!(project.path().join("libc/stdio.c").exists());
    }

    #[test]
    fn test_refuses_staged_source_as_workspace() {
        let project = project();

        let err = WorkspaceStager::new(project.path(), project.path().join("test"))
            .with_stages(stages())
            .stage()
            .unwrap_err();

        assert!(matches!(err, PipelineError::Config(_)));
        assert!(project.path().join("test/musts/fib.c").is_file());
    }

    #[test]
    fn test_refuses_workspace_inside_staged_source() {
        let project = project();
        let target = project.path().join("test/ws");

        let err = WorkspaceStager::new(project.path(), &target)
            .with_stages(stages())
            .stage()
            .unwrap_err();

        assert!(matches!(err, PipelineError::Config(_)));
        assert!(!target.exists());
        assert!(project.path().join("test/musts/fib.c").is_file());
    }

    #[test]
    fn test_refuses_workspace_reached_through_dotdot() {
        let project = project();
        fs::create_dir_all(project.path().join("target")).unwrap();
        let target = project.path().join("target/../libc");

        let err = WorkspaceStager::new(project.path(), target)
            .with_stages(stages())
            .stage()
            .unwrap_err();

        assert!(matches!(err, PipelineError::Config(_)));
        assert!(project.path().join("libc/stdio.c").is_file());
    }

    #[test]
    fn test_sibling_of_staged_source_is_allowed() {
        let project = project();
        // `test-ws` shares a name prefix with `test` but not a path prefix
        let target = project.path().join("test-ws");

        WorkspaceStager::new(project.path(), &target)
            .with_stages(stages())
            .stage()
            .unwrap();

        assert!(target.join("test/musts/fib.c").is_file());
    }

    #[test]
    fn test_resolve_joins_workspace_root() {
        let workspace = Workspace::new("/ws");
        assert_eq!(workspace.resolve("a.hex"), Path::new("/ws/a.hex"));
        assert_eq!(
            workspace.resolve("test/musts/fib.c"),
            Path::new("/ws/test/musts/fib.c")
        );
    }
}
