use crate::{
    model::{Branch, FileChange},
    state::{CloneProgress, RepositoryState},
};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// A directory confirmed to be inside a git work tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedRepository {
    pub name: String,
    /// Work tree root
    pub path: PathBuf,
    pub remote_url: Option<String>,
}

pub trait GitProvider: Send + Sync {
    fn open_repository(&self, path: &Path) -> Result<OpenedRepository>;
    fn load_state(&self, repo_path: &Path) -> Result<RepositoryState>;
    fn remote_url(&self, repo_path: &Path) -> Option<String>;
    fn push(&self, repo_path: &Path, branch: &Branch) -> Result<()>;
    fn pull(&self, repo_path: &Path) -> Result<()>;
    fn create_branch(&self, repo_path: &Path, name: &str, start_point: Option<&str>) -> Result<()>;
    fn checkout_branch(&self, repo_path: &Path, name: &str) -> Result<()>;
    fn rename_branch(&self, repo_path: &Path, old_name: &str, new_name: &str) -> Result<()>;
    fn delete_branch(&self, repo_path: &Path, name: &str) -> Result<()>;
    fn discard_changes(&self, repo_path: &Path, files: &[FileChange]) -> Result<()>;
    /// Add `origin` and push the current branch with upstream tracking.
    fn publish(&self, repo_path: &Path, remote_url: &str, branch: &str) -> Result<()>;
    fn clone_repository(
        &self,
        url: &str,
        destination: &Path,
        on_progress: &mut dyn FnMut(CloneProgress),
    ) -> Result<()>;
}
