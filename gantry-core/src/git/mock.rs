use super::provider::{GitProvider, OpenedRepository};
use crate::{
    model::{Branch, FileChange},
    state::{CloneProgress, RepositoryState},
};
use anyhow::Result;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Mutex,
};

/// Records calls and returns canned results. Unset results succeed.
#[derive(Default)]
pub struct MockGitProvider {
    /// Paths that open successfully; anything else fails
    pub repositories: HashMap<PathBuf, OpenedRepository>,
    pub states: HashMap<PathBuf, RepositoryState>,
    pub remote_urls: HashMap<PathBuf, String>,
    pub clone_progress: Vec<CloneProgress>,
    pub push_result: Mutex<Option<Result<()>>>,
    pub pull_result: Mutex<Option<Result<()>>>,
    pub branch_result: Mutex<Option<Result<()>>>,
    pub discard_result: Mutex<Option<Result<()>>>,
    pub publish_result: Mutex<Option<Result<()>>>,
    pub clone_result: Mutex<Option<Result<()>>>,
    pub calls: Mutex<Vec<String>>,
}

impl MockGitProvider {
    /// Register a repository at `path` with the given state.
    #[must_use]
    pub fn with_repository(mut self, path: impl Into<PathBuf>, state: RepositoryState) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        self.repositories.insert(
            path.clone(),
            OpenedRepository {
                name,
                path: path.clone(),
                remote_url: None,
            },
        );
        self.states.insert(path, state);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn take(result: &Mutex<Option<Result<()>>>) -> Result<()> {
        result.lock().unwrap().take().unwrap_or(Ok(()))
    }
}

impl GitProvider for MockGitProvider {
    fn open_repository(&self, path: &Path) -> Result<OpenedRepository> {
        self.repositories
            .get(path)
            .map(|repo| OpenedRepository {
                remote_url: self.remote_urls.get(path).cloned(),
                ..repo.clone()
            })
            .ok_or_else(|| anyhow::anyhow!("{} is not a git repository", path.display()))
    }

    fn load_state(&self, repo_path: &Path) -> Result<RepositoryState> {
        self.states
            .get(repo_path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no state for {}", repo_path.display()))
    }

    fn remote_url(&self, repo_path: &Path) -> Option<String> {
        self.remote_urls.get(repo_path).cloned()
    }

    fn push(&self, repo_path: &Path, branch: &Branch) -> Result<()> {
        self.record(format!("push {} {}", repo_path.display(), branch.name));
        Self::take(&self.push_result)
    }

    fn pull(&self, repo_path: &Path) -> Result<()> {
        self.record(format!("pull {}", repo_path.display()));
        Self::take(&self.pull_result)
    }

    fn create_branch(&self, repo_path: &Path, name: &str, start_point: Option<&str>) -> Result<()> {
        self.record(format!(
            "create_branch {} {name} {}",
            repo_path.display(),
            start_point.unwrap_or("HEAD")
        ));
        Self::take(&self.branch_result)
    }

    fn checkout_branch(&self, repo_path: &Path, name: &str) -> Result<()> {
        self.record(format!("checkout_branch {} {name}", repo_path.display()));
        Self::take(&self.branch_result)
    }

    fn rename_branch(&self, repo_path: &Path, old_name: &str, new_name: &str) -> Result<()> {
        self.record(format!(
            "rename_branch {} {old_name} {new_name}",
            repo_path.display()
        ));
        Self::take(&self.branch_result)
    }

    fn delete_branch(&self, repo_path: &Path, name: &str) -> Result<()> {
        self.record(format!("delete_branch {} {name}", repo_path.display()));
        Self::take(&self.branch_result)
    }

    fn discard_changes(&self, repo_path: &Path, files: &[FileChange]) -> Result<()> {
        self.record(format!(
            "discard_changes {} {}",
            repo_path.display(),
            files.len()
        ));
        Self::take(&self.discard_result)
    }

    fn publish(&self, repo_path: &Path, remote_url: &str, branch: &str) -> Result<()> {
        self.record(format!(
            "publish {} {remote_url} {branch}",
            repo_path.display()
        ));
        Self::take(&self.publish_result)
    }

    fn clone_repository(
        &self,
        url: &str,
        destination: &Path,
        on_progress: &mut dyn FnMut(CloneProgress),
    ) -> Result<()> {
        self.record(format!("clone {url} {}", destination.display()));
        for progress in &self.clone_progress {
            on_progress(progress.clone());
        }
        Self::take(&self.clone_result)
    }
}
