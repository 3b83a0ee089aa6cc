use super::EventSender;
use crate::{
    event::StoreEvent,
    git::GitProvider,
    model::{Branch, HostedRepository, RepositoryId},
    state::CloneProgress,
};
use anyhow::Result;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
    thread,
};

pub(super) enum PushPull {
    Push(Branch),
    Pull,
}

pub(super) fn spawn_repository_opening(
    git: &Arc<dyn GitProvider>,
    sender: &EventSender,
    paths: Vec<PathBuf>,
) {
    let git = Arc::clone(git);
    let sender = sender.clone();
    thread::spawn(move || {
        if sender.is_cancelled() {
            return;
        }
        let mut opened = Vec::new();
        let mut failures = Vec::new();
        for path in paths {
            match git.open_repository(&path) {
                Ok(repo) => opened.push(repo),
                Err(e) => failures.push((path, format!("{e}"))),
            }
        }
        sender.send(StoreEvent::RepositoriesOpened { opened, failures });
    });
}

pub(super) fn spawn_state_loading(
    git: &Arc<dyn GitProvider>,
    sender: &EventSender,
    id: RepositoryId,
    path: PathBuf,
) {
    let git = Arc::clone(git);
    let sender = sender.clone();
    thread::spawn(move || {
        if sender.is_cancelled() {
            return;
        }
        reload_state(git.as_ref(), &sender, id, &path);
    });
}

pub(super) fn spawn_remote_loading(
    git: &Arc<dyn GitProvider>,
    sender: &EventSender,
    id: RepositoryId,
    path: PathBuf,
) {
    let git = Arc::clone(git);
    let sender = sender.clone();
    thread::spawn(move || {
        if sender.is_cancelled() {
            return;
        }
        reload_remote(git.as_ref(), &sender, id, &path);
    });
}

pub(super) fn spawn_push_pull(
    git: &Arc<dyn GitProvider>,
    sender: &EventSender,
    id: RepositoryId,
    path: PathBuf,
    operation: PushPull,
) {
    let git = Arc::clone(git);
    let sender = sender.clone();
    thread::spawn(move || {
        if sender.is_cancelled() {
            return;
        }
        let result = match &operation {
            PushPull::Push(branch) => git
                .push(&path, branch)
                .map_err(|e| format!("Failed to push {}: {e}", branch.name)),
            PushPull::Pull => git.pull(&path).map_err(|e| format!("Failed to pull: {e}")),
        };
        if let Err(message) = result {
            sender.send(StoreEvent::OperationFailed(message));
        }
        reload_state(git.as_ref(), &sender, id, &path);
        sender.send(StoreEvent::PushPullFinished { id });
    });
}

/// Run a mutating git operation, then reload the repository so the result shows up.
pub(super) fn spawn_operation<F>(
    git: &Arc<dyn GitProvider>,
    sender: &EventSender,
    id: RepositoryId,
    path: PathBuf,
    failure_context: String,
    operation: F,
) where
    F: FnOnce(&dyn GitProvider, &Path) -> Result<()> + Send + 'static,
{
    let git = Arc::clone(git);
    let sender = sender.clone();
    thread::spawn(move || {
        if sender.is_cancelled() {
            return;
        }
        if let Err(e) = operation(git.as_ref(), &path) {
            sender.send(StoreEvent::OperationFailed(format!("{failure_context}: {e}")));
        }
        reload_state(git.as_ref(), &sender, id, &path);
    });
}

pub(super) fn spawn_publish(
    git: &Arc<dyn GitProvider>,
    sender: &EventSender,
    id: RepositoryId,
    path: PathBuf,
    remote_url: String,
    branch: String,
) {
    let git = Arc::clone(git);
    let sender = sender.clone();
    thread::spawn(move || {
        if sender.is_cancelled() {
            return;
        }
        if let Err(e) = git.publish(&path, &remote_url, &branch) {
            sender.send(StoreEvent::OperationFailed(format!(
                "Failed to publish to {remote_url}: {e}"
            )));
        }
        reload_state(git.as_ref(), &sender, id, &path);
        reload_remote(git.as_ref(), &sender, id, &path);
    });
}

pub(super) fn spawn_clone(
    git: &Arc<dyn GitProvider>,
    sender: &EventSender,
    id: RepositoryId,
    url: String,
    destination: PathBuf,
) {
    let git = Arc::clone(git);
    let sender = sender.clone();
    thread::spawn(move || {
        if sender.is_cancelled() {
            return;
        }
        let progress_sender = sender.clone();
        let mut on_progress = move |progress: CloneProgress| {
            progress_sender.send(StoreEvent::CloneProgress { id, progress });
        };
        let result = git
            .clone_repository(&url, &destination, &mut on_progress)
            .and_then(|()| git.open_repository(&destination));
        match result {
            Ok(opened) => sender.send(StoreEvent::CloneCompleted { id, opened }),
            Err(e) => sender.send(StoreEvent::CloneFailed {
                id,
                error: format!("{e}"),
            }),
        }
    });
}

fn reload_state(git: &dyn GitProvider, sender: &EventSender, id: RepositoryId, path: &Path) {
    match git.load_state(path) {
        Ok(state) => sender.send(StoreEvent::RepositoryStateLoaded { id, state }),
        Err(e) => sender.send(StoreEvent::OperationFailed(format!(
            "Failed to read {}: {e}",
            path.display()
        ))),
    }
}

fn reload_remote(git: &dyn GitProvider, sender: &EventSender, id: RepositoryId, path: &Path) {
    let remote = git
        .remote_url(path)
        .as_deref()
        .and_then(HostedRepository::parse_remote_url);
    sender.send(StoreEvent::RemoteInfoLoaded { id, remote });
}
