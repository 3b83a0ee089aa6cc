pub mod persist;
mod spawn;

use crate::{
    dispatch::{Intent, IntentDispatcher},
    event::StoreEvent,
    git::{GitProvider, repository_name_from_url},
    model::{
        AppError, CloningRepository, HostedRepository, Repository, RepositoryId,
        RepositoryListItem, User,
    },
    state::{AppState, CloneProgress, RepositoryState, SelectionState},
};
use persist::PersistedState;
use spawn::{
    PushPull, spawn_clone, spawn_operation, spawn_publish, spawn_push_pull, spawn_remote_loading,
    spawn_repository_opening, spawn_state_loading,
};
use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{
        Arc, Mutex, PoisonError, RwLock, Weak,
        atomic::{AtomicBool, AtomicU64, Ordering},
        mpsc,
    },
    thread,
    time::Duration,
};

/// Everything the store thread reacts to, in arrival order.
#[derive(Debug)]
pub enum StoreMessage {
    Intent(Intent),
    Event(StoreEvent),
    Shutdown,
}

/// Handed to worker threads so they can report back into the store's inbox.
#[derive(Clone)]
pub struct EventSender {
    tx: mpsc::Sender<StoreMessage>,
    cancel: Arc<AtomicBool>,
}

impl EventSender {
    pub fn new(tx: mpsc::Sender<StoreMessage>) -> Self {
        Self {
            tx,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Send an event from a background thread to the store
    pub fn send(&self, event: StoreEvent) {
        let _ = self.tx.send(StoreMessage::Event(event));
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }
}

/// Owns the authoritative [`AppState`] and folds intents and worker events into it.
pub struct AppStore {
    state: AppState,
    git: Arc<dyn GitProvider>,
    sender: EventSender,
    state_file: Option<PathBuf>,
    next_repository_id: u64,
    next_error_id: u64,
    pending_opens: usize,
    clone_progress: HashMap<RepositoryId, CloneProgress>,
}

impl AppStore {
    /// Build the initial state from saved state plus users seeded by configuration.
    /// With no `state_file`, nothing is written back.
    pub fn new(
        persisted: PersistedState,
        configured_users: &[User],
        git: Arc<dyn GitProvider>,
        sender: EventSender,
        state_file: Option<PathBuf>,
    ) -> Self {
        let mut users = configured_users.to_vec();
        for user in persisted.users {
            if !users.contains(&user) {
                users.push(user);
            }
        }

        let next_repository_id = persisted
            .repositories
            .iter()
            .map(|r| r.id.0)
            .max()
            .map_or(1, |max| max + 1);

        let state = AppState {
            users,
            repositories: persisted
                .repositories
                .into_iter()
                .map(RepositoryListItem::Repository)
                .collect(),
            ..AppState::default()
        };

        Self {
            state,
            git,
            sender,
            state_file,
            next_repository_id,
            next_error_id: 0,
            pending_opens: 0,
            clone_progress: HashMap::new(),
        }
    }

    /// Start the store on its own thread.
    pub fn spawn(
        persisted: PersistedState,
        configured_users: &[User],
        git: Arc<dyn GitProvider>,
        state_file: Option<PathBuf>,
    ) -> std::io::Result<StoreHandle> {
        let (tx, rx) = mpsc::channel();
        let sender = EventSender::new(tx.clone());
        let cancel = Arc::clone(&sender.cancel);
        let store = Self::new(persisted, configured_users, git, sender, state_file);
        let shared = Arc::new(Shared::new(Arc::new(store.state.clone())));

        let thread = thread::Builder::new().name("gantry-store".into()).spawn({
            let shared = Arc::clone(&shared);
            move || store.run(&rx, &shared)
        })?;

        Ok(StoreHandle {
            tx,
            shared,
            cancel,
            thread: Some(thread),
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    fn run(mut self, rx: &mpsc::Receiver<StoreMessage>, shared: &Shared) {
        for message in rx {
            if matches!(message, StoreMessage::Shutdown) {
                break;
            }
            if self.handle_message(message) {
                shared.publish(Arc::new(self.state.clone()));
            }
        }
        log::debug!("store stopped");
    }

    /// Apply one message. Returns whether the state changed and a snapshot is due.
    pub fn handle_message(&mut self, message: StoreMessage) -> bool {
        match message {
            StoreMessage::Intent(intent) => self.handle_intent(intent),
            StoreMessage::Event(event) => self.handle_event(event),
            StoreMessage::Shutdown => false,
        }
    }

    fn handle_intent(&mut self, intent: Intent) -> bool {
        log::debug!("intent {intent:?}");
        match intent {
            Intent::Push(id) => self.start_push(id),
            Intent::Pull(id) => self.start_pull(id),
            Intent::ShowPopup(popup) => {
                if let Some(open) = &self.state.current_popup {
                    log::warn!(
                        "ignoring {} popup while {} is open",
                        popup.kind(),
                        open.kind()
                    );
                    return false;
                }
                self.state.current_popup = Some(popup);
                true
            }
            Intent::ClosePopup => self.state.current_popup.take().is_some(),
            Intent::ClearError(error_id) => {
                let before = self.state.errors.len();
                self.state.errors.retain(|e| e.id != error_id);
                self.state.errors.len() != before
            }
            Intent::AddRepositories(paths) => {
                if paths.is_empty() {
                    return false;
                }
                self.pending_opens += 1;
                self.refresh_loading();
                spawn_repository_opening(&self.git, &self.sender, paths);
                true
            }
            Intent::RemoveRepositories(ids) => self.remove_repositories(&ids),
            Intent::SelectRepository(id) => self.select(id),
            Intent::RefreshRemoteInfo(id) => {
                if let Some(repository) = self.state.find_repository(id) {
                    spawn_remote_loading(&self.git, &self.sender, id, repository.path.clone());
                }
                false
            }
            Intent::RefreshRepository(id) => {
                if let Some(repository) = self.state.find_repository(id) {
                    spawn_state_loading(&self.git, &self.sender, id, repository.path.clone());
                }
                false
            }
            Intent::ChangeRepositorySection { id, section } => {
                if self.state.find_repository(id).is_none() {
                    return false;
                }
                self.update_repository_state(id, |s| s.selected_section = section);
                true
            }
            Intent::DiscardChanges { id, files } => {
                if files.is_empty() {
                    return false;
                }
                self.run_operation(id, "Failed to discard changes", move |git, path| {
                    git.discard_changes(path, &files)
                })
            }
            Intent::CreateBranch {
                id,
                name,
                start_point,
            } => self.run_operation(
                id,
                &format!("Failed to create branch {name}"),
                move |git, path| git.create_branch(path, &name, start_point.as_deref()),
            ),
            Intent::CheckoutBranch { id, name } => self.run_operation(
                id,
                &format!("Failed to check out {name}"),
                move |git, path| git.checkout_branch(path, &name),
            ),
            Intent::RenameBranch {
                id,
                branch,
                new_name,
            } => self.run_operation(
                id,
                &format!("Failed to rename {branch}"),
                move |git, path| git.rename_branch(path, &branch, &new_name),
            ),
            Intent::DeleteBranch { id, branch } => self.delete_branch(id, branch),
            Intent::PublishRepository { id, remote_url } => self.publish(id, remote_url),
            Intent::CloneRepository { url, destination } => self.start_clone(url, destination),
            Intent::SignIn(user) => {
                if self.state.users.contains(&user) {
                    return false;
                }
                log::info!("signed in as {}", user.login);
                self.state.users.push(user);
                self.persist();
                true
            }
        }
    }

    fn handle_event(&mut self, event: StoreEvent) -> bool {
        match event {
            StoreEvent::RepositoriesOpened { opened, failures } => {
                self.pending_opens = self.pending_opens.saturating_sub(1);
                let mut first = None;
                for repo in opened {
                    if let Some(existing) = self
                        .state
                        .repositories
                        .iter()
                        .find(|item| item.path() == repo.path)
                    {
                        log::info!("{} is already in the list", repo.path.display());
                        first.get_or_insert(existing.id());
                        continue;
                    }
                    let id = self.allocate_id();
                    let remote = repo
                        .remote_url
                        .as_deref()
                        .and_then(HostedRepository::parse_remote_url);
                    self.state
                        .repositories
                        .push(RepositoryListItem::Repository(Repository {
                            id,
                            name: repo.name,
                            path: repo.path,
                            remote,
                        }));
                    first.get_or_insert(id);
                }
                for (path, reason) in failures {
                    self.push_error(format!("Could not add {}: {reason}", path.display()));
                }
                self.refresh_loading();
                self.persist();
                if let Some(id) = first {
                    self.select(id);
                }
                true
            }
            StoreEvent::RepositoryStateLoaded { id, mut state } => {
                if self.state.find_repository(id).is_none() {
                    return false;
                }
                if let Some(existing) = self.state.repository_state(id) {
                    state.selected_section = existing.selected_section;
                    state.is_push_pull_in_progress = existing.is_push_pull_in_progress;
                }
                self.update_repository_state(id, |s| *s = state);
                true
            }
            StoreEvent::RemoteInfoLoaded { id, remote } => {
                let Some(RepositoryListItem::Repository(repository)) = self
                    .state
                    .repositories
                    .iter_mut()
                    .find(|item| item.id() == id)
                else {
                    return false;
                };
                if repository.remote == remote {
                    return false;
                }
                repository.remote = remote;
                let updated = repository.clone();
                if let SelectionState::Repository { repository, .. } =
                    &mut self.state.selected_state
                    && repository.id == id
                {
                    *repository = updated;
                }
                self.persist();
                true
            }
            StoreEvent::PushPullFinished { id } => {
                if self.state.find_repository(id).is_none() {
                    return false;
                }
                self.update_repository_state(id, |s| s.is_push_pull_in_progress = false);
                true
            }
            StoreEvent::CloneProgress { id, progress } => {
                let Some(entry) = self.clone_progress.get_mut(&id) else {
                    return false;
                };
                *entry = progress.clone();
                if let SelectionState::Cloning {
                    repository,
                    progress: selected,
                } = &mut self.state.selected_state
                    && repository.id == id
                {
                    *selected = progress;
                }
                true
            }
            StoreEvent::CloneCompleted { id, opened } => {
                self.clone_progress.remove(&id);
                let Some(item) = self
                    .state
                    .repositories
                    .iter_mut()
                    .find(|item| item.id() == id)
                else {
                    log::info!("clone {id} finished after it was removed");
                    return false;
                };
                *item = RepositoryListItem::Repository(Repository {
                    id,
                    name: item.name().to_string(),
                    remote: opened
                        .remote_url
                        .as_deref()
                        .and_then(HostedRepository::parse_remote_url),
                    path: opened.path,
                });
                self.refresh_loading();
                self.persist();
                if self.state.selected_state.selected_id() == Some(id) {
                    self.select(id);
                }
                true
            }
            StoreEvent::CloneFailed { id, error } => {
                self.clone_progress.remove(&id);
                let Some(RepositoryListItem::Cloning(cloning)) = self.state.find_item(id).cloned()
                else {
                    return false;
                };
                self.state.repositories.retain(|item| item.id() != id);
                if self.state.selected_state.selected_id() == Some(id) {
                    self.state.selected_state = SelectionState::None;
                }
                self.push_error(format!("Failed to clone {}: {error}", cloning.url));
                self.refresh_loading();
                true
            }
            StoreEvent::OperationFailed(message) => {
                self.push_error(message);
                true
            }
        }
    }

    fn select(&mut self, id: RepositoryId) -> bool {
        match self.state.find_item(id).cloned() {
            None => {
                log::debug!("select: no repository {id}");
                false
            }
            Some(RepositoryListItem::Repository(repository)) => {
                let state = self.state.repository_state(id).cloned().unwrap_or_default();
                spawn_state_loading(&self.git, &self.sender, id, repository.path.clone());
                self.state.selected_state = SelectionState::Repository { repository, state };
                true
            }
            Some(RepositoryListItem::Cloning(repository)) => {
                let progress = self
                    .clone_progress
                    .get(&id)
                    .cloned()
                    .unwrap_or_else(|| CloneProgress::starting(&repository.url));
                self.state.selected_state = SelectionState::Cloning {
                    repository,
                    progress,
                };
                true
            }
        }
    }

    fn remove_repositories(&mut self, ids: &[RepositoryId]) -> bool {
        let before = self.state.repositories.len();
        self.state
            .repositories
            .retain(|item| !ids.contains(&item.id()));
        if self.state.repositories.len() == before {
            return false;
        }
        for id in ids {
            self.state.repository_states.remove(id);
            self.clone_progress.remove(id);
        }
        if let Some(selected) = self.state.selected_state.selected_id()
            && ids.contains(&selected)
        {
            self.state.selected_state = SelectionState::None;
        }
        self.refresh_loading();
        self.persist();
        true
    }

    fn start_push(&mut self, id: RepositoryId) -> bool {
        let Some(repository) = self.state.find_repository(id).cloned() else {
            return false;
        };
        let Some(branch) = self
            .state
            .repository_state(id)
            .and_then(|s| s.branches_state.current_branch.clone())
        else {
            self.push_error(format!(
                "Cannot push {}: no branch is checked out",
                repository.name
            ));
            return true;
        };
        self.start_push_pull(id, repository.path, PushPull::Push(branch))
    }

    fn start_pull(&mut self, id: RepositoryId) -> bool {
        let Some(repository) = self.state.find_repository(id).cloned() else {
            return false;
        };
        self.start_push_pull(id, repository.path, PushPull::Pull)
    }

    fn start_push_pull(&mut self, id: RepositoryId, path: PathBuf, operation: PushPull) -> bool {
        if self
            .state
            .repository_state(id)
            .is_some_and(|s| s.is_push_pull_in_progress)
        {
            log::info!("push or pull already running for {id}");
            return false;
        }
        self.update_repository_state(id, |s| s.is_push_pull_in_progress = true);
        spawn_push_pull(&self.git, &self.sender, id, path, operation);
        true
    }

    fn delete_branch(&mut self, id: RepositoryId, branch: String) -> bool {
        let branches = self
            .state
            .repository_state(id)
            .map(|s| s.branches_state.clone())
            .unwrap_or_default();
        let default = branches.default_branch.map(|b| b.name);

        if default.as_deref() == Some(branch.as_str()) {
            self.push_error(format!("Cannot delete the default branch {branch}"));
            return true;
        }

        let on_branch = branches
            .current_branch
            .is_some_and(|current| current.name == branch);
        let checkout_first = if on_branch {
            let Some(default) = default else {
                self.push_error(format!(
                    "Cannot delete {branch}: it is checked out and there is no default branch"
                ));
                return true;
            };
            Some(default)
        } else {
            None
        };

        self.run_operation(
            id,
            &format!("Failed to delete {branch}"),
            move |git, path| {
                if let Some(default) = checkout_first {
                    git.checkout_branch(path, &default)?;
                }
                git.delete_branch(path, &branch)
            },
        )
    }

    fn publish(&mut self, id: RepositoryId, remote_url: String) -> bool {
        let Some(repository) = self.state.find_repository(id).cloned() else {
            return false;
        };
        let Some(branch) = self
            .state
            .repository_state(id)
            .and_then(|s| s.branches_state.current_branch.clone())
        else {
            self.push_error(format!(
                "Cannot publish {}: no branch is checked out",
                repository.name
            ));
            return true;
        };
        spawn_publish(
            &self.git,
            &self.sender,
            id,
            repository.path,
            remote_url,
            branch.name,
        );
        false
    }

    fn start_clone(&mut self, url: String, destination: PathBuf) -> bool {
        let name = repository_name_from_url(&url).unwrap_or_else(|| url.clone());
        let id = self.allocate_id();
        let repository = CloningRepository {
            id,
            name,
            url: url.clone(),
            path: destination.clone(),
        };
        let progress = CloneProgress::starting(&url);

        self.state
            .repositories
            .push(RepositoryListItem::Cloning(repository.clone()));
        self.clone_progress.insert(id, progress.clone());
        self.state.selected_state = SelectionState::Cloning {
            repository,
            progress,
        };
        self.refresh_loading();

        spawn_clone(&self.git, &self.sender, id, url, destination);
        true
    }

    fn run_operation<F>(&mut self, id: RepositoryId, failure_context: &str, operation: F) -> bool
    where
        F: FnOnce(&dyn GitProvider, &std::path::Path) -> anyhow::Result<()> + Send + 'static,
    {
        let Some(repository) = self.state.find_repository(id) else {
            log::debug!("no repository {id} for operation");
            return false;
        };
        spawn_operation(
            &self.git,
            &self.sender,
            id,
            repository.path.clone(),
            failure_context.to_string(),
            operation,
        );
        false
    }

    fn update_repository_state(&mut self, id: RepositoryId, f: impl FnOnce(&mut RepositoryState)) {
        let entry = self.state.repository_states.entry(id).or_default();
        f(entry);
        let updated = entry.clone();
        if let SelectionState::Repository { repository, state } = &mut self.state.selected_state
            && repository.id == id
        {
            *state = updated;
        }
    }

    fn push_error(&mut self, message: String) {
        log::warn!("{message}");
        self.next_error_id += 1;
        self.state.errors.push(AppError {
            id: self.next_error_id,
            message,
        });
    }

    fn allocate_id(&mut self) -> RepositoryId {
        let id = RepositoryId(self.next_repository_id);
        self.next_repository_id += 1;
        id
    }

    fn refresh_loading(&mut self) {
        self.state.loading = self.pending_opens > 0
            || self
                .state
                .repositories
                .iter()
                .any(|item| matches!(item, RepositoryListItem::Cloning(_)));
    }

    fn persist(&self) {
        let Some(file) = &self.state_file else {
            return;
        };
        let persisted = PersistedState {
            users: self.state.users.clone(),
            repositories: self
                .state
                .repositories
                .iter()
                .filter_map(|item| match item {
                    RepositoryListItem::Repository(repo) => Some(repo.clone()),
                    RepositoryListItem::Cloning(_) => None,
                })
                .collect(),
        };
        if let Err(e) = persist::save_state(file, &persisted) {
            log::warn!("failed to save state to {}: {e}", file.display());
        }
    }
}

struct Shared {
    latest: RwLock<Arc<AppState>>,
    subscribers: Mutex<Vec<(u64, mpsc::Sender<Arc<AppState>>)>>,
    next_subscriber_id: AtomicU64,
}

impl Shared {
    fn new(initial: Arc<AppState>) -> Self {
        Self {
            latest: RwLock::new(initial),
            subscribers: Mutex::new(Vec::new()),
            next_subscriber_id: AtomicU64::new(0),
        }
    }

    fn publish(&self, snapshot: Arc<AppState>) {
        *self.latest.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&snapshot);
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(_, tx)| tx.send(Arc::clone(&snapshot)).is_ok());
    }

    fn remove_subscriber(&self, id: u64) {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(subscriber, _)| *subscriber != id);
    }
}

/// Owner-side handle to a running store. Dropping it stops the store thread.
pub struct StoreHandle {
    tx: mpsc::Sender<StoreMessage>,
    shared: Arc<Shared>,
    cancel: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<()>>,
}

impl StoreHandle {
    /// The most recently published snapshot.
    pub fn get_state(&self) -> Arc<AppState> {
        Arc::clone(&self.shared.latest.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Receive every snapshot published from now on, in order.
    pub fn subscribe(&self) -> Subscription {
        let id = self.shared.next_subscriber_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel();
        self.shared
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, tx));
        Subscription {
            id,
            rx,
            shared: Arc::downgrade(&self.shared),
        }
    }

    pub fn dispatcher(&self) -> IntentDispatcher {
        IntentDispatcher::new(self.tx.clone())
    }
}

impl Drop for StoreHandle {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        let _ = self.tx.send(StoreMessage::Shutdown);
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            log::error!("store thread panicked");
        }
    }
}

/// A stream of snapshots. Unsubscribes when dropped.
pub struct Subscription {
    id: u64,
    rx: mpsc::Receiver<Arc<AppState>>,
    shared: Weak<Shared>,
}

impl Subscription {
    pub fn try_next(&self) -> Option<Arc<AppState>> {
        self.rx.try_recv().ok()
    }

    pub fn next_timeout(&self, timeout: Duration) -> Option<Arc<AppState>> {
        self.rx.recv_timeout(timeout).ok()
    }

    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.remove_subscriber(self.id);
        }
    }
}
