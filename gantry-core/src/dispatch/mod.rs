pub mod mock;

use crate::{
    model::{AppError, Branch, FileChange, Repository, RepositoryId, RepositoryListItem, User},
    state::{Popup, RepositorySection},
    store::StoreMessage,
};
use std::{path::PathBuf, sync::mpsc};

/// One-way requests to the store. Completion is only ever observed through later snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Push(RepositoryId),
    Pull(RepositoryId),
    ShowPopup(Popup),
    ClosePopup,
    ClearError(u64),
    AddRepositories(Vec<PathBuf>),
    RemoveRepositories(Vec<RepositoryId>),
    SelectRepository(RepositoryId),
    RefreshRemoteInfo(RepositoryId),
    RefreshRepository(RepositoryId),
    ChangeRepositorySection {
        id: RepositoryId,
        section: RepositorySection,
    },
    DiscardChanges {
        id: RepositoryId,
        files: Vec<FileChange>,
    },
    CreateBranch {
        id: RepositoryId,
        name: String,
        start_point: Option<String>,
    },
    CheckoutBranch {
        id: RepositoryId,
        name: String,
    },
    RenameBranch {
        id: RepositoryId,
        branch: String,
        new_name: String,
    },
    DeleteBranch {
        id: RepositoryId,
        branch: String,
    },
    PublishRepository {
        id: RepositoryId,
        remote_url: String,
    },
    CloneRepository {
        url: String,
        destination: PathBuf,
    },
    SignIn(User),
}

/// Fire-and-forget interface the shell uses to ask for state changes.
///
/// Implementors only provide [`Dispatcher::dispatch`]; the named operations build the intent.
pub trait Dispatcher {
    fn dispatch(&self, intent: Intent);

    fn push(&self, repository: &Repository) {
        self.dispatch(Intent::Push(repository.id));
    }

    fn pull(&self, repository: &Repository) {
        self.dispatch(Intent::Pull(repository.id));
    }

    fn show_popup(&self, popup: Popup) {
        self.dispatch(Intent::ShowPopup(popup));
    }

    fn close_popup(&self) {
        self.dispatch(Intent::ClosePopup);
    }

    fn clear_error(&self, error: &AppError) {
        self.dispatch(Intent::ClearError(error.id));
    }

    fn add_repositories(&self, paths: Vec<PathBuf>) {
        self.dispatch(Intent::AddRepositories(paths));
    }

    fn remove_repositories(&self, items: &[RepositoryListItem]) {
        self.dispatch(Intent::RemoveRepositories(
            items.iter().map(RepositoryListItem::id).collect(),
        ));
    }

    fn select_repository(&self, item: &RepositoryListItem) {
        self.dispatch(Intent::SelectRepository(item.id()));
    }

    fn refresh_remote_info(&self, repository: &Repository) {
        self.dispatch(Intent::RefreshRemoteInfo(repository.id));
    }

    fn refresh_repository(&self, repository: &Repository) {
        self.dispatch(Intent::RefreshRepository(repository.id));
    }

    fn change_repository_section(&self, repository: &Repository, section: RepositorySection) {
        self.dispatch(Intent::ChangeRepositorySection {
            id: repository.id,
            section,
        });
    }

    fn discard_changes(&self, repository: &Repository, files: Vec<FileChange>) {
        self.dispatch(Intent::DiscardChanges {
            id: repository.id,
            files,
        });
    }

    fn create_branch(&self, repository: &Repository, name: &str, start_point: Option<&Branch>) {
        self.dispatch(Intent::CreateBranch {
            id: repository.id,
            name: name.to_string(),
            start_point: start_point.map(|b| b.name.clone()),
        });
    }

    fn checkout_branch(&self, repository: &Repository, branch: &Branch) {
        self.dispatch(Intent::CheckoutBranch {
            id: repository.id,
            name: branch.name.clone(),
        });
    }

    fn rename_branch(&self, repository: &Repository, branch: &Branch, new_name: &str) {
        self.dispatch(Intent::RenameBranch {
            id: repository.id,
            branch: branch.name.clone(),
            new_name: new_name.to_string(),
        });
    }

    fn delete_branch(&self, repository: &Repository, branch: &Branch) {
        self.dispatch(Intent::DeleteBranch {
            id: repository.id,
            branch: branch.name.clone(),
        });
    }

    fn publish_repository(&self, repository: &Repository, remote_url: &str) {
        self.dispatch(Intent::PublishRepository {
            id: repository.id,
            remote_url: remote_url.to_string(),
        });
    }

    fn clone_repository(&self, url: &str, destination: PathBuf) {
        self.dispatch(Intent::CloneRepository {
            url: url.to_string(),
            destination,
        });
    }

    fn sign_in(&self, user: User) {
        self.dispatch(Intent::SignIn(user));
    }
}

/// Sends intents to a running store over its inbox.
#[derive(Debug, Clone)]
pub struct IntentDispatcher {
    tx: mpsc::Sender<StoreMessage>,
}

impl IntentDispatcher {
    pub(crate) fn new(tx: mpsc::Sender<StoreMessage>) -> Self {
        Self { tx }
    }
}

impl Dispatcher for IntentDispatcher {
    fn dispatch(&self, intent: Intent) {
        log::debug!("dispatch {intent:?}");
        if self.tx.send(StoreMessage::Intent(intent)).is_err() {
            log::warn!("store has shut down, intent dropped");
        }
    }
}
