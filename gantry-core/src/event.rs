use crate::{
    git::OpenedRepository,
    model::{HostedRepository, RepositoryId},
    state::{CloneProgress, RepositoryState},
};
use std::path::PathBuf;

/// Results that arrive asynchronously from background git work.
/// These are folded into the store's state alongside intents.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    /// Opening dropped or picked paths finished
    RepositoriesOpened {
        opened: Vec<OpenedRepository>,
        /// Paths that are not repositories, with the reason
        failures: Vec<(PathBuf, String)>,
    },

    /// A repository's branches, history and changes were (re)loaded
    RepositoryStateLoaded {
        id: RepositoryId,
        state: RepositoryState,
    },

    /// `origin` was read (and parsed, when hosted)
    RemoteInfoLoaded {
        id: RepositoryId,
        remote: Option<HostedRepository>,
    },

    /// A push or pull finished, successfully or not
    PushPullFinished { id: RepositoryId },

    CloneProgress {
        id: RepositoryId,
        progress: CloneProgress,
    },

    CloneCompleted {
        id: RepositoryId,
        opened: OpenedRepository,
    },

    CloneFailed { id: RepositoryId, error: String },

    /// A background git operation failed
    OperationFailed(String),
}
