use crate::model::{
    AppError, Branch, CloningRepository, Commit, FileChange, Repository, RepositoryId,
    RepositoryListItem, User,
};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchesState {
    /// `None` on an unborn branch or detached HEAD
    pub current_branch: Option<Branch>,
    pub default_branch: Option<Branch>,
    pub all_branches: Vec<Branch>,
    /// Most recently checked-out branches, newest first
    pub recent_branches: Vec<Branch>,
}

impl BranchesState {
    pub fn contains(&self, name: &str) -> bool {
        self.all_branches.iter().any(|b| b.name == name)
    }

    /// Recent branches first, then the rest in listing order, without duplicates.
    pub fn ordered_for_picker(&self) -> Vec<&Branch> {
        let mut ordered: Vec<&Branch> = Vec::with_capacity(self.all_branches.len());
        for branch in self.recent_branches.iter().chain(&self.all_branches) {
            if !ordered.iter().any(|b| b.same_branch(branch)) {
                ordered.push(branch);
            }
        }
        ordered
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RepositorySection {
    #[default]
    Changes,
    History,
}

/// Everything derived from a repository on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryState {
    pub branches_state: BranchesState,
    pub commits: Vec<Commit>,
    pub changes: Vec<FileChange>,
    pub selected_section: RepositorySection,
    pub is_push_pull_in_progress: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CloneProgress {
    pub title: String,
    /// Fraction complete, 0.0 to 1.0
    pub value: f64,
    pub description: Option<String>,
}

impl CloneProgress {
    pub fn starting(url: &str) -> Self {
        Self {
            title: format!("Cloning {url}"),
            value: 0.0,
            description: None,
        }
    }
}

/// What the user is looking at. Selecting something replaces the previous value wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SelectionState {
    #[default]
    None,
    Cloning {
        repository: CloningRepository,
        progress: CloneProgress,
    },
    Repository {
        repository: Repository,
        state: RepositoryState,
    },
}

impl SelectionState {
    pub fn repository(&self) -> Option<&Repository> {
        match self {
            Self::Repository { repository, .. } => Some(repository),
            Self::None | Self::Cloning { .. } => None,
        }
    }

    pub fn selected_id(&self) -> Option<RepositoryId> {
        match self {
            Self::None => None,
            Self::Cloning { repository, .. } => Some(repository.id),
            Self::Repository { repository, .. } => Some(repository.id),
        }
    }

    pub fn current_branch(&self) -> Option<&Branch> {
        match self {
            Self::Repository { state, .. } => state.branches_state.current_branch.as_ref(),
            Self::None | Self::Cloning { .. } => None,
        }
    }
}

/// The single modal overlay. Variants carry everything their form needs, captured when opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Popup {
    CreateBranch {
        repository: Repository,
    },
    ShowBranches {
        repository: Repository,
    },
    AddRepository,
    RenameBranch {
        repository: Repository,
        branch: Branch,
    },
    DeleteBranch {
        repository: Repository,
        branch: Branch,
    },
    PublishRepository {
        repository: Repository,
    },
    DiscardChanges {
        repository: Repository,
        files: Vec<FileChange>,
    },
}

impl Popup {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CreateBranch { .. } => "create-branch",
            Self::ShowBranches { .. } => "show-branches",
            Self::AddRepository => "add-repository",
            Self::RenameBranch { .. } => "rename-branch",
            Self::DeleteBranch { .. } => "delete-branch",
            Self::PublishRepository { .. } => "publish-repository",
            Self::DiscardChanges { .. } => "discard-changes",
        }
    }
}

/// Immutable snapshot published by the store.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub users: Vec<User>,
    pub repositories: Vec<RepositoryListItem>,
    pub selected_state: SelectionState,
    pub current_popup: Option<Popup>,
    pub errors: Vec<AppError>,
    /// Sidebar loading flag: repositories are being opened or cloned
    pub loading: bool,
    pub repository_states: HashMap<RepositoryId, RepositoryState>,
}

impl AppState {
    pub fn repository_state(&self, id: RepositoryId) -> Option<&RepositoryState> {
        self.repository_states.get(&id)
    }

    pub fn find_item(&self, id: RepositoryId) -> Option<&RepositoryListItem> {
        self.repositories.iter().find(|item| item.id() == id)
    }

    pub fn find_repository(&self, id: RepositoryId) -> Option<&Repository> {
        self.repositories.iter().find_map(|item| match item {
            RepositoryListItem::Repository(repo) if repo.id == id => Some(repo),
            _ => None,
        })
    }

    pub fn is_logged_in(&self) -> bool {
        !self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn repo(id: u64, name: &str) -> Repository {
        Repository {
            id: RepositoryId(id),
            name: name.to_string(),
            path: PathBuf::from(format!("/tmp/{name}")),
            remote: None,
        }
    }

    #[test]
    fn test_ordered_for_picker_puts_recent_first_without_duplicates() {
        let state = BranchesState {
            current_branch: Some(Branch::new("main")),
            default_branch: Some(Branch::new("main")),
            all_branches: vec![Branch::new("dev"), Branch::new("feat"), Branch::new("main")],
            recent_branches: vec![Branch::new("feat"), Branch::new("main")],
        };
        let names: Vec<_> = state
            .ordered_for_picker()
            .into_iter()
            .map(|b| b.name.as_str())
            .collect();
        assert_eq!(names, vec!["feat", "main", "dev"]);
    }

    #[test]
    fn test_selection_accessors() {
        let none = SelectionState::None;
        assert!(none.repository().is_none());
        assert!(none.selected_id().is_none());

        let cloning = SelectionState::Cloning {
            repository: CloningRepository {
                id: RepositoryId(2),
                name: "app".into(),
                url: "https://example.com/o/app.git".into(),
                path: PathBuf::from("/tmp/app"),
            },
            progress: CloneProgress::starting("https://example.com/o/app.git"),
        };
        assert!(cloning.repository().is_none());
        assert_eq!(cloning.selected_id(), Some(RepositoryId(2)));
        assert!(cloning.current_branch().is_none());

        let mut state = RepositoryState::default();
        state.branches_state.current_branch = Some(Branch::new("feature"));
        let selected = SelectionState::Repository {
            repository: repo(1, "alpha"),
            state,
        };
        assert_eq!(selected.repository().map(|r| r.name.as_str()), Some("alpha"));
        assert_eq!(
            selected.current_branch().map(|b| b.name.as_str()),
            Some("feature")
        );
    }

    #[test]
    fn test_find_repository_skips_cloning_entries() {
        let state = AppState {
            repositories: vec![
                RepositoryListItem::Cloning(CloningRepository {
                    id: RepositoryId(1),
                    name: "cloning".into(),
                    url: String::new(),
                    path: PathBuf::from("/tmp/cloning"),
                }),
                RepositoryListItem::Repository(repo(2, "ready")),
            ],
            ..Default::default()
        };
        assert!(state.find_repository(RepositoryId(1)).is_none());
        assert!(state.find_item(RepositoryId(1)).is_some());
        assert_eq!(
            state.find_repository(RepositoryId(2)).map(|r| r.name.as_str()),
            Some("ready")
        );
    }

    #[test]
    fn test_popup_kind_names_are_distinct() {
        let r = repo(1, "alpha");
        let popups = [
            Popup::CreateBranch { repository: r.clone() },
            Popup::ShowBranches { repository: r.clone() },
            Popup::AddRepository,
            Popup::RenameBranch { repository: r.clone(), branch: Branch::new("x") },
            Popup::DeleteBranch { repository: r.clone(), branch: Branch::new("x") },
            Popup::PublishRepository { repository: r.clone() },
            Popup::DiscardChanges { repository: r, files: vec![] },
        ];
        let mut kinds: Vec<_> = popups.iter().map(Popup::kind).collect();
        kinds.sort_unstable();
        kinds.dedup();
        assert_eq!(kinds.len(), popups.len());
    }
}
